use crate::core::features::finger_angles;
use crate::core::library::PostureLibrary;
use crate::core::matcher::PostureMatcher;
use crate::domain::model::{AngleVector, Command, DetectedHand, Frame, PostureMatch, SessionSummary};
use crate::domain::ports::{LandmarkSource, PostureRepository, Presenter, TrackingSettings};
use crate::utils::error::Result;
use crate::utils::monitor::SessionMonitor;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

/// What one frame produced for the tracked hands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Angles of the first tracked hand, the one a capture would use.
    pub active: Option<AngleVector>,
    pub hands_evaluated: usize,
    pub matches: Vec<PostureMatch>,
}

/// Single-threaded recognition loop: read a frame, extract angles, match,
/// apply queued registration commands, render.
pub struct RecognitionEngine<R: PostureRepository, S: LandmarkSource, P: Presenter> {
    library: PostureLibrary<R>,
    matcher: PostureMatcher,
    source: S,
    presenter: P,
    tracking: TrackingSettings,
    monitor: SessionMonitor,
    pending: Option<AngleVector>,
    deferred: Vec<Command>,
    summary: SessionSummary,
}

impl<R: PostureRepository, S: LandmarkSource, P: Presenter> RecognitionEngine<R, S, P> {
    pub fn new(
        library: PostureLibrary<R>,
        matcher: PostureMatcher,
        source: S,
        presenter: P,
        tracking: TrackingSettings,
    ) -> Self {
        Self::new_with_monitoring(
            library,
            matcher,
            source,
            presenter,
            tracking,
            SessionMonitor::new(false, 0),
        )
    }

    pub fn new_with_monitoring(
        library: PostureLibrary<R>,
        matcher: PostureMatcher,
        source: S,
        presenter: P,
        tracking: TrackingSettings,
        monitor: SessionMonitor,
    ) -> Self {
        Self {
            library,
            matcher,
            source,
            presenter,
            tracking,
            monitor,
            pending: None,
            deferred: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    pub fn library(&self) -> &PostureLibrary<R> {
        &self.library
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn pending_capture(&self) -> Option<&AngleVector> {
        self.pending.as_ref()
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Hands the engine evaluates, in frame order.
    pub fn tracked_hands<'a>(&self, frame: &'a Frame) -> impl Iterator<Item = &'a DetectedHand> {
        let tracking = self.tracking;
        frame
            .hands
            .iter()
            .filter(move |hand| hand.handedness == tracking.handedness)
            .filter(move |hand| {
                hand.score
                    .map_or(true, |score| score >= tracking.min_detection_confidence)
            })
            .take(tracking.max_hands)
    }

    /// Extract and match every tracked hand in `frame`. No side effects.
    pub fn evaluate_frame(&self, frame: &Frame) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        let store = self.library.store();

        for hand in self.tracked_hands(frame) {
            let angles = finger_angles(&hand.landmarks);
            outcome.hands_evaluated += 1;
            if outcome.active.is_none() {
                outcome.active = Some(angles);
            }

            if store.is_empty() {
                continue;
            }
            if let Some(found) = self.matcher.best_match(&angles, store) {
                outcome.matches.push(found);
            }
        }

        outcome
    }

    /// First phase of registration: hold the active hand's angles until a
    /// name arrives. Returns the captured angles.
    pub fn capture(&mut self, outcome: &FrameOutcome) -> Result<Option<AngleVector>> {
        let Some(angles) = outcome.active else {
            tracing::warn!(
                "⚠️ No {} hand in view; nothing to register",
                self.tracking.handedness
            );
            return Ok(None);
        };

        if self.pending.is_some() {
            tracing::debug!("Replacing earlier capture that was never named");
        }
        tracing::info!("📸 Captured angles (radians): {}", angles);
        self.presenter.prompt_for_name(&angles)?;
        self.pending = Some(angles);
        Ok(Some(angles))
    }

    /// Second phase: store the pending capture under `name` and persist.
    /// Returns false when there was nothing to commit.
    pub async fn commit(&mut self, name: &str) -> Result<bool> {
        let Some(angles) = self.pending else {
            tracing::warn!("⚠️ Got name '{}' but no posture was captured; press 's' first", name);
            return Ok(false);
        };

        self.library.register(name, angles).await?;
        self.pending = None;
        self.summary.registrations += 1;

        let names = self.library.store().names();
        self.presenter.confirm_registration(name.trim(), &names)?;
        Ok(true)
    }

    /// Apply a registration command against this frame's outcome. A failed
    /// commit keeps the capture pending so the name can be sent again.
    async fn apply(&mut self, command: Command, outcome: &FrameOutcome) {
        let result = match command {
            Command::Register => self.capture(outcome).map(|_| ()),
            Command::Name(name) => self.commit(&name).await.map(|_| ()),
            Command::Exit => Ok(()),
        };

        if let Err(e) = result {
            tracing::error!("❌ Registration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        }
    }

    /// Apply commands left over when the session ends. A name still commits
    /// the pending capture; a capture request has no frame to use.
    async fn finish_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Name(name) => {
                    if let Err(e) = self.commit(&name).await {
                        tracing::error!("❌ Registration failed: {}", e);
                    }
                }
                Command::Register => {
                    tracing::warn!("⚠️ Capture requested at end of session; no frame left to capture")
                }
                Command::Exit => {}
            }
        }
        if self.pending.is_some() {
            tracing::warn!("⚠️ Session ended with an unnamed capture; it was not saved");
        }
    }

    pub async fn process_frame(&mut self, frame: &Frame, commands: Vec<Command>) -> Result<FrameOutcome> {
        let outcome = self.evaluate_frame(frame);

        for command in commands {
            self.apply(command, &outcome).await;
        }

        for found in &outcome.matches {
            self.presenter.show_match(self.summary.frames, found)?;
        }

        self.summary.frames += 1;
        self.summary.hands_evaluated += outcome.hands_evaluated as u64;
        self.summary.matches += outcome.matches.len() as u64;
        self.monitor.record_frame(&self.summary);

        Ok(outcome)
    }

    /// Run until the source is exhausted or an `Exit` command arrives.
    pub async fn run(&mut self, commands: &mut UnboundedReceiver<Command>) -> Result<SessionSummary> {
        tracing::info!(
            "👉 Recognition running for {} hands with {} registered postures",
            self.tracking.handedness,
            self.library.store().len()
        );

        loop {
            // 每個影格開頭才處理指令，離開指令在這裡生效
            let mut queued = std::mem::take(&mut self.deferred);
            let exit = drain_commands(commands, &mut queued);
            if exit {
                tracing::info!("👋 Exit requested");
                self.finish_commands(queued).await;
                break;
            }

            let frame = match self.source.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("Landmark source exhausted");
                    self.finish_commands(queued).await;
                    break;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("⚠️ Skipping frame: {}", e);
                    self.summary.skipped_frames += 1;
                    // 指令留到下一個有效影格
                    self.deferred = queued;
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.process_frame(&frame, queued).await?;
            tokio::task::yield_now().await;
        }

        self.monitor.log_final_stats(&self.summary);
        Ok(self.summary)
    }
}

/// Non-blocking drain of everything queued so far into `queued`. Returns
/// true when an `Exit` was seen; anything after it is left in the channel.
fn drain_commands(commands: &mut UnboundedReceiver<Command>, queued: &mut Vec<Command>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(Command::Exit) => return true,
            Ok(command) => queued.push(command),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return false,
        }
    }
}
