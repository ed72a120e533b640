use crate::core::library::PostureStore;
use crate::core::matcher::MatcherConfig;
use crate::domain::model::{AngleVector, Frame, Handedness, PostureMatch};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for the posture library. `load` yields `None` when nothing
/// has been saved yet.
pub trait PostureRepository: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<PostureStore>>> + Send;
    fn save(&self, store: &PostureStore) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self) -> String;
}

#[async_trait]
pub trait LandmarkSource: Send {
    /// `Ok(None)` once the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<Frame>>;
}

pub trait Presenter {
    fn show_match(&mut self, frame_index: u64, result: &PostureMatch) -> Result<()>;
    fn prompt_for_name(&mut self, angles: &AngleVector) -> Result<()>;
    fn confirm_registration(&mut self, name: &str, registered: &[String]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn frames_path(&self) -> &str;
    fn matcher_config(&self) -> MatcherConfig;
    fn tracking(&self) -> TrackingSettings;
    fn follow(&self) -> bool;
    fn poll_interval_ms(&self) -> u64;
}

/// Hands scoring below this are dropped. Zero keeps every hand the
/// detector reported, since the detector applies its own threshold.
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.0;

/// Which detected hands the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSettings {
    pub handedness: Handedness,
    pub max_hands: usize,
    pub min_detection_confidence: f64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            handedness: Handedness::Right,
            max_hands: 2,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
        }
    }
}
