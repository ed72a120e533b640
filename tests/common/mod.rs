#![allow(dead_code)]

use async_trait::async_trait;
use hand_posture::domain::model::{
    AngleVector, DetectedHand, Frame, Handedness, HandLandmarks, Landmark, PostureMatch,
    FINGERTIPS, LANDMARK_COUNT, MIDDLE_MCP, WRIST,
};
use hand_posture::domain::ports::{LandmarkSource, Presenter};
use hand_posture::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Landmarks whose fingertip angles come out as `angles`: the reference
/// points straight up the image and each tip is rotated away from it.
pub fn hand_with_angles(angles: [f64; 5]) -> HandLandmarks {
    let wrist = Landmark::new(0.5, 0.9, 0.0);
    let mut hand = [wrist; LANDMARK_COUNT];
    hand[WRIST] = wrist;
    hand[MIDDLE_MCP] = Landmark::new(0.5, 0.6, 0.0);
    for (tip, angle) in FINGERTIPS.iter().zip(angles) {
        hand[*tip] = Landmark::new(0.5 + 0.3 * angle.sin(), 0.9 - 0.3 * angle.cos(), 0.0);
    }
    hand
}

pub fn hand(handedness: Handedness, angles: [f64; 5], score: Option<f64>) -> DetectedHand {
    DetectedHand {
        handedness,
        score,
        landmarks: hand_with_angles(angles),
    }
}

pub fn frame(hands: Vec<DetectedHand>) -> Frame {
    Frame { hands }
}

pub fn assert_angles_close(a: &AngleVector, b: &AngleVector) {
    for (x, y) in a.values().iter().zip(b.values()) {
        assert!((x - y).abs() < 1e-9, "{} vs {}", a, b);
    }
}

/// Frames (or errors) handed out in order.
pub struct ScriptedSource {
    items: VecDeque<Result<Frame>>,
}

impl ScriptedSource {
    pub fn new(items: Vec<Result<Frame>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn frames(frames: Vec<Frame>) -> Self {
        Self::new(frames.into_iter().map(Ok).collect())
    }
}

#[async_trait]
impl LandmarkSource for ScriptedSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>> {
        match self.items.pop_front() {
            Some(item) => item.map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub matches: Arc<Mutex<Vec<(u64, PostureMatch)>>>,
    pub prompts: Arc<Mutex<Vec<AngleVector>>>,
    pub confirmations: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl Presenter for RecordingPresenter {
    fn show_match(&mut self, frame_index: u64, result: &PostureMatch) -> Result<()> {
        self.matches
            .lock()
            .unwrap()
            .push((frame_index, result.clone()));
        Ok(())
    }

    fn prompt_for_name(&mut self, angles: &AngleVector) -> Result<()> {
        self.prompts.lock().unwrap().push(*angles);
        Ok(())
    }

    fn confirm_registration(&mut self, name: &str, registered: &[String]) -> Result<()> {
        self.confirmations
            .lock()
            .unwrap()
            .push((name.to_string(), registered.to_vec()));
        Ok(())
    }
}
