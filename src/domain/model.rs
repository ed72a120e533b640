use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

pub const LANDMARK_COUNT: usize = 21;
pub const FINGER_COUNT: usize = 5;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertips in feature order, thumb to pinky.
pub const FINGERTIPS: [usize; FINGER_COUNT] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

pub const FINGER_NAMES: [&str; FINGER_COUNT] = ["thumb", "index", "middle", "ring", "pinky"];

/// A point in normalized image-relative coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Landmark) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    pub fn divided_by(&self, divisor: f64) -> Landmark {
        Landmark::new(self.x / divisor, self.y / divisor, self.z / divisor)
    }
}

impl Sub for Landmark {
    type Output = Landmark;

    fn sub(self, other: Landmark) -> Landmark {
        Landmark::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

pub type HandLandmarks = [Landmark; LANDMARK_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "Left"),
            Handedness::Right => write!(f, "Right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    pub handedness: Handedness,
    /// Detector confidence for this hand, when the source reports one.
    /// Compared against `TrackingSettings::min_detection_confidence`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub landmarks: HandLandmarks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

/// Fingertip angles in radians, thumb to pinky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleVector(pub [f64; FINGER_COUNT]);

impl AngleVector {
    pub fn new(values: [f64; FINGER_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FINGER_COUNT] {
        &self.0
    }

    pub fn euclidean_distance(&self, other: &AngleVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl fmt::Display for AngleVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", value)?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostureMatch {
    pub name: String,
    pub distance: f64,
}

impl fmt::Display for PostureMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.name, self.distance)
    }
}

pub type MatchResult = Option<PostureMatch>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Capture the active hand's angles and wait for a name.
    Register,
    /// Commit the pending capture under this name.
    Name(String),
    Exit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub skipped_frames: u64,
    pub hands_evaluated: u64,
    pub matches: u64,
    pub registrations: u64,
}
