use crate::core::library::PostureStore;
use crate::domain::model::{AngleVector, MatchResult, PostureMatch, FINGER_COUNT, FINGER_NAMES};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.50;
pub const DEFAULT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Largest per-finger relative difference a posture may show and still match.
    #[serde(default = "default_tolerance_fraction")]
    pub tolerance_fraction: f64,
    /// Added to the reference angle so a 0 rad reference doesn't divide by zero.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_tolerance_fraction() -> f64 {
    DEFAULT_TOLERANCE_FRACTION
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tolerance_fraction: DEFAULT_TOLERANCE_FRACTION,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Tolerance-gated nearest-neighbour lookup over a posture store.
///
/// A posture is a candidate only when every finger is within tolerance on
/// its own; one finger far off rejects the posture even if the overall
/// distance is small. Candidates are ranked by Euclidean distance.
#[derive(Debug, Clone, Default)]
pub struct PostureMatcher {
    config: MatcherConfig,
}

impl PostureMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn relative_differences(
        &self,
        query: &AngleVector,
        reference: &AngleVector,
    ) -> [f64; FINGER_COUNT] {
        let mut diffs = [0.0; FINGER_COUNT];
        for (i, diff) in diffs.iter_mut().enumerate() {
            let q = query.0[i];
            let r = reference.0[i];
            *diff = (q - r).abs() / (r.abs() + self.config.epsilon);
        }
        diffs
    }

    /// Index of the first finger outside tolerance, if any.
    pub fn first_rejected_finger(
        &self,
        query: &AngleVector,
        reference: &AngleVector,
    ) -> Option<usize> {
        self.relative_differences(query, reference)
            .iter()
            // `!(d < tol)` 也會擋下 NaN
            .position(|d| !(*d < self.config.tolerance_fraction))
    }

    pub fn is_candidate(&self, query: &AngleVector, reference: &AngleVector) -> bool {
        self.first_rejected_finger(query, reference).is_none()
    }

    pub fn best_match(&self, query: &AngleVector, store: &PostureStore) -> MatchResult {
        let mut best: Option<(&str, f64)> = None;

        for (name, reference) in store.iter() {
            if let Some(finger) = self.first_rejected_finger(query, reference) {
                tracing::trace!(
                    "Posture '{}' rejected: {} finger outside {:.0}% tolerance",
                    name,
                    FINGER_NAMES[finger],
                    self.config.tolerance_fraction * 100.0
                );
                continue;
            }

            let distance = query.euclidean_distance(reference);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((name, distance)),
            }
        }

        best.map(|(name, distance)| PostureMatch {
            name: name.to_string(),
            distance,
        })
    }
}
