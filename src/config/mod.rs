pub mod toml_config;

use crate::core::matcher::MatcherConfig;
use crate::domain::ports::TrackingSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_float, validate_positive_number, validate_range};

pub const DEFAULT_STORE_PATH: &str = "registered_postures.json";
pub const DEFAULT_FRAMES_PATH: &str = "landmarks.jsonl";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
pub const DEFAULT_STATS_INTERVAL: u64 = 300;

pub fn validate_matcher_config(prefix: &str, config: &MatcherConfig) -> Result<()> {
    validate_positive_float(
        &format!("{}tolerance_fraction", prefix),
        config.tolerance_fraction,
    )?;
    validate_positive_float(&format!("{}epsilon", prefix), config.epsilon)?;

    if config.tolerance_fraction > 1.0 {
        tracing::warn!(
            "⚠️ Tolerance {:.2} lets a finger differ by more than its own reference angle",
            config.tolerance_fraction
        );
    }
    Ok(())
}

pub fn validate_tracking(prefix: &str, tracking: &TrackingSettings) -> Result<()> {
    validate_positive_number(&format!("{}max_hands", prefix), tracking.max_hands, 1)?;
    validate_range(
        &format!("{}min_detection_confidence", prefix),
        tracking.min_detection_confidence,
        0.0,
        1.0,
    )
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::domain::model::Handedness;
    use crate::utils::validation::{validate_path, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "hand-posture")]
    #[command(about = "Recognise registered hand postures from a landmark stream")]
    pub struct CliConfig {
        /// JSON file holding the registered postures
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        pub store: String,

        /// Newline-delimited JSON landmark frames
        #[arg(long, default_value = DEFAULT_FRAMES_PATH)]
        pub frames: String,

        /// Keep waiting for new frames at end of file
        #[arg(long)]
        pub follow: bool,

        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
        pub poll_interval_ms: u64,

        /// Per-finger relative tolerance
        #[arg(long, default_value_t = crate::core::matcher::DEFAULT_TOLERANCE_FRACTION)]
        pub tolerance: f64,

        #[arg(long, default_value_t = crate::core::matcher::DEFAULT_EPSILON)]
        pub epsilon: f64,

        #[arg(long, value_enum, default_value_t = Handedness::Right)]
        pub handedness: Handedness,

        #[arg(long, default_value_t = 2)]
        pub max_hands: usize,

        /// Drop hands whose detector score is below this
        #[arg(long, default_value_t = crate::domain::ports::DEFAULT_MIN_DETECTION_CONFIDENCE)]
        pub min_detection_confidence: f64,

        /// Only print a match when the recognised posture changes
        #[arg(long)]
        pub changes_only: bool,

        #[arg(long, help = "Log frame rate and memory usage")]
        pub monitor: bool,

        #[arg(long, default_value_t = DEFAULT_STATS_INTERVAL)]
        pub stats_interval: u64,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn store_path(&self) -> &str {
            &self.store
        }

        fn frames_path(&self) -> &str {
            &self.frames
        }

        fn matcher_config(&self) -> MatcherConfig {
            MatcherConfig {
                tolerance_fraction: self.tolerance,
                epsilon: self.epsilon,
            }
        }

        fn tracking(&self) -> TrackingSettings {
            TrackingSettings {
                handedness: self.handedness,
                max_hands: self.max_hands,
                min_detection_confidence: self.min_detection_confidence,
            }
        }

        fn follow(&self) -> bool {
            self.follow
        }

        fn poll_interval_ms(&self) -> u64 {
            self.poll_interval_ms
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("store", &self.store)?;
            validate_path("frames", &self.frames)?;
            validate_matcher_config("", &self.matcher_config())?;
            validate_tracking("", &self.tracking())?;
            if self.follow {
                validate_positive_number("poll_interval_ms", self.poll_interval_ms as usize, 1)?;
            }
            Ok(())
        }
    }

}
