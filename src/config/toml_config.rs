use crate::config::{
    validate_matcher_config, validate_tracking, DEFAULT_POLL_INTERVAL_MS, DEFAULT_STATS_INTERVAL,
    DEFAULT_STORE_PATH,
};
use crate::core::matcher::MatcherConfig;
use crate::core::ConfigProvider;
use crate::domain::model::Handedness;
use crate::domain::ports::TrackingSettings;
use crate::utils::error::{PostureError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_required_field, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
    pub follow: Option<bool>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub handedness: Handedness,
    pub max_hands: usize,
    pub min_detection_confidence: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let defaults = TrackingSettings::default();
        Self {
            handedness: defaults.handedness,
            max_hands: defaults.max_hands,
            min_detection_confidence: defaults.min_detection_confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub stats_interval_frames: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stats_interval_frames: DEFAULT_STATS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub changes_only: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PostureError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PostureError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${POSTURE_STORE})；未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PostureError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("store.path", &self.store.path)?;

        let frames = validate_required_field("source.path", &self.source.path)?;
        validate_path("source.path", frames)?;
        if self.follow() {
            validate_positive_number(
                "source.poll_interval_ms",
                self.poll_interval_ms() as usize,
                1,
            )?;
        }

        validate_matcher_config("matcher.", &self.matcher)?;
        validate_tracking("tracking.", &self.tracking())?;

        if self.monitoring.enabled {
            validate_positive_number(
                "monitoring.stats_interval_frames",
                self.monitoring.stats_interval_frames as usize,
                1,
            )?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for TomlConfig {
    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn frames_path(&self) -> &str {
        self.source.path.as_deref().unwrap_or_default()
    }

    fn matcher_config(&self) -> MatcherConfig {
        self.matcher
    }

    fn tracking(&self) -> TrackingSettings {
        TrackingSettings {
            handedness: self.tracking.handedness,
            max_hands: self.tracking.max_hands,
            min_detection_confidence: self.tracking.min_detection_confidence,
        }
    }

    fn follow(&self) -> bool {
        self.source.follow.unwrap_or(false)
    }

    fn poll_interval_ms(&self) -> u64 {
        self.source.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
