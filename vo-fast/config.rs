use vo_core::{FastConfig, FastVariant};

use crate::builder::DetectorBuilder;
use crate::error::{FastError, FastResult};
use crate::pattern::SamplePattern;
use crate::types::KeypointOrder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detection settings for one pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DetectorConfig {
    /// Output ordering
    pub order: KeypointOrder,
    /// Keep only the strongest N keypoints (ties by scan order)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_keypoints: Option<usize>,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
    /// Segment test and suppression parameters
    pub core: FastConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfig {
    /// Threshold 20, FAST-9, 3px margin, 3x3 suppression, scan order
    pub fn new() -> Self {
        Self {
            order: KeypointOrder::ScanOrder,
            max_keypoints: None,
            name: None,
            description: None,
            version: None,
            core: FastConfig::default(),
        }
    }

    /// Classic FAST-12: fewer, more repeatable corners
    pub fn fast12_preset() -> Self {
        Self {
            core: FastConfig {
                fast_variant: FastVariant::Fast12,
                ..FastConfig::default()
            },
            name: Some("FAST-12".to_string()),
            description: Some("Strict twelve-sample arcs".to_string()),
            version: Some("1.0".to_string()),
            ..Self::new()
        }
    }

    /// Low threshold, tight suppression: many corners for textured scenes
    pub fn dense_preset() -> Self {
        Self {
            core: FastConfig {
                threshold: 10,
                fast_variant: FastVariant::Fast9,
                suppression_window: 3,
                ..FastConfig::default()
            },
            name: Some("Dense".to_string()),
            description: Some("Many weak corners, light suppression".to_string()),
            version: Some("1.0".to_string()),
            ..Self::new()
        }
    }

    /// Strong, well separated corners ranked by response, capped at 500
    pub fn sparse_preset() -> Self {
        Self {
            core: FastConfig {
                threshold: 40,
                fast_variant: FastVariant::Fast9,
                border_margin: 8,
                suppression_window: 7,
                ..FastConfig::default()
            },
            order: KeypointOrder::ByResponse,
            max_keypoints: Some(500),
            name: Some("Sparse".to_string()),
            description: Some("Strongest separated corners first".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Look up a preset by name: `default`, `fast12`, `dense` or `sparse`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::new()),
            "fast12" => Some(Self::fast12_preset()),
            "dense" => Some(Self::dense_preset()),
            "sparse" => Some(Self::sparse_preset()),
            _ => None,
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let limit = self
            .max_keypoints
            .map_or_else(|| "none".to_string(), |n| n.to_string());
        format!(
            "DetectorConfig{}: threshold={}, arc={}, margin={}, window={}, order={:?}, max={}, threads={}",
            self.name.as_deref().map(|n| format!(" '{n}'")).unwrap_or_default(),
            self.core.threshold,
            self.core.fast_variant.arc_length(),
            self.core.border_margin,
            self.core.suppression_window,
            self.order,
            limit,
            self.core.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> FastResult<()> {
        if self.core.border_margin < SamplePattern::RADIUS {
            return Err(FastError::InvalidBorderMargin {
                margin: self.core.border_margin,
                min: SamplePattern::RADIUS,
            });
        }
        let window = self.core.suppression_window;
        if window == 0 || window % 2 == 0 {
            return Err(FastError::InvalidSuppressionWindow(window));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
pub use self::io::ConfigError;

#[cfg(feature = "serde")]
mod io {
    use super::DetectorConfig;
    use crate::error::FastError;
    use std::path::Path;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("config file I/O: {0}")]
        Io(#[from] std::io::Error),
        #[error("JSON config: {0}")]
        Json(#[from] serde_json::Error),
        #[error("TOML config: {0}")]
        TomlDe(#[from] toml::de::Error),
        #[error("TOML serialization: {0}")]
        TomlSer(#[from] toml::ser::Error),
        #[error("invalid configuration: {0}")]
        Invalid(#[from] FastError),
    }

    impl DetectorConfig {
        /// Save configuration to JSON file
        pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
            std::fs::write(path, self.to_json()?)?;
            Ok(())
        }

        /// Load configuration from JSON file
        pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            Self::from_json(&std::fs::read_to_string(path)?)
        }

        /// Save configuration to TOML file
        pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
            std::fs::write(path, self.to_toml()?)?;
            Ok(())
        }

        /// Load configuration from TOML file
        pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            Self::from_toml(&std::fs::read_to_string(path)?)
        }

        /// Load from `.toml` or `.json` depending on the extension (JSON otherwise).
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => Self::load_toml(path),
                _ => Self::load_json(path),
            }
        }

        pub fn to_json(&self) -> Result<String, ConfigError> {
            Ok(serde_json::to_string_pretty(self)?)
        }

        pub fn from_json(json: &str) -> Result<Self, ConfigError> {
            let config: Self = serde_json::from_str(json)?;
            config.validate()?;
            Ok(config)
        }

        pub fn to_toml(&self) -> Result<String, ConfigError> {
            Ok(toml::to_string_pretty(self)?)
        }

        pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
            let config: Self = toml::from_str(toml_str)?;
            config.validate()?;
            Ok(config)
        }
    }
}
