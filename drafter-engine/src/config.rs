//! Engine configuration, loaded from JSON.
//!
//! Every field has a default, so a partial file (or `{}`) is valid:
//!
//! ```json
//! { "history_capacity": 25, "snap": { "mode": "grid", "spacing": 10.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Which snap collaborator the engine installs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SnapConfig {
    #[default]
    None,
    /// Round to the nearest grid intersection.
    Grid { spacing: f64 },
    /// Snap to entity vertices within the pick tolerance.
    Endpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Undoable states kept by the state log
    pub history_capacity: usize,
    /// Pick radius in scene units for hover, selection and endpoint snap
    pub pick_tolerance: f64,
    /// Cell size of the spatial pick index
    pub pick_cell_size: f64,
    pub snap: SnapConfig,
    /// Prompt shown while no command is active
    pub idle_prompt: String,
    /// Status-line messages retained before the oldest is dropped
    pub max_notifications: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: drafter_core::DEFAULT_CAPACITY,
            pick_tolerance: 5.0,
            pick_cell_size: 64.0,
            snap: SnapConfig::None,
            idle_prompt: "Command:".to_string(),
            max_notifications: 32,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pick_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pick_tolerance",
                reason: format!("must be non-negative, got {}", self.pick_tolerance),
            });
        }
        if !(self.pick_cell_size > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pick_cell_size",
                reason: format!("must be positive, got {}", self.pick_cell_size),
            });
        }
        if let SnapConfig::Grid { spacing } = self.snap {
            if !(spacing > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "snap.spacing",
                    reason: format!("must be positive, got {spacing}"),
                });
            }
        }
        Ok(())
    }

    /// Replace every value `validate` would reject with its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.pick_tolerance >= 0.0) {
            log::warn!(
                "pick_tolerance {} is invalid, using {}",
                self.pick_tolerance,
                defaults.pick_tolerance
            );
            self.pick_tolerance = defaults.pick_tolerance;
        }
        if !(self.pick_cell_size > 0.0) {
            log::warn!(
                "pick_cell_size {} is invalid, using {}",
                self.pick_cell_size,
                defaults.pick_cell_size
            );
            self.pick_cell_size = defaults.pick_cell_size;
        }
        if let SnapConfig::Grid { spacing } = self.snap {
            if !(spacing > 0.0) {
                log::warn!("snap.spacing {spacing} is invalid, snapping disabled");
                self.snap = SnapConfig::None;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(
            r#"{ "history_capacity": 3, "snap": { "mode": "grid", "spacing": 2.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.snap, SnapConfig::Grid { spacing: 2.5 });
        assert_eq!(config.idle_prompt, "Command:");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "pick_cell_size": 0 }"#),
            Err(ConfigError::InvalidValue { field: "pick_cell_size", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "snap": { "mode": "grid", "spacing": -1 } }"#),
            Err(ConfigError::InvalidValue { field: "snap.spacing", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_sanitized_replaces_invalid_values() {
        let config = EngineConfig {
            pick_tolerance: f64::NAN,
            pick_cell_size: 0.0,
            snap: SnapConfig::Grid { spacing: -2.0 },
            history_capacity: 4,
            ..EngineConfig::default()
        }
        .sanitized();
        assert!(config.validate().is_ok());
        assert_eq!(config.pick_tolerance, 5.0);
        assert_eq!(config.pick_cell_size, 64.0);
        assert_eq!(config.snap, SnapConfig::None);
        assert_eq!(config.history_capacity, 4);

        let valid = EngineConfig {
            pick_cell_size: 8.0,
            ..EngineConfig::default()
        };
        assert_eq!(valid.clone().sanitized(), valid);
    }
}
