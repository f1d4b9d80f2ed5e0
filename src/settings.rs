//! Runtime settings
//!
//! Read once at startup; never written back.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable naming a settings file for the native runner
pub const SETTINGS_ENV: &str = "HORSE_DERBY_SETTINGS";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,

    // === Headless runner ===
    /// Virtual time between frames (ms)
    pub frame_interval_ms: f64,
    /// Frame cap for one headless run
    pub max_frames: u64,

    // === Logging ===
    /// `log` level filter: off, error, warn, info, debug, trace
    pub log_level: String,

    // === Browser ===
    /// Pause the race when the tab is hidden
    pub auto_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            frame_interval_ms: 1000.0 / 60.0,
            max_frames: 100_000,
            log_level: "info".to_string(),
            auto_pause: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "frame_interval_ms",
                reason: format!("must be a positive number, got {}", self.frame_interval_ms),
            });
        }
        if self.max_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "max_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        self.level_filter()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::Invalid {
            field: "log_level",
            reason: format!("unknown level `{}`", self.log_level),
        })
    }

    /// Configured seed, or `fallback` when none is set
    pub fn resolve_seed(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}
