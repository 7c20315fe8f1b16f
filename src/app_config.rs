use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::cue::DEFAULT_MICRODVD_FPS;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. The configuration is an
/// explicit value threaded into the pipeline entry points, not ambient
/// state.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Whether subtitle import runs at all
    #[serde(default = "default_true")]
    pub import_enabled: bool,

    /// Whether extracted and cleaned intermediate subtitle files are kept
    /// next to the media file instead of being deleted after import
    #[serde(default)]
    pub keep_intermediate_files: bool,

    /// Preferred subtitle language (ISO code); when set, only matching
    /// tracks are imported, all tracks otherwise
    #[serde(default)]
    pub preferred_language: Option<String>,

    /// Frame rate assumed for frame-addressed subtitle formats that do not
    /// declare one
    #[serde(default = "default_microdvd_fps")]
    pub microdvd_fps: f64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_microdvd_fps() -> f64 {
    DEFAULT_MICRODVD_FPS
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(language) = &self.preferred_language {
            // Surface bad codes at startup rather than importing zero tracks
            let _name = crate::language_utils::get_language_name(language)
                .map_err(|e| anyhow!("Invalid preferred_language: {}", e))?;
        }

        if !self.microdvd_fps.is_finite() || self.microdvd_fps <= 0.0 {
            return Err(anyhow!(
                "microdvd_fps must be a positive number, got {}",
                self.microdvd_fps
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            import_enabled: true,
            keep_intermediate_files: false,
            preferred_language: None,
            microdvd_fps: default_microdvd_fps(),
            log_level: LogLevel::default(),
        }
    }
}
