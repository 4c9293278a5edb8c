//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{WaterflowError, WaterflowResult};

/// Largest coordinate magnitude that survives the packed 16-bit message form.
const MAX_DRAG_THRESHOLD_PX: u32 = i16::MAX as u32;

/// Pointer positions are `i32`, so the clamp bounds must be too.
const MAX_SCREEN_EXTENT_PX: u32 = i32::MAX as u32;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture classification thresholds.
    pub gesture: GestureConfig,

    /// Live pointer source settings.
    pub source: SourceConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Thresholds for the right-drag classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Displacement from the press anchor (pixels) that must be exceeded
    /// before a move is treated as a drag.
    pub drag_threshold_px: u32,

    /// Maximum delay between press and the threshold-crossing move (ms).
    pub start_window_ms: u64,

    /// Minimum spacing between consecutive `Dragging` notifications (ms).
    pub drag_throttle_ms: u64,
}

/// Live pointer source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path of the PS/2-style mice multiplexer device.
    pub device_path: PathBuf,

    /// Desktop width used to clamp integrated pointer positions.
    pub screen_width: u32,

    /// Desktop height used to clamp integrated pointer positions.
    pub screen_height: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "waterflow=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 15,
            start_window_ms: 300,
            drag_throttle_ms: 10,
        }
    }
}

impl GestureConfig {
    /// Squared drag threshold, compared against squared displacement.
    pub fn drag_threshold_sq(&self) -> i64 {
        let px = self.drag_threshold_px as i64;
        px * px
    }

    /// Reject values the classifier cannot honor.
    pub fn validate(&self) -> WaterflowResult<()> {
        if self.drag_threshold_px > MAX_DRAG_THRESHOLD_PX {
            return Err(WaterflowError::config(format!(
                "drag_threshold_px {} exceeds {MAX_DRAG_THRESHOLD_PX}",
                self.drag_threshold_px
            )));
        }
        if self.start_window_ms == 0 {
            return Err(WaterflowError::config(
                "start_window_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("/dev/input/mice"),
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

impl SourceConfig {
    /// Screen extents must be non-empty and fit a pointer coordinate.
    pub fn validate(&self) -> WaterflowResult<()> {
        for (name, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if !(1..=MAX_SCREEN_EXTENT_PX).contains(&value) {
                return Err(WaterflowError::config(format!(
                    "{name} {value} must be within 1..={MAX_SCREEN_EXTENT_PX}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> WaterflowResult<()> {
        self.gesture.validate()?;
        self.source.validate()
    }

    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> WaterflowResult<Self> {
        if !path.exists() {
            return Err(WaterflowError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> WaterflowResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> WaterflowResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("waterflow").join("config.json")
}
