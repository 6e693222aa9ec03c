//! Configuration for the audio stream adapter

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{AUTO_BUFFER_SLICES, ENGINE_FRAME_MS};
use crate::error::{ConfigError, Result};

/// Configuration for one [`AudioReadStream`](crate::audio::AudioReadStream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioStreamConfig {
    /// Buffer horizon in milliseconds. The engine delivers audio in 10 ms
    /// slices, so a multiple of 10 is recommended. `-1` selects an automatic
    /// horizon of a few slices.
    pub buffer_ms: i32,

    /// Waveform substituted when a read outpaces the incoming frames
    pub filler: FillerConfig,
}

impl Default for AudioStreamConfig {
    fn default() -> Self {
        Self {
            buffer_ms: -1,
            filler: FillerConfig::default(),
        }
    }
}

/// Underrun filler selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FillerConfig {
    /// Pad underruns with digital silence
    Silence,

    /// Pad underruns with a quiet sine tone, masking the gap without the
    /// hard edge a drop to silence produces
    Comfort { frequency_hz: f32, amplitude: f32 },
}

impl Default for FillerConfig {
    fn default() -> Self {
        FillerConfig::Comfort {
            frequency_hz: 220.0,
            amplitude: 0.001,
        }
    }
}

impl AudioStreamConfig {
    /// Resolve the configured horizon, applying the automatic default
    pub fn effective_buffer_ms(&self) -> u32 {
        if self.buffer_ms < 0 {
            AUTO_BUFFER_SLICES * ENGINE_FRAME_MS
        } else {
            self.buffer_ms as u32
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.buffer_ms == 0 || self.buffer_ms < -1 {
            return Err(ConfigError::InvalidValue {
                field: "buffer_ms",
                reason: format!("{} (must be positive, or -1 for automatic)", self.buffer_ms),
            });
        }
        if let FillerConfig::Comfort {
            frequency_hz,
            amplitude,
        } = self.filler
        {
            if !(frequency_hz > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "filler.frequency_hz",
                    reason: format!("{frequency_hz} (must be positive)"),
                });
            }
            if !(amplitude > 0.0 && amplitude <= 1.0) {
                return Err(ConfigError::InvalidValue {
                    field: "filler.amplitude",
                    reason: format!("{amplitude} (must be in (0, 1])"),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&contents)?)
    }
}
