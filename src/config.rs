// Wingbit Configuration
// Session settings, loadable from JSON; every field has a default

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frame time of the scrolling-text animation, in milliseconds.
pub const DEFAULT_FRAME_MS: u64 = 200;

/// How `microphone.sound_level()` gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicrophoneMode {
    /// Read `mic_vol` from the host's shared state
    #[default]
    Live,
    /// Always report 0 (early simulator builds had no microphone)
    Stub,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub microphone: MicrophoneMode,
    pub scroll_frame_ms: u64,
    pub enable_os_access: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            microphone: MicrophoneMode::Live,
            scroll_frame_ms: DEFAULT_FRAME_MS,
            enable_os_access: true,
        }
    }
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
