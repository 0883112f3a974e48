//! Typing request value object

use serde::{Deserialize, Serialize};

use crate::domain::error::RequestError;

/// Default typing speed (characters per second)
pub const DEFAULT_SPEED: u32 = 5;

/// Default countdown before typing starts (seconds)
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Default jitter (percent of the character delay)
pub const DEFAULT_JITTER_PERCENT: u8 = 5;

/// A request to type some text into the foreground window.
///
/// Immutable once accepted. The serde names match the control protocol
/// (`text`, `speed`, `countdown`, `jitter`, `sendEnter`, `autoSwitch`, `ideMode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingRequest {
    /// Text to type
    pub text: String,
    /// Characters per second
    #[serde(rename = "speed", default = "default_speed")]
    pub chars_per_second: u32,
    /// Seconds to wait before the first keystroke
    #[serde(rename = "countdown", default = "default_countdown")]
    pub countdown_secs: u32,
    /// Random variation of the character delay, 0-100
    #[serde(rename = "jitter", default = "default_jitter")]
    pub jitter_percent: u8,
    /// Press Enter once all text is typed
    #[serde(rename = "sendEnter", default = "default_true")]
    pub send_enter_at_end: bool,
    /// Switch the target window's keyboard layout per character class
    #[serde(rename = "autoSwitch", default = "default_true")]
    pub auto_switch_layout: bool,
    /// Indentation-preserving ("IDE") mode
    #[serde(rename = "ideMode", default)]
    pub preserve_indentation: bool,
}

fn default_speed() -> u32 {
    DEFAULT_SPEED
}

fn default_countdown() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}

fn default_jitter() -> u8 {
    DEFAULT_JITTER_PERCENT
}

fn default_true() -> bool {
    true
}

impl TypingRequest {
    /// Create a request with default settings
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chars_per_second: DEFAULT_SPEED,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            jitter_percent: DEFAULT_JITTER_PERCENT,
            send_enter_at_end: true,
            auto_switch_layout: true,
            preserve_indentation: false,
        }
    }

    /// Decode a request from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|e| RequestError::Malformed(e.to_string()))
    }

    /// Encode the request as single-line JSON
    pub fn to_json(&self) -> Result<String, RequestError> {
        serde_json::to_string(self).map_err(|e| RequestError::Malformed(e.to_string()))
    }

    /// Check the request before a session is started.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.text.trim().is_empty() {
            return Err(RequestError::EmptyText);
        }
        if self.chars_per_second == 0 {
            return Err(RequestError::InvalidSpeed(self.chars_per_second));
        }
        if self.jitter_percent > 100 {
            return Err(RequestError::JitterOutOfRange(self.jitter_percent));
        }
        Ok(())
    }

    /// Number of characters in the raw text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
