//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::typing::{
    TypingRequest, DEFAULT_COUNTDOWN_SECS, DEFAULT_JITTER_PERCENT, DEFAULT_SPEED,
    DEFAULT_TAB_WIDTH,
};

/// Default settle delay after structural keys in indentation mode (ms)
pub const DEFAULT_SPECIAL_KEY_DELAY_MS: u64 = 300;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub speed: Option<u32>,
    pub countdown: Option<u32>,
    pub jitter: Option<u8>,
    pub send_enter: Option<bool>,
    pub auto_switch: Option<bool>,
    pub ide_mode: Option<bool>,
    pub injector: Option<String>,
    pub tab_width: Option<usize>,
    pub special_key_delay_ms: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            speed: Some(DEFAULT_SPEED),
            countdown: Some(DEFAULT_COUNTDOWN_SECS),
            jitter: Some(DEFAULT_JITTER_PERCENT),
            send_enter: Some(true),
            auto_switch: Some(true),
            ide_mode: Some(false),
            injector: Some("auto".to_string()),
            tab_width: Some(DEFAULT_TAB_WIDTH),
            special_key_delay_ms: Some(DEFAULT_SPECIAL_KEY_DELAY_MS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            speed: other.speed.or(self.speed),
            countdown: other.countdown.or(self.countdown),
            jitter: other.jitter.or(self.jitter),
            send_enter: other.send_enter.or(self.send_enter),
            auto_switch: other.auto_switch.or(self.auto_switch),
            ide_mode: other.ide_mode.or(self.ide_mode),
            injector: other.injector.or(self.injector),
            tab_width: other.tab_width.or(self.tab_width),
            special_key_delay_ms: other.special_key_delay_ms.or(self.special_key_delay_ms),
        }
    }

    /// Build a typing request for `text` using these settings
    pub fn to_request(&self, text: impl Into<String>) -> TypingRequest {
        TypingRequest {
            text: text.into(),
            chars_per_second: self.speed.unwrap_or(DEFAULT_SPEED),
            countdown_secs: self.countdown.unwrap_or(DEFAULT_COUNTDOWN_SECS),
            jitter_percent: self.jitter.unwrap_or(DEFAULT_JITTER_PERCENT),
            send_enter_at_end: self.send_enter.unwrap_or(true),
            auto_switch_layout: self.auto_switch.unwrap_or(true),
            preserve_indentation: self.ide_mode.unwrap_or(false),
        }
    }

    /// Get injector preference, or "auto" if not set
    pub fn injector_or_default(&self) -> &str {
        self.injector.as_deref().unwrap_or("auto")
    }

    /// Get tab width, or 4 if not set
    pub fn tab_width_or_default(&self) -> usize {
        self.tab_width.unwrap_or(DEFAULT_TAB_WIDTH)
    }

    /// Get the indentation-mode settle delay in milliseconds
    pub fn special_key_delay_ms_or_default(&self) -> u64 {
        self.special_key_delay_ms
            .unwrap_or(DEFAULT_SPECIAL_KEY_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.speed, Some(5));
        assert_eq!(config.countdown, Some(3));
        assert_eq!(config.jitter, Some(5));
        assert_eq!(config.send_enter, Some(true));
        assert_eq!(config.auto_switch, Some(true));
        assert_eq!(config.ide_mode, Some(false));
        assert_eq!(config.injector_or_default(), "auto");
        assert_eq!(config.tab_width_or_default(), 4);
        assert_eq!(config.special_key_delay_ms_or_default(), 300);
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.speed.is_none());
        assert!(config.countdown.is_none());
        assert!(config.injector.is_none());
        assert!(config.tab_width.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            speed: Some(5),
            countdown: Some(3),
            injector: Some("enigo".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            speed: Some(20),
            countdown: None, // Should not override
            injector: Some("win32".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.speed, Some(20));
        assert_eq!(merged.countdown, Some(3)); // Kept from base
        assert_eq!(merged.injector, Some("win32".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            ide_mode: Some(true),
            tab_width: Some(2),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.ide_mode, Some(true));
        assert_eq!(merged.tab_width, Some(2));
    }

    #[test]
    fn to_request_uses_settings() {
        let config = AppConfig::defaults().merge(AppConfig {
            speed: Some(12),
            countdown: Some(0),
            ide_mode: Some(true),
            send_enter: Some(false),
            ..Default::default()
        });

        let request = config.to_request("text");
        assert_eq!(request.text, "text");
        assert_eq!(request.chars_per_second, 12);
        assert_eq!(request.countdown_secs, 0);
        assert_eq!(request.jitter_percent, 5);
        assert!(request.preserve_indentation);
        assert!(!request.send_enter_at_end);
        assert!(request.auto_switch_layout);
    }

    #[test]
    fn to_request_from_empty_matches_request_defaults() {
        assert_eq!(
            AppConfig::empty().to_request("x"),
            TypingRequest::new("x")
        );
    }
}
