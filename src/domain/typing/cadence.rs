//! Typing cadence: per-character and post-newline delays with jitter

use std::time::Duration;

use rand::Rng;

/// Lower bound for the delay after a character, in seconds
pub const CHARACTER_DELAY_FLOOR_SECS: f64 = 0.001;

/// Lower bound for the delay after a line break, in seconds
pub const NEWLINE_DELAY_FLOOR_SECS: f64 = 0.01;

/// Delay calculator derived from a requested speed and jitter.
///
/// `character_delay = 1 / max(1, chars_per_second)`; jitter is a fraction of
/// that delay drawn uniformly from `[-j, +j]`. After a line break the upper
/// bound is halved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    character_delay: f64,
    jitter_fraction: f64,
}

impl Cadence {
    /// Build a cadence from characters per second and jitter percent (0-100)
    pub fn new(chars_per_second: u32, jitter_percent: u8) -> Self {
        let speed = chars_per_second.max(1);
        Self {
            character_delay: 1.0 / f64::from(speed),
            jitter_fraction: f64::from(jitter_percent.min(100)) / 100.0,
        }
    }

    /// Nominal delay between characters, without jitter
    pub fn character_delay(&self) -> Duration {
        Duration::from_secs_f64(self.character_delay)
    }

    /// Jitter as a fraction of the character delay
    pub fn jitter_fraction(&self) -> f64 {
        self.jitter_fraction
    }

    /// Delay to wait after a typed character
    pub fn next_character_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let spread = self.jitter_fraction * self.character_delay;
        let offset = if spread > 0.0 {
            rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        Duration::from_secs_f64((self.character_delay + offset).max(CHARACTER_DELAY_FLOOR_SECS))
    }

    /// Delay to wait after a line break in indentation-preserving mode
    pub fn next_newline_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let base = self.character_delay.max(NEWLINE_DELAY_FLOOR_SECS);
        let spread = self.jitter_fraction * self.character_delay;
        let offset = if spread > 0.0 {
            rng.gen_range(-spread..=spread / 2.0)
        } else {
            0.0
        };
        Duration::from_secs_f64((base + offset).max(NEWLINE_DELAY_FLOOR_SECS))
    }
}
