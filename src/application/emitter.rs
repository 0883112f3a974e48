//! Key emission primitives on top of the injector port

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::ports::{InjectError, KeyDirection, KeyInjector, NamedKey, Sleeper};

/// Injection failure that makes continuing pointless
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EmitError(pub InjectError);

/// Named-key emission paths, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPath {
    ScanCode,
    VirtualKey,
}

/// Scan code first, virtual key as fallback
pub const NAMED_KEY_PATHS: [EmissionPath; 2] = [EmissionPath::ScanCode, EmissionPath::VirtualKey];

/// Hold (down-to-up gap) and post-emission settle time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyTiming {
    pub hold: Duration,
    pub post: Duration,
}

impl KeyTiming {
    /// No hold, no settle
    pub const INSTANT: KeyTiming = KeyTiming::from_millis(0, 0);

    /// Default scan-code timing
    pub const SCAN_DEFAULT: KeyTiming = KeyTiming::from_millis(15, 120);

    pub const fn from_millis(hold_ms: u64, post_ms: u64) -> Self {
        Self {
            hold: Duration::from_millis(hold_ms),
            post: Duration::from_millis(post_ms),
        }
    }
}

/// Emits single logical key presses through a [`KeyInjector`].
///
/// Transient failures are logged and reported as `Ok(false)`; only fatal
/// injector errors come back as `Err`.
pub struct KeyEmitter {
    injector: Box<dyn KeyInjector>,
    sleeper: Arc<dyn Sleeper>,
}

impl KeyEmitter {
    pub fn new(injector: Box<dyn KeyInjector>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { injector, sleeper }
    }

    /// Name of the underlying injector
    pub fn injector_name(&self) -> &'static str {
        self.injector.name()
    }

    /// Type one printable character through the Unicode path
    pub fn emit_unicode_character(&mut self, ch: char) -> Result<bool, EmitError> {
        match self.injector.unicode_char(ch) {
            Ok(()) => {
                debug!(ch = ?ch, "unicode");
                Ok(true)
            }
            Err(e) if e.is_fatal() => Err(EmitError(e)),
            Err(e) => {
                warn!(ch = ?ch, error = %e, "Skipping character");
                Ok(false)
            }
        }
    }

    /// Press and release `key`, trying each emission path in order
    pub fn emit_named_key(&mut self, key: NamedKey, timing: KeyTiming) -> Result<bool, EmitError> {
        for path in NAMED_KEY_PATHS {
            match self.press_release(path, key, timing.hold) {
                Ok(()) => {
                    debug!(key = key.as_str(), ?path, "named key");
                    self.pause(timing.post);
                    return Ok(true);
                }
                Err(e) if e.is_fatal() => return Err(EmitError(e)),
                Err(e) => debug!(key = key.as_str(), ?path, error = %e, "Emission path failed"),
            }
        }
        warn!(key = key.as_str(), "All emission paths failed; key skipped");
        Ok(false)
    }

    /// Select from the cursor to the line start and delete it.
    ///
    /// Shift is always released, even if the Home press failed.
    pub fn clear_auto_indentation(&mut self) -> Result<bool, EmitError> {
        let shift_down = self.send_direction(NamedKey::Shift, KeyDirection::Press)?;
        self.pause(Duration::from_millis(10));
        let home = match self.emit_named_key(NamedKey::Home, KeyTiming::from_millis(10, 15)) {
            Ok(sent) => sent,
            Err(e) => {
                let _ = self.send_direction(NamedKey::Shift, KeyDirection::Release);
                return Err(e);
            }
        };
        let shift_up = self.send_direction(NamedKey::Shift, KeyDirection::Release)?;
        let delete = self.emit_named_key(NamedKey::Delete, KeyTiming::from_millis(10, 40))?;

        let cleared = shift_down && home && shift_up && delete;
        if !cleared {
            warn!("Auto-indentation clear incomplete");
        }
        Ok(cleared)
    }

    fn press_release(
        &mut self,
        path: EmissionPath,
        key: NamedKey,
        hold: Duration,
    ) -> Result<(), InjectError> {
        self.send(path, key, KeyDirection::Press)?;
        self.pause(hold);
        match self.send(path, key, KeyDirection::Release) {
            Err(e) if !e.is_fatal() => {
                // The key is down on this path; release it here before any fallback
                debug!(key = key.as_str(), ?path, error = %e, "Release failed; retrying");
                self.send(path, key, KeyDirection::Release)
            }
            result => result,
        }
    }

    fn send_direction(&mut self, key: NamedKey, direction: KeyDirection) -> Result<bool, EmitError> {
        for path in NAMED_KEY_PATHS {
            match self.send(path, key, direction) {
                Ok(()) => return Ok(true),
                Err(e) if e.is_fatal() => return Err(EmitError(e)),
                Err(e) => debug!(key = key.as_str(), ?path, error = %e, "Emission path failed"),
            }
        }
        Ok(false)
    }

    fn send(
        &mut self,
        path: EmissionPath,
        key: NamedKey,
        direction: KeyDirection,
    ) -> Result<(), InjectError> {
        match path {
            EmissionPath::ScanCode => self.injector.scan_code(key, direction),
            EmissionPath::VirtualKey => self.injector.virtual_key(key, direction),
        }
    }

    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.sleeper.sleep(duration);
        }
    }
}
