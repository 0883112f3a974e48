//! Cross-platform key injector using enigo
//!
//! Works on Windows, macOS, and Linux (X11). Has no scan-code path, so
//! named keys always go through the virtual-key fallback.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::application::ports::{InjectError, KeyDirection, KeyInjector, NamedKey};

/// Cross-platform key injector using enigo
pub struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    /// Connect to the platform input system
    pub fn new() -> Result<Self, InjectError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InjectError::InitFailed(format!("Failed to create enigo: {}", e)))?;
        Ok(Self { enigo })
    }
}

fn enigo_key(key: NamedKey) -> Key {
    match key {
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Enter => Key::Return,
        NamedKey::Escape => Key::Escape,
        NamedKey::Shift => Key::Shift,
        NamedKey::Home => Key::Home,
        NamedKey::Delete => Key::Delete,
    }
}

fn enigo_direction(direction: KeyDirection) -> Direction {
    match direction {
        KeyDirection::Press => Direction::Press,
        KeyDirection::Release => Direction::Release,
    }
}

impl KeyInjector for EnigoInjector {
    fn unicode_char(&mut self, ch: char) -> Result<(), InjectError> {
        let mut buf = [0u8; 4];
        self.enigo
            .text(ch.encode_utf8(&mut buf))
            .map_err(|e| InjectError::Rejected(format!("Failed to type {:?}: {}", ch, e)))
    }

    fn scan_code(&mut self, _key: NamedKey, _direction: KeyDirection) -> Result<(), InjectError> {
        Err(InjectError::Unsupported("enigo has no scan-code path".to_string()))
    }

    fn virtual_key(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError> {
        self.enigo
            .key(enigo_key(key), enigo_direction(direction))
            .map_err(|e| InjectError::Rejected(format!("Failed to send {}: {}", key.as_str(), e)))
    }

    fn name(&self) -> &'static str {
        "enigo"
    }
}
