//! Key injection port interface

use thiserror::Error;

/// Key injection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("Injection path not supported: {0}")]
    Unsupported(String),

    #[error("Input was rejected by the system: {0}")]
    Rejected(String),

    #[error("Failed to initialize key injector: {0}")]
    InitFailed(String),

    #[error("Connection to the input system was lost: {0}")]
    Disconnected(String),
}

impl InjectError {
    /// Errors that make every later keystroke pointless
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

/// Key-down or key-up phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    Press,
    Release,
}

/// Keys the engine emits by name rather than as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Tab,
    Space,
    Enter,
    Escape,
    Shift,
    Home,
    Delete,
}

impl NamedKey {
    /// Set-1 hardware scan code
    pub const fn scan_code(&self) -> u16 {
        match self {
            Self::Tab => 0x0F,
            Self::Space => 0x39,
            Self::Enter => 0x1C,
            Self::Escape => 0x01,
            Self::Shift => 0x2A,
            Self::Home => 0x47,
            Self::Delete => 0x53,
        }
    }

    /// Whether the scan code needs the extended (E0) prefix.
    ///
    /// Home and Delete live on the navigation cluster, not the numpad.
    pub const fn is_extended(&self) -> bool {
        matches!(self, Self::Home | Self::Delete)
    }

    /// Windows virtual-key code
    pub const fn virtual_key(&self) -> u16 {
        match self {
            Self::Tab => 0x09,
            Self::Space => 0x20,
            Self::Enter => 0x0D,
            Self::Escape => 0x1B,
            Self::Shift => 0x10,
            Self::Home => 0x24,
            Self::Delete => 0x2E,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::Space => "space",
            Self::Enter => "enter",
            Self::Escape => "escape",
            Self::Shift => "shift",
            Self::Home => "home",
            Self::Delete => "delete",
        }
    }
}

/// Port for OS-level key injection.
///
/// Calls are short and blocking; implementations are created on and used
/// from the typing thread only.
pub trait KeyInjector {
    /// Inject one printable character through a Unicode-capable path
    fn unicode_char(&mut self, ch: char) -> Result<(), InjectError>;

    /// Inject a hardware scan code for `key`
    fn scan_code(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError>;

    /// Inject a virtual-key event for `key`
    fn virtual_key(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError>;

    /// Short adapter name for logs
    fn name(&self) -> &'static str;
}

/// Factory producing a fresh injector on the typing thread
pub type InjectorFactory =
    std::sync::Arc<dyn Fn() -> Result<Box<dyn KeyInjector>, InjectError> + Send + Sync>;
