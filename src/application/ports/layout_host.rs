//! Keyboard layout / window port interface

use std::fmt;

use thiserror::Error;

/// Layout host errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Target window is gone")]
    WindowGone,

    #[error("Failed to activate layout: {0}")]
    ActivationFailed(String),

    #[error("Keyboard layout switching is not supported on this platform")]
    Unsupported,
}

/// Native keyboard layout handle (an HKL on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutHandle(pub u64);

impl LayoutHandle {
    /// Language identifier stored in the low word
    pub const fn language_id(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Compare on the low 32 bits, the part that identifies the layout
    pub const fn same_layout(&self, other: &LayoutHandle) -> bool {
        (self.0 & 0xFFFF_FFFF) == (other.0 & 0xFFFF_FFFF)
    }
}

impl fmt::Display for LayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Native window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// OS thread identifier (the thread owning a window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsThreadId(pub u32);

/// Port for the host's layout and window services
pub trait LayoutHost: Send + Sync {
    /// Installed keyboard layouts
    fn installed_layouts(&self) -> Vec<LayoutHandle>;

    /// Load a layout by its KLID string (e.g. "00000409")
    fn load_layout(&self, klid: &str) -> Option<LayoutHandle>;

    /// Current foreground window
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Thread that owns `window`
    fn window_thread(&self, window: WindowHandle) -> Option<OsThreadId>;

    /// Layout active on `thread`
    fn thread_layout(&self, thread: OsThreadId) -> Option<LayoutHandle>;

    /// Thread id of the caller
    fn current_thread(&self) -> OsThreadId;

    /// Attach or detach the input state of two threads
    fn attach_input(&self, from: OsThreadId, to: OsThreadId, attach: bool) -> bool;

    /// Activate `layout` for the calling (possibly attached) thread
    fn activate_layout(&self, layout: LayoutHandle) -> Result<(), LayoutError>;

    /// Ask `window` to switch to `layout`
    fn request_layout_change(
        &self,
        window: WindowHandle,
        layout: LayoutHandle,
    ) -> Result<(), LayoutError>;
}
