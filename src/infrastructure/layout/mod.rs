//! Keyboard layout host adapters

use std::sync::Arc;

use crate::application::ports::LayoutHost;

mod unsupported;
#[cfg(windows)]
mod win32;

pub use unsupported::UnsupportedLayoutHost;
#[cfg(windows)]
pub use win32::Win32LayoutHost;

/// Layout host for the current platform
pub fn platform_layout_host() -> Arc<dyn LayoutHost> {
    #[cfg(windows)]
    {
        Arc::new(Win32LayoutHost::new())
    }

    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedLayoutHost::new())
    }
}
