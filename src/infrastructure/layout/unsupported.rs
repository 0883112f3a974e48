//! Layout host for platforms without layout switching

use crate::application::ports::{
    LayoutError, LayoutHandle, LayoutHost, OsThreadId, WindowHandle,
};

/// Reports no layouts and no foreground window, so the engine never switches
#[derive(Debug, Default)]
pub struct UnsupportedLayoutHost;

impl UnsupportedLayoutHost {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutHost for UnsupportedLayoutHost {
    fn installed_layouts(&self) -> Vec<LayoutHandle> {
        Vec::new()
    }

    fn load_layout(&self, _klid: &str) -> Option<LayoutHandle> {
        None
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        None
    }

    fn window_thread(&self, _window: WindowHandle) -> Option<OsThreadId> {
        None
    }

    fn thread_layout(&self, _thread: OsThreadId) -> Option<LayoutHandle> {
        None
    }

    fn current_thread(&self) -> OsThreadId {
        OsThreadId(0)
    }

    fn attach_input(&self, _from: OsThreadId, _to: OsThreadId, _attach: bool) -> bool {
        false
    }

    fn activate_layout(&self, _layout: LayoutHandle) -> Result<(), LayoutError> {
        Err(LayoutError::Unsupported)
    }

    fn request_layout_change(
        &self,
        _window: WindowHandle,
        _layout: LayoutHandle,
    ) -> Result<(), LayoutError> {
        Err(LayoutError::Unsupported)
    }
}
