//! Windows keyboard layout host

use std::iter;
use std::ptr;

use windows_sys::Win32::Foundation::HWND;
use windows_sys::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    ActivateKeyboardLayout, GetKeyboardLayout, GetKeyboardLayoutList, LoadKeyboardLayoutW,
    KLF_SETFORPROCESS,
};
use windows_sys::Win32::UI::TextServices::HKL;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowThreadProcessId, IsWindow, PostMessageW,
    WM_INPUTLANGCHANGEREQUEST,
};

use crate::application::ports::{
    LayoutError, LayoutHandle, LayoutHost, OsThreadId, WindowHandle,
};

/// Layout host backed by the user32 keyboard layout APIs
#[derive(Debug, Default)]
pub struct Win32LayoutHost;

impl Win32LayoutHost {
    pub fn new() -> Self {
        Self
    }
}

fn to_hkl(handle: LayoutHandle) -> HKL {
    handle.0 as usize as HKL
}

fn from_hkl(hkl: HKL) -> Option<LayoutHandle> {
    (!hkl.is_null()).then(|| LayoutHandle(hkl as usize as u64))
}

fn to_hwnd(window: WindowHandle) -> HWND {
    window.0 as usize as HWND
}

impl LayoutHost for Win32LayoutHost {
    fn installed_layouts(&self) -> Vec<LayoutHandle> {
        // SAFETY: a null buffer with size 0 only queries the count
        let count = unsafe { GetKeyboardLayoutList(0, ptr::null_mut()) };
        if count <= 0 {
            return Vec::new();
        }
        let mut list: Vec<HKL> = vec![ptr::null_mut(); count as usize];
        // SAFETY: `list` has room for `count` handles
        let filled = unsafe { GetKeyboardLayoutList(count, list.as_mut_ptr()) };
        list.truncate(filled.max(0) as usize);
        list.into_iter().filter_map(from_hkl).collect()
    }

    fn load_layout(&self, klid: &str) -> Option<LayoutHandle> {
        let wide: Vec<u16> = klid.encode_utf16().chain(iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call
        from_hkl(unsafe { LoadKeyboardLayoutW(wide.as_ptr(), 0) })
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: no arguments
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_null()).then(|| WindowHandle(hwnd as usize as u64))
    }

    fn window_thread(&self, window: WindowHandle) -> Option<OsThreadId> {
        // SAFETY: the process id out-pointer may be null
        let tid = unsafe { GetWindowThreadProcessId(to_hwnd(window), ptr::null_mut()) };
        (tid != 0).then_some(OsThreadId(tid))
    }

    fn thread_layout(&self, thread: OsThreadId) -> Option<LayoutHandle> {
        // SAFETY: plain query by thread id
        from_hkl(unsafe { GetKeyboardLayout(thread.0) })
    }

    fn current_thread(&self) -> OsThreadId {
        // SAFETY: no arguments
        OsThreadId(unsafe { GetCurrentThreadId() })
    }

    fn attach_input(&self, from: OsThreadId, to: OsThreadId, attach: bool) -> bool {
        // SAFETY: plain call by thread ids
        unsafe { AttachThreadInput(from.0, to.0, i32::from(attach)) != 0 }
    }

    fn activate_layout(&self, layout: LayoutHandle) -> Result<(), LayoutError> {
        // SAFETY: the handle came from the layout list or LoadKeyboardLayoutW
        let previous = unsafe { ActivateKeyboardLayout(to_hkl(layout), KLF_SETFORPROCESS) };
        if previous.is_null() {
            return Err(LayoutError::ActivationFailed(format!(
                "ActivateKeyboardLayout({}) failed",
                layout
            )));
        }
        Ok(())
    }

    fn request_layout_change(
        &self,
        window: WindowHandle,
        layout: LayoutHandle,
    ) -> Result<(), LayoutError> {
        let hwnd = to_hwnd(window);
        // SAFETY: IsWindow accepts any value
        if unsafe { IsWindow(hwnd) } == 0 {
            return Err(LayoutError::WindowGone);
        }
        // SAFETY: the message carries the layout handle in lParam
        let posted = unsafe {
            PostMessageW(
                hwnd,
                WM_INPUTLANGCHANGEREQUEST,
                0,
                to_hkl(layout) as isize,
            )
        };
        if posted == 0 {
            return Err(LayoutError::WindowGone);
        }
        Ok(())
    }
}
