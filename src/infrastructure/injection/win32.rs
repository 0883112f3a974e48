//! Windows key injector using SendInput

use std::mem;

use windows_sys::Win32::Foundation::{GetLastError, ERROR_ACCESS_DENIED};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_EXTENDEDKEY,
    KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, KEYEVENTF_UNICODE,
};

use crate::application::ports::{InjectError, KeyDirection, KeyInjector, NamedKey};

/// Key injector backed by `SendInput`
#[derive(Debug, Default)]
pub struct Win32Injector;

impl Win32Injector {
    pub fn new() -> Self {
        Self
    }
}

fn keyboard_input(vk: u16, scan: u16, flags: u32) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn up_flag(direction: KeyDirection) -> u32 {
    match direction {
        KeyDirection::Press => 0,
        KeyDirection::Release => KEYEVENTF_KEYUP,
    }
}

fn send(inputs: &[INPUT]) -> Result<(), InjectError> {
    // SAFETY: `inputs` is a valid slice of fully initialised INPUT records
    let sent = unsafe {
        SendInput(
            inputs.len() as u32,
            inputs.as_ptr(),
            mem::size_of::<INPUT>() as i32,
        )
    };
    if sent as usize == inputs.len() {
        return Ok(());
    }
    // SAFETY: reads the calling thread's last-error slot
    let last_error = unsafe { GetLastError() };
    Err(send_failure(sent, inputs.len(), last_error))
}

/// Nothing injected with access denied means the input desktop is gone
/// (workstation locked or a secure desktop is up); later keys cannot land either.
fn send_failure(sent: u32, expected: usize, last_error: u32) -> InjectError {
    if sent == 0 && last_error == ERROR_ACCESS_DENIED {
        InjectError::Disconnected("input desktop is not available".to_string())
    } else {
        InjectError::Rejected(format!(
            "SendInput injected {} of {} events (error {})",
            sent, expected, last_error
        ))
    }
}

impl KeyInjector for Win32Injector {
    fn unicode_char(&mut self, ch: char) -> Result<(), InjectError> {
        let mut units = [0u16; 2];
        let inputs: Vec<INPUT> = ch
            .encode_utf16(&mut units)
            .iter()
            .flat_map(|&unit| {
                [
                    keyboard_input(0, unit, KEYEVENTF_UNICODE),
                    keyboard_input(0, unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP),
                ]
            })
            .collect();
        send(&inputs)
    }

    fn scan_code(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError> {
        let mut flags = KEYEVENTF_SCANCODE | up_flag(direction);
        if key.is_extended() {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }
        send(&[keyboard_input(0, key.scan_code(), flags)])
    }

    fn virtual_key(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError> {
        let mut flags = up_flag(direction);
        if key.is_extended() {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }
        send(&[keyboard_input(key.virtual_key(), 0, flags)])
    }

    fn name(&self) -> &'static str {
        "win32"
    }
}
