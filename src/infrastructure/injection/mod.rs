//! Key injection infrastructure module
//!
//! Provides SendInput-based injection on Windows (scan codes plus virtual
//! keys) and enigo everywhere else.

mod enigo;
mod factory;
#[cfg(windows)]
mod win32;

pub use enigo::EnigoInjector;
pub use factory::{
    create_injector, injector_factory, InjectorPreference, ParseInjectorError, VALID_INJECTORS,
};
#[cfg(windows)]
pub use win32::Win32Injector;
