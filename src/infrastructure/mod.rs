//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the OS input system, keyboard layouts, and config files.

pub mod clock;
pub mod config;
pub mod injection;
pub mod layout;

// Re-export adapters
pub use clock::ThreadSleeper;
pub use config::XdgConfigStore;
pub use injection::{create_injector, injector_factory, EnigoInjector, InjectorPreference};
pub use layout::{platform_layout_host, UnsupportedLayoutHost};
