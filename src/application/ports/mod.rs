//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod key_injector;
pub mod layout_host;
pub mod sleeper;

// Re-export common types
pub use config::ConfigStore;
pub use key_injector::{InjectError, InjectorFactory, KeyDirection, KeyInjector, NamedKey};
pub use layout_host::{LayoutError, LayoutHandle, LayoutHost, OsThreadId, WindowHandle};
pub use sleeper::Sleeper;
