//! Application layer - Typing services and port interfaces
//!
//! Contains the engine, the session controller, and the trait definitions
//! for keyboard injection and layout control.

pub mod cancel;
pub mod controller;
pub mod emitter;
pub mod engine;
pub mod layout;
pub mod ports;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

// Re-export services
pub use cancel::CancellationToken;
pub use controller::{SessionController, StartRejected, STOP_TIMEOUT};
pub use emitter::{EmitError, KeyEmitter, KeyTiming};
pub use engine::{EngineServices, EngineSettings, TypingEngine};
pub use layout::LayoutResolver;
pub use window::{LayoutBinding, LayoutLock, WindowContextTracker};
