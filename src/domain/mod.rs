//! Domain layer - Core typing logic
//!
//! Contains value objects, the session state machine, and domain errors.
//! This layer has no dependencies on the operating system.

pub mod config;
pub mod error;
pub mod session;
pub mod typing;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use session::{StatusSnapshot, TypingPhase, TypingSession};
pub use typing::{CharacterClass, TypingRequest};
