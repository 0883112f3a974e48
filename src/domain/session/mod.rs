//! Typing session domain module

mod phase;
#[allow(clippy::module_inception)]
mod session;

pub use phase::TypingPhase;
pub use session::{
    events, InvalidStateTransition, StatusSnapshot, TypingSession, ERROR_EVENT_MAX_CHARS,
};
