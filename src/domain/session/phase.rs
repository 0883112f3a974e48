//! Typing phases

use std::fmt;

/// Phase of the (single) typing session.
///
/// State machine:
///   IDLE -> PREPARING (start)
///   PREPARING -> COUNTDOWN_<n>S -> TYPING
///   COUNTDOWN / TYPING -> COMPLETED | ABORTED | ERROR
///   COMPLETED | ABORTED | ERROR -> IDLE (reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypingPhase {
    #[default]
    Idle,
    Preparing,
    Countdown {
        remaining: u32,
    },
    Typing,
    Completed,
    Aborted,
    Error,
}

impl TypingPhase {
    /// Whether the phase ends a session (or there is no session at all)
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Completed | Self::Aborted | Self::Error
        )
    }

    /// Status string used by the control protocol
    pub fn as_wire(&self) -> String {
        match self {
            Self::Idle => "IDLE".to_string(),
            Self::Preparing => "PREPARING".to_string(),
            Self::Countdown { remaining } => format!("COUNTDOWN_{}S", remaining),
            Self::Typing => "TYPING".to_string(),
            Self::Completed => "COMPLETED".to_string(),
            Self::Aborted => "ABORTED".to_string(),
            Self::Error => "ERROR".to_string(),
        }
    }
}

impl fmt::Display for TypingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Preparing => write!(f, "preparing"),
            Self::Countdown { remaining } => write!(f, "countdown ({}s)", remaining),
            Self::Typing => write!(f, "typing"),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
            Self::Error => write!(f, "error"),
        }
    }
}
