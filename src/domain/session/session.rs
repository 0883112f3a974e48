//! Typing session record

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::phase::TypingPhase;

/// Last-event markers reported through the status poll
pub mod events {
    pub const SYSTEM_READY: &str = "SYSTEM_READY";
    pub const INIT_SEQ: &str = "INIT_SEQ";
    pub const PREP_PHASE: &str = "PREP_PHASE";
    pub const INITIATED: &str = "INITIATED";
    pub const MISSION_SUCCESS: &str = "MISSION_SUCCESS";
    pub const USER_HALT: &str = "USER_HALT";
}

/// Maximum number of characters of an error message kept in `last_event`
pub const ERROR_EVENT_MAX_CHARS: usize = 20;

/// Error when an invalid session transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while in {current_phase} state")]
pub struct InvalidStateTransition {
    pub current_phase: TypingPhase,
    pub action: String,
}

/// Status view handed to pollers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_typing: bool,
    pub progress: usize,
    pub total_chars: usize,
    pub progress_percent: u8,
    pub current_status: String,
    pub last_event: String,
}

impl StatusSnapshot {
    /// Whether the reported status is terminal
    pub fn is_finished(&self) -> bool {
        !self.is_typing
            && matches!(
                self.current_status.as_str(),
                "COMPLETED" | "ABORTED" | "ERROR" | "IDLE"
            )
    }
}

/// The single mutable run state.
///
/// Invariants: `chars_typed <= total_chars`, and once `cancel_requested` is
/// set it stays set until the next `begin`. `generation` changes on every
/// `begin` and `reset`, so a late writer from an earlier run can tell its
/// session is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSession {
    is_typing: bool,
    chars_typed: usize,
    total_chars: usize,
    phase: TypingPhase,
    last_event: String,
    cancel_requested: bool,
    generation: u64,
}

impl Default for TypingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingSession {
    /// Create an idle session record
    pub fn new() -> Self {
        Self {
            is_typing: false,
            chars_typed: 0,
            total_chars: 0,
            phase: TypingPhase::Idle,
            last_event: events::SYSTEM_READY.to_string(),
            cancel_requested: false,
            generation: 0,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn chars_typed(&self) -> usize {
        self.chars_typed
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn last_event(&self) -> &str {
        &self.last_event
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accept a new session: IDLE/terminal -> PREPARING.
    ///
    /// Returns the generation of the new run.
    pub fn begin(&mut self, total_chars: usize) -> Result<u64, InvalidStateTransition> {
        if self.is_typing {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "start typing".to_string(),
            });
        }
        *self = Self {
            is_typing: true,
            chars_typed: 0,
            total_chars,
            phase: TypingPhase::Preparing,
            last_event: events::INIT_SEQ.to_string(),
            cancel_requested: false,
            generation: self.generation.wrapping_add(1),
        };
        Ok(self.generation)
    }

    /// Publish a countdown tick
    pub fn countdown(&mut self, remaining: u32) {
        self.phase = TypingPhase::Countdown { remaining };
        self.last_event = events::PREP_PHASE.to_string();
    }

    /// Enter the typing phase with the length of the preprocessed text
    pub fn enter_typing(&mut self, total_chars: usize) {
        self.phase = TypingPhase::Typing;
        self.last_event = events::INITIATED.to_string();
        self.total_chars = total_chars;
        self.chars_typed = self.chars_typed.min(total_chars);
    }

    /// Count typed units, never past `total_chars`
    pub fn advance(&mut self, count: usize) {
        self.chars_typed = self.chars_typed.saturating_add(count).min(self.total_chars);
    }

    /// Record a cancellation request
    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Terminal transition: COMPLETED
    pub fn complete(&mut self) {
        self.finish(TypingPhase::Completed, events::MISSION_SUCCESS.to_string());
    }

    /// Terminal transition: ABORTED
    pub fn abort(&mut self) {
        self.finish(TypingPhase::Aborted, events::USER_HALT.to_string());
    }

    /// Forced stop: ABORTED from any phase.
    ///
    /// Also retires the current generation, so a run that has not exited yet
    /// can no longer write to the session.
    pub fn halt(&mut self) {
        self.abort();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Terminal transition: ERROR with a truncated diagnostic
    pub fn fail(&mut self, message: &str) {
        let short: String = message.chars().take(ERROR_EVENT_MAX_CHARS).collect();
        self.finish(TypingPhase::Error, format!("ERROR_{}", short));
    }

    fn finish(&mut self, phase: TypingPhase, event: String) {
        self.is_typing = false;
        self.phase = phase;
        self.last_event = event;
    }

    /// Return to IDLE; only allowed from a terminal phase
    pub fn reset(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.phase.is_terminal() || self.is_typing {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "reset".to_string(),
            });
        }
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::new()
        };
        Ok(())
    }

    /// Build the status view for pollers
    pub fn snapshot(&self) -> StatusSnapshot {
        let progress_percent = if self.total_chars > 0 {
            // chars_typed <= total_chars, so this fits in a u8
            (self.chars_typed * 100 / self.total_chars) as u8
        } else {
            0
        };
        StatusSnapshot {
            is_typing: self.is_typing,
            progress: self.chars_typed,
            total_chars: self.total_chars,
            progress_percent,
            current_status: self.phase.as_wire(),
            last_event: self.last_event.clone(),
        }
    }
}
