//! Pacing port interface

use std::time::Duration;

/// Port for blocking waits between keystrokes
pub trait Sleeper: Send + Sync {
    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}
