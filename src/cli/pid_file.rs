//! Single-instance guard for the daemon
//!
//! The file lives next to the control socket and holds the daemon's PID.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

const PID_FILE_NAME: &str = "keytyper.pid";

pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// `$XDG_RUNTIME_DIR/keytyper.pid`, or the temp dir when unset
    pub fn new() -> Self {
        let dir = std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::with_path(dir.join(PID_FILE_NAME))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn recorded_pid(&self) -> Option<u32> {
        fs::read_to_string(&self.path).ok()?.trim().parse().ok()
    }

    /// PID of another live daemon recorded in the file, if any
    ///
    /// A file naming a dead process is removed.
    pub fn is_running(&self) -> Option<u32> {
        let pid = self.recorded_pid()?;
        if pid == process::id() {
            return None;
        }

        let raw = i32::try_from(pid).ok()?;
        // No signal: existence check only
        match kill(Pid::from_raw(raw), None::<Signal>) {
            Ok(()) | Err(Errno::EPERM) => Some(pid),
            Err(Errno::ESRCH) => {
                debug!(pid, path = %self.path.display(), "Removing stale PID file");
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(_) => None,
        }
    }

    /// Record this process, failing if another daemon holds the file
    pub fn acquire(&self) -> Result<(), PidFileError> {
        if let Some(pid) = self.is_running() {
            return Err(PidFileError::AlreadyRunning(pid));
        }
        fs::write(&self.path, process::id().to_string()).map_err(|source| {
            PidFileError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Remove the file if it still names this process
    pub fn release(&self) -> Result<(), PidFileError> {
        if self.recorded_pid() != Some(process::id()) {
            return Ok(());
        }
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(PidFileError::Remove {
                path: self.path.clone(),
                source: e,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another daemon is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Failed to write PID file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to remove PID file {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}
