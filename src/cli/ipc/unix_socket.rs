//! Unix Domain Socket communication for daemon control
//!
//! Used on Linux and macOS.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{exchange, serve_stream, IpcClient, IpcServer};
use crate::cli::signals::DaemonEvent;

const SOCKET_NAME: &str = "keytyper.sock";

/// Where the control socket lives
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// `$XDG_RUNTIME_DIR/keytyper.sock`, or the temp dir when unset
    pub fn new() -> Self {
        let dir = std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self {
            path: dir.join(SOCKET_NAME),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the socket file; a missing file is fine
    pub fn cleanup(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Daemon side of the socket; removes the socket file when dropped
pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[async_trait]
impl IpcServer for UnixSocketServer {
    fn bind(&mut self) -> io::Result<()> {
        // Left behind by a daemon that did not exit cleanly
        self.socket_path.cleanup()?;
        self.listener = Some(UnixListener::bind(self.socket_path.path())?);
        debug!(path = %self.socket_path.path().display(), "Socket bound");
        Ok(())
    }

    fn path(&self) -> String {
        self.socket_path.path().display().to_string()
    }

    async fn run(&self, tx: mpsc::Sender<DaemonEvent>) -> io::Result<()> {
        let Some(listener) = self.listener.as_ref() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "socket not bound",
            ));
        };

        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!(error = %e, "Socket accept failed");
                    continue;
                }
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_stream(stream, tx).await {
                    warn!(error = %e, "Socket connection failed");
                }
            });
        }
    }

    fn cleanup(&self) {
        if let Err(e) = self.socket_path.cleanup() {
            warn!(error = %e, "Could not remove socket file");
        }
    }
}

/// Control-side client: one connection per command
pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl IpcClient for UnixSocketClient {
    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        exchange(stream, cmd).await
    }
}
