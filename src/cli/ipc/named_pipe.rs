//! Named pipe transport for daemon control on Windows

use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::windows::named_pipe::{
    ClientOptions, NamedPipeServer as PipeInstance, ServerOptions,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use windows_sys::Win32::Foundation::ERROR_PIPE_BUSY;

use super::{exchange, serve_stream, IpcClient, IpcServer, CLIENT_TIMEOUT};
use crate::cli::signals::DaemonEvent;

const PIPE_NAME: &str = r"\\.\pipe\keytyper";

/// Pause between attempts while every pipe instance is busy
const BUSY_RETRY: Duration = Duration::from_millis(50);

/// Name of the control pipe
#[derive(Debug, Clone)]
pub struct PipePath {
    path: String,
}

impl PipePath {
    pub fn new() -> Self {
        Self {
            path: PIPE_NAME.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether some process is serving the pipe
    pub fn exists(&self) -> bool {
        std::fs::metadata(&self.path).is_ok()
    }
}

impl Default for PipePath {
    fn default() -> Self {
        Self::new()
    }
}

/// Daemon side of the pipe
///
/// `bind` creates the first instance so a second daemon fails up front
/// instead of sharing the name.
pub struct NamedPipeServer {
    pipe_path: PipePath,
    first: Mutex<Option<PipeInstance>>,
}

impl NamedPipeServer {
    pub fn new(pipe_path: PipePath) -> Self {
        Self {
            pipe_path,
            first: Mutex::new(None),
        }
    }

    fn next_instance(&self) -> io::Result<PipeInstance> {
        ServerOptions::new().create(self.pipe_path.path())
    }
}

#[async_trait]
impl IpcServer for NamedPipeServer {
    fn bind(&mut self) -> io::Result<()> {
        let instance = ServerOptions::new()
            .first_pipe_instance(true)
            .create(self.pipe_path.path())?;
        *self.first.get_mut().unwrap_or_else(|e| e.into_inner()) = Some(instance);
        debug!(pipe = self.pipe_path.path(), "Pipe created");
        Ok(())
    }

    fn path(&self) -> String {
        self.pipe_path.path().to_string()
    }

    async fn run(&self, tx: mpsc::Sender<DaemonEvent>) -> io::Result<()> {
        let first = self.first.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(mut instance) = first else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "pipe not bound"));
        };

        loop {
            instance.connect().await?;
            // Queue the next instance before serving so clients never see
            // the name missing
            let connected = std::mem::replace(&mut instance, self.next_instance()?);

            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_stream(connected, tx).await {
                    warn!(error = %e, "Pipe connection failed");
                }
            });
        }
    }

    fn cleanup(&self) {
        // The name disappears with the last handle
        self.first.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}

/// Control-side client: one connection per command
pub struct NamedPipeClient {
    pipe_path: PipePath,
}

impl NamedPipeClient {
    pub fn new(pipe_path: PipePath) -> Self {
        Self { pipe_path }
    }
}

#[async_trait]
impl IpcClient for NamedPipeClient {
    fn is_daemon_running(&self) -> bool {
        self.pipe_path.exists()
    }

    async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let deadline = Instant::now() + CLIENT_TIMEOUT;
        let client = loop {
            match ClientOptions::new().open(self.pipe_path.path()) {
                Ok(client) => break client,
                Err(e)
                    if e.raw_os_error() == Some(ERROR_PIPE_BUSY as i32)
                        && Instant::now() < deadline =>
                {
                    tokio::time::sleep(BUSY_RETRY).await;
                }
                Err(e) => return Err(e),
            }
        };
        exchange(client, cmd).await
    }
}
