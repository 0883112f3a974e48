//! IPC (Inter-Process Communication) module for daemon control
//!
//! One request line in, one response line out:
//!
//! | request               | response                    |
//! |-----------------------|-----------------------------|
//! | `start <json>`        | `ok` or `error: <reason>`   |
//! | `stop`                | `ok`                        |
//! | `reset`               | `ok` or `error: <reason>`   |
//! | `status`              | status JSON                 |
//! | `health`              | `healthy`                   |
//!
//! Provides platform-specific transports:
//! - Unix (Linux/macOS): Unix Domain Sockets
//! - Windows: Named Pipes

#[cfg(windows)]
mod named_pipe;
#[cfg(unix)]
mod unix_socket;

#[cfg(windows)]
pub use named_pipe::{NamedPipeClient, NamedPipeServer, PipePath};
#[cfg(unix)]
pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::signals::{DaemonEvent, DaemonRequest};
use crate::domain::error::RequestError;
use crate::domain::typing::TypingRequest;

/// Reply sent when the daemon loop is gone
const SHUTTING_DOWN: &str = "error: daemon is shutting down";

/// How long a client waits for the daemon's reply
const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on one request line
const MAX_REQUEST_BYTES: u64 = 8 * 1024 * 1024;

/// A parsed control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonCommand {
    Start(TypingRequest),
    Stop,
    Reset,
    Status,
    Health,
}

/// Why a request line could not be understood
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown command")]
    UnknownCommand,

    #[error("{0}")]
    Request(#[from] RequestError),
}

impl DaemonCommand {
    /// Parse one request line (without the trailing newline)
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb {
            "start" => Ok(Self::Start(TypingRequest::from_json(rest)?)),
            "stop" => Ok(Self::Stop),
            "reset" => Ok(Self::Reset),
            "status" => Ok(Self::Status),
            "health" => Ok(Self::Health),
            _ => Err(ProtocolError::UnknownCommand),
        }
    }

    /// Encode as a request line (without the trailing newline)
    pub fn to_line(&self) -> Result<String, RequestError> {
        Ok(match self {
            Self::Start(request) => format!("start {}", request.to_json()?),
            Self::Stop => "stop".to_string(),
            Self::Reset => "reset".to_string(),
            Self::Status => "status".to_string(),
            Self::Health => "health".to_string(),
        })
    }
}

/// Parse `line`, queue it for the daemon loop and wait for the reply
pub async fn handle_line(tx: &mpsc::Sender<DaemonEvent>, line: &str) -> String {
    let command = match DaemonCommand::parse(line) {
        Ok(command) => command,
        Err(e) => return format!("error: {}", e),
    };

    let (reply, response) = oneshot::channel();
    let request = DaemonRequest { command, reply };
    if tx.send(DaemonEvent::Command(request)).await.is_err() {
        return SHUTTING_DOWN.to_string();
    }
    response
        .await
        .unwrap_or_else(|_| SHUTTING_DOWN.to_string())
}

/// Serve a single connection: one request line in, one reply line out
async fn serve_stream<S>(stream: S, tx: mpsc::Sender<DaemonEvent>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut line = String::new();
    BufReader::new(reader)
        .take(MAX_REQUEST_BYTES)
        .read_line(&mut line)
        .await?;
    debug!(
        command = line.split_whitespace().next().unwrap_or(""),
        "IPC request"
    );

    let mut response = handle_line(&tx, &line).await;
    response.push('\n');
    writer.write_all(response.as_bytes()).await?;
    writer.shutdown().await
}

/// Write `line` to a connected stream and wait for the reply line
async fn exchange<S>(stream: S, line: &str) -> io::Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    writer.write_all(format!("{}\n", line).as_bytes()).await?;
    writer.flush().await?;

    let mut response = String::new();
    let mut reader = BufReader::new(reader);
    match tokio::time::timeout(CLIENT_TIMEOUT, reader.read_line(&mut response)).await {
        Ok(read) => read?,
        Err(_) => {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "daemon did not reply in time",
            ))
        }
    };

    if response.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "daemon closed the connection",
        ));
    }
    Ok(response)
}

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept and handle connections
    ///
    /// Each request line is forwarded to the daemon loop through `tx` and
    /// the loop's reply is written back to the client.
    async fn run(&self, tx: mpsc::Sender<DaemonEvent>) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a command and receive response
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Create the appropriate IPC server for the current platform
#[cfg(unix)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(NamedPipeServer::new(PipePath::new()))
}

/// Create the appropriate IPC client for the current platform
#[cfg(unix)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(NamedPipeClient::new(PipePath::new()))
}
