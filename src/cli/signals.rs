//! Signal handlers for one-shot and daemon modes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::Colorize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::ipc::DaemonCommand;

/// Interrupt flag for one-shot mode
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Raise the flag on the first Ctrl+C or SIGTERM
    pub fn setup(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        tokio::spawn(async move {
            let signal = wait_for_shutdown().await;
            debug!(signal, "Interrupt received");
            shutdown.store(true, Ordering::SeqCst);
        });
    }
}

/// Resolve with the name of the first shutdown signal delivered
///
/// A listener that cannot be installed never resolves, so the other one
/// still works.
async fn wait_for_shutdown() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "interrupt",
            Err(e) => {
                warn!(error = %e, "Ctrl+C listener unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM listener unavailable");
                std::future::pending().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A control command waiting for the daemon loop's reply
#[derive(Debug)]
pub struct DaemonRequest {
    pub command: DaemonCommand,
    pub reply: oneshot::Sender<String>,
}

/// Events consumed by the daemon loop
#[derive(Debug)]
pub enum DaemonEvent {
    /// Command from an IPC client
    Command(DaemonRequest),
    /// Shutdown daemon (Ctrl+C / SIGTERM)
    Shutdown,
}

/// Daemon signal handler
///
/// Turns OS shutdown signals into `DaemonEvent::Shutdown` and hands out a
/// sender so the IPC server can queue commands on the same channel.
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonEvent>,
}

impl DaemonSignalHandler {
    /// Create the handler and start listening for shutdown signals
    pub fn new() -> (Self, mpsc::Sender<DaemonEvent>) {
        let (tx, rx) = mpsc::channel(16);

        let shutdown_tx = tx.clone();
        tokio::spawn(async move {
            let signal = wait_for_shutdown().await;
            eprintln!("{} Received {} (shutdown)", "↓".cyan(), signal);
            let _ = shutdown_tx.send(DaemonEvent::Shutdown).await;
        });

        (Self { receiver: rx }, tx)
    }

    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<DaemonEvent> {
        self.receiver.recv().await
    }
}
