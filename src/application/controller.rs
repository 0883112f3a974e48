//! Session controller: start/stop/reset/status over one typing engine

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::error::RequestError;
use crate::domain::session::{InvalidStateTransition, StatusSnapshot, TypingPhase, TypingSession};
use crate::domain::typing::{preprocess, PreprocessOptions, TypingRequest};

use super::cancel::CancellationToken;
use super::engine::{EngineServices, TypingEngine};

/// Upper bound on how long `stop` waits for the engine to notice
pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Why `start` refused a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartRejected {
    #[error("{0}")]
    Invalid(#[from] RequestError),

    #[error("A typing session is already active")]
    AlreadyActive,
}

struct RunningEngine {
    handle: JoinHandle<TypingPhase>,
    cancel: CancellationToken,
}

/// Owns the session record and at most one running engine.
///
/// Must be used from within a Tokio runtime; the engine runs on the
/// blocking pool.
pub struct SessionController {
    session: Arc<Mutex<TypingSession>>,
    running: Mutex<Option<RunningEngine>>,
    services: EngineServices,
}

impl SessionController {
    pub fn new(services: EngineServices) -> Self {
        Self {
            session: Arc::new(Mutex::new(TypingSession::new())),
            running: Mutex::new(None),
            services,
        }
    }

    fn session(&self) -> MutexGuard<'_, TypingSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn running(&self) -> MutexGuard<'_, Option<RunningEngine>> {
        self.running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Accept a request and launch the engine in the background.
    ///
    /// Rejections leave the current session untouched.
    pub fn start(&self, request: TypingRequest) -> Result<(), StartRejected> {
        request.validate()?;

        let mut running = self.running();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return Err(StartRejected::AlreadyActive);
        }

        let text = preprocess(
            &request.text,
            PreprocessOptions::new(request.preserve_indentation)
                .with_tab_width(self.services.settings.tab_width),
        );

        let generation = self
            .session()
            .begin(text.chars().count())
            .map_err(|_| StartRejected::AlreadyActive)?;

        let cancel = CancellationToken::new();
        let engine = TypingEngine::new(
            self.services.clone(),
            Arc::clone(&self.session),
            generation,
            cancel.clone(),
        );

        info!(
            chars = request.char_count(),
            speed = request.chars_per_second,
            countdown = request.countdown_secs,
            ide_mode = request.preserve_indentation,
            "Typing session accepted"
        );

        let handle = tokio::task::spawn_blocking(move || engine.run(&request, &text));
        *running = Some(RunningEngine { handle, cancel });
        Ok(())
    }

    /// Request cancellation and wait a bounded time for the engine.
    ///
    /// Afterwards the session is ABORTED and not typing, whether or not the
    /// engine thread has actually exited. An engine that is still running
    /// loses the session and can no longer write to it.
    pub async fn stop(&self) {
        self.session().request_cancel();
        let running = self.running().take();

        if let Some(RunningEngine { handle, cancel }) = running {
            cancel.cancel();
            match tokio::time::timeout(STOP_TIMEOUT, handle).await {
                Ok(Ok(phase)) => debug!(%phase, "Engine stopped"),
                Ok(Err(e)) => warn!(error = %e, "Engine task failed"),
                Err(_) => warn!("Engine did not stop within {:?}", STOP_TIMEOUT),
            }
        }

        let mut session = self.session();
        session.halt();
        info!(status = %session.phase(), "Stop acknowledged");
    }

    /// Return to IDLE from a terminal phase
    pub fn reset(&self) -> Result<(), InvalidStateTransition> {
        self.session().reset()?;
        let mut running = self.running();
        if running.as_ref().is_some_and(|r| r.handle.is_finished()) {
            *running = None;
        }
        debug!("Session reset");
        Ok(())
    }

    /// Current status view
    pub fn status(&self) -> StatusSnapshot {
        self.session().snapshot()
    }

    /// Whether a session is running or still owns the engine thread
    pub fn is_active(&self) -> bool {
        let typing = self.session().is_typing();
        let engine_alive = self
            .running()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished());
        typing || engine_alive
    }

    /// Wait for the current engine to finish
    pub async fn join(&self) -> Option<TypingPhase> {
        let running = self.running().take()?;
        match running.handle.await {
            Ok(phase) => Some(phase),
            Err(e) => {
                warn!(error = %e, "Engine task failed");
                None
            }
        }
    }
}
