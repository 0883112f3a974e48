//! Daemon app runner

use std::process::ExitCode;

use tracing::{error, info};

use crate::application::SessionController;
use crate::domain::config::AppConfig;

use super::app::{build_services, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
use super::ipc::{create_ipc_server, DaemonCommand};
#[cfg(unix)]
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{DaemonEvent, DaemonRequest, DaemonSignalHandler};

/// Run daemon mode
pub async fn run_daemon(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    #[cfg(unix)]
    let pid_file = match acquire_pid_file(&presenter) {
        Some(pid_file) => pid_file,
        None => return ExitCode::from(EXIT_ERROR),
    };

    let services = match build_services(&config) {
        Ok(services) => services,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let controller = SessionController::new(services);

    // Signal handler also hands out the sender the IPC server queues commands on
    let (mut signals, event_tx) = DaemonSignalHandler::new();

    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind {}: {}", server.path(), e));
        return ExitCode::from(EXIT_ERROR);
    }
    let endpoint = server.path();

    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run(event_tx).await {
            error!(error = %e, "IPC server stopped");
        }
    });

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | Endpoint: {} | Ctrl+C: exit",
        std::process::id(),
        endpoint
    ));
    info!(endpoint = %endpoint, "Daemon listening");

    let result = daemon_loop(&controller, &mut signals, &presenter).await;

    // Dropping the server removes the socket file
    server_task.abort();
    let _ = server_task.await;
    #[cfg(unix)]
    let _ = pid_file.release();

    if result {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

#[cfg(unix)]
fn acquire_pid_file(presenter: &Presenter) -> Option<PidFile> {
    let pid_file = PidFile::new();
    match pid_file.acquire() {
        Ok(()) => Some(pid_file),
        Err(PidFileError::AlreadyRunning(pid)) => {
            presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            None
        }
        Err(e) => {
            presenter.error(&e.to_string());
            None
        }
    }
}

async fn daemon_loop(
    controller: &SessionController,
    signals: &mut DaemonSignalHandler,
    presenter: &Presenter,
) -> bool {
    loop {
        match signals.recv().await {
            Some(DaemonEvent::Command(DaemonRequest { command, reply })) => {
                let response = dispatch(controller, command, presenter).await;
                let _ = reply.send(response);
            }
            Some(DaemonEvent::Shutdown) => {
                presenter.info("Processing shutdown");
                if controller.is_active() {
                    controller.stop().await;
                }
                presenter.daemon_status("Shutting down...");
                return true;
            }
            None => {
                // Channel closed
                return false;
            }
        }
    }
}

/// Apply one control command and build the response line
async fn dispatch(
    controller: &SessionController,
    command: DaemonCommand,
    presenter: &Presenter,
) -> String {
    match command {
        DaemonCommand::Start(request) => {
            let chars = request.char_count();
            match controller.start(request) {
                Ok(()) => {
                    presenter.daemon_status(&format!("Typing {} characters", chars));
                    "ok".to_string()
                }
                Err(e) => {
                    presenter.warn(&format!("Start rejected: {}", e));
                    format!("error: {}", e)
                }
            }
        }
        DaemonCommand::Stop => {
            controller.stop().await;
            presenter.daemon_status(&format!("Stopped ({})", controller.status().current_status));
            "ok".to_string()
        }
        DaemonCommand::Reset => match controller.reset() {
            Ok(()) => {
                presenter.daemon_status("Idle");
                "ok".to_string()
            }
            Err(e) => format!("error: {}", e),
        },
        DaemonCommand::Status => serde_json::to_string(&controller.status())
            .unwrap_or_else(|e| format!("error: {}", e)),
        DaemonCommand::Health => "healthy".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::testing::{recording_factory, FakeLayoutHost, InstantSleeper, KeyLog};
    use crate::application::{EngineServices, EngineSettings, LayoutLock, LayoutResolver};
    use crate::domain::session::StatusSnapshot;
    use crate::domain::typing::TypingRequest;

    fn controller(log: &KeyLog) -> SessionController {
        SessionController::new(EngineServices {
            injector_factory: recording_factory(log.clone()),
            layout_host: Arc::new(FakeLayoutHost::new(vec![])),
            resolver: Arc::new(LayoutResolver::empty()),
            sleeper: Arc::new(InstantSleeper::default()),
            settings: EngineSettings::default(),
            layout_lock: LayoutLock::default(),
        })
    }

    fn request(text: &str) -> TypingRequest {
        TypingRequest {
            countdown_secs: 0,
            jitter_percent: 0,
            send_enter_at_end: false,
            ..TypingRequest::new(text)
        }
    }

    #[tokio::test]
    async fn health_and_idle_status() {
        let log = KeyLog::default();
        let controller = controller(&log);
        let presenter = Presenter::new();

        assert_eq!(
            dispatch(&controller, DaemonCommand::Health, &presenter).await,
            "healthy"
        );

        let json = dispatch(&controller, DaemonCommand::Status, &presenter).await;
        let status: StatusSnapshot = serde_json::from_str(&json).unwrap();
        assert!(!status.is_typing);
        assert_eq!(status.current_status, "IDLE");
    }

    #[tokio::test]
    async fn start_then_status_reports_completion() {
        let log = KeyLog::default();
        let controller = controller(&log);
        let presenter = Presenter::new();

        let reply = dispatch(
            &controller,
            DaemonCommand::Start(request("abc")),
            &presenter,
        )
        .await;
        assert_eq!(reply, "ok");
        controller.join().await;

        let json = dispatch(&controller, DaemonCommand::Status, &presenter).await;
        let status: StatusSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(status.current_status, "COMPLETED");
        assert_eq!(status.progress, 3);
        assert_eq!(log.strokes(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn start_rejects_blank_text() {
        let log = KeyLog::default();
        let controller = controller(&log);
        let presenter = Presenter::new();

        let reply = dispatch(
            &controller,
            DaemonCommand::Start(request("   ")),
            &presenter,
        )
        .await;
        assert_eq!(reply, "error: No text provided");
        assert_eq!(controller.status().current_status, "IDLE");
    }

    #[tokio::test]
    async fn stop_and_reset() {
        let log = KeyLog::default();
        let controller = controller(&log);
        let presenter = Presenter::new();

        assert_eq!(
            dispatch(&controller, DaemonCommand::Stop, &presenter).await,
            "ok"
        );
        assert_eq!(
            dispatch(&controller, DaemonCommand::Reset, &presenter).await,
            "ok"
        );
        assert!(!controller.is_active());
    }
}
