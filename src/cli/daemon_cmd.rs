//! Daemon command handler - sends commands to running daemon via IPC

use crate::domain::config::AppConfig;

use super::app::TextSource;
use super::args::DaemonAction;
use super::ipc::{create_ipc_client, DaemonCommand};
use super::presenter::Presenter;

/// Handle daemon subcommand
///
/// `config` supplies the request settings a `start` does not override.
pub async fn handle_daemon_command(
    action: DaemonAction,
    config: AppConfig,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: keytyper --daemon".to_string());
    }

    let command = build_command(action, config).await?;
    let line = command.to_line().map_err(|e| e.to_string())?;

    let response = client
        .send_command(&line)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;
    let response = response.trim();

    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match command {
        DaemonCommand::Status | DaemonCommand::Health => presenter.output(response),
        DaemonCommand::Start(request) => presenter.success(&format!(
            "Typing {} characters (countdown {}s)",
            request.char_count(),
            request.countdown_secs
        )),
        DaemonCommand::Stop => presenter.info("Stop requested"),
        DaemonCommand::Reset => presenter.info("Session reset"),
    }

    Ok(())
}

async fn build_command(action: DaemonAction, config: AppConfig) -> Result<DaemonCommand, String> {
    Ok(match action {
        DaemonAction::Start {
            text,
            file,
            speed,
            countdown,
            ide,
        } => {
            let text = TextSource::from_args(file, text).read().await?;
            let overrides = AppConfig {
                speed,
                countdown,
                ide_mode: ide.then_some(true),
                ..AppConfig::empty()
            };
            DaemonCommand::Start(config.merge(overrides).to_request(text))
        }
        DaemonAction::Stop => DaemonCommand::Stop,
        DaemonAction::Reset => DaemonCommand::Reset,
        DaemonAction::Status => DaemonCommand::Status,
        DaemonAction::Health => DaemonCommand::Health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_merges_flags_over_config() {
        let config = AppConfig {
            speed: Some(7),
            jitter: Some(0),
            ..AppConfig::defaults()
        };
        let action = DaemonAction::Start {
            text: Some("hello".to_string()),
            file: None,
            speed: None,
            countdown: Some(1),
            ide: true,
        };

        let DaemonCommand::Start(request) = build_command(action, config).await.unwrap() else {
            panic!("Expected start command");
        };
        assert_eq!(request.text, "hello");
        assert_eq!(request.chars_per_second, 7);
        assert_eq!(request.countdown_secs, 1);
        assert_eq!(request.jitter_percent, 0);
        assert!(request.preserve_indentation);
    }

    #[tokio::test]
    async fn simple_actions_map_directly() {
        let config = AppConfig::defaults();
        assert_eq!(
            build_command(DaemonAction::Stop, config.clone()).await,
            Ok(DaemonCommand::Stop)
        );
        assert_eq!(
            build_command(DaemonAction::Status, config).await,
            Ok(DaemonCommand::Status)
        );
    }
}
