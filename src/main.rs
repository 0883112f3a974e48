//! Keytyper CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keytyper::cli::{
    app::{load_merged_config, run_oneshot, TextSource, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_daemon_command,
    presenter::Presenter,
};
use keytyper::infrastructure::XdgConfigStore;

/// Route `tracing` output to stderr, honouring RUST_LOG.
///
/// The daemon logs its own activity by default; the one-shot runner keeps
/// stderr to warnings so the progress bar stays readable.
fn init_logging(daemon: bool) {
    let default = if daemon {
        "keytyper=info,warn,enigo=error"
    } else {
        "warn,enigo=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.daemon);
    let presenter = Presenter::new();

    let cli_config = cli.to_config();

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Daemon { action }) => {
            let config = load_merged_config(cli_config).await;
            if let Err(e) = handle_daemon_command(action, config, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Merge: defaults < file < env < cli
    let config = load_merged_config(cli_config).await;

    if cli.daemon {
        run_daemon(config).await
    } else {
        run_oneshot(config, TextSource::from_args(cli.file, cli.text)).await
    }
}
