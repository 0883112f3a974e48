//! Main app runner for one-shot mode

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{
    EngineServices, EngineSettings, LayoutLock, LayoutResolver, SessionController,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::injection::ParseInjectorError;
use crate::infrastructure::{
    injector_factory, platform_layout_host, InjectorPreference, ThreadSleeper, XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured injector
pub const INJECTOR_ENV: &str = "KEYTYPER_INJECTOR";

/// How often the one-shot runner polls the session
const STATUS_POLL: Duration = Duration::from_millis(100);

/// Where the text to type comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    File(PathBuf),
    Text(String),
    Stdin,
}

impl TextSource {
    /// Pick the source from `--file` / `--text`, falling back to stdin
    pub fn from_args(file: Option<PathBuf>, text: Option<String>) -> Self {
        match (file, text) {
            (Some(path), _) => Self::File(path),
            (None, Some(text)) => Self::Text(text),
            (None, None) => Self::Stdin,
        }
    }

    /// Read the full text
    pub async fn read(self) -> Result<String, String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::File(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .map_err(|e| format!("Failed to read stdin: {}", e))?;
                Ok(text)
            }
        }
    }
}

/// Build the engine services for `config`
pub fn build_services(config: &AppConfig) -> Result<EngineServices, String> {
    let preference: InjectorPreference = config
        .injector_or_default()
        .parse()
        .map_err(|e: ParseInjectorError| e.to_string())?;

    let layout_host = platform_layout_host();
    let resolver = Arc::new(LayoutResolver::discover(layout_host.as_ref()));
    debug!(%preference, layouts = resolver.has_layouts(), "Engine services ready");

    Ok(EngineServices {
        injector_factory: injector_factory(preference),
        layout_host,
        resolver,
        sleeper: Arc::new(ThreadSleeper),
        settings: EngineSettings {
            tab_width: config.tab_width_or_default(),
            special_key_delay: Duration::from_millis(config.special_key_delay_ms_or_default()),
        },
        layout_lock: LayoutLock::default(),
    })
}

/// Type the text from `source` into the focused window
pub async fn run_oneshot(config: AppConfig, source: TextSource) -> ExitCode {
    let mut presenter = Presenter::new();

    let services = match build_services(&config) {
        Ok(services) => services,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if source == TextSource::Stdin && std::io::stdin().is_terminal() {
        presenter.info("Reading text from stdin (Ctrl+D to finish)");
    }
    let text = match source.read().await {
        Ok(text) => text,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let controller = SessionController::new(services);
    if let Err(e) = controller.start(config.to_request(text)) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    presenter.info("Focus the target window now. Ctrl+C to stop.");
    presenter.start_progress("Preparing...");

    let mut ticker = tokio::time::interval(STATUS_POLL);
    let mut stop_sent = false;
    loop {
        ticker.tick().await;
        if shutdown.is_shutdown() && !stop_sent {
            stop_sent = true;
            controller.stop().await;
        }
        let status = controller.status();
        presenter.update_progress(&status);
        if !status.is_typing {
            break;
        }
    }

    controller.join().await;
    let status = controller.status();
    match status.current_status.as_str() {
        "COMPLETED" => {
            presenter.progress_success(&format!("Typed {} characters", status.total_chars));
            ExitCode::from(EXIT_SUCCESS)
        }
        "ABORTED" => {
            presenter.progress_fail(&format!(
                "Stopped after {} of {} characters",
                status.progress, status.total_chars
            ));
            ExitCode::from(EXIT_ERROR)
        }
        _ => {
            presenter.progress_fail(&format!("Typing failed: {}", status.last_event));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable config file");
        AppConfig::empty()
    });

    let env_config = AppConfig {
        injector: env::var(INJECTOR_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
