//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::infrastructure::injection::VALID_INJECTORS;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Largest accepted tab width
const MAX_TAB_WIDTH: usize = 16;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key).unwrap_or_else(|| "(not set)".to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Render the stored value of `key`
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "speed" => config.speed.map(|v| v.to_string()),
        "countdown" => config.countdown.map(|v| v.to_string()),
        "jitter" => config.jitter.map(|v| v.to_string()),
        "send_enter" => config.send_enter.map(|v| v.to_string()),
        "auto_switch" => config.auto_switch.map(|v| v.to_string()),
        "ide_mode" => config.ide_mode.map(|v| v.to_string()),
        "injector" => config.injector.clone(),
        "tab_width" => config.tab_width.map(|v| v.to_string()),
        "special_key_delay_ms" => config.special_key_delay_ms.map(|v| v.to_string()),
        _ => None,
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "speed" => {
            let speed: u32 = parse_number(value).map_err(invalid)?;
            if speed == 0 {
                return Err(invalid("Speed must be at least 1".to_string()));
            }
            config.speed = Some(speed);
        }
        "countdown" => config.countdown = Some(parse_number(value).map_err(invalid)?),
        "jitter" => {
            let jitter: u8 = parse_number(value).map_err(invalid)?;
            if jitter > 100 {
                return Err(invalid("Jitter must be between 0 and 100".to_string()));
            }
            config.jitter = Some(jitter);
        }
        "send_enter" => config.send_enter = Some(parse_bool(value).map_err(invalid)?),
        "auto_switch" => config.auto_switch = Some(parse_bool(value).map_err(invalid)?),
        "ide_mode" => config.ide_mode = Some(parse_bool(value).map_err(invalid)?),
        "injector" => {
            let lower = value.to_lowercase();
            if !VALID_INJECTORS.contains(&lower.as_str()) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    VALID_INJECTORS.join(", ")
                )));
            }
            config.injector = Some(lower);
        }
        "tab_width" => {
            let width: usize = parse_number(value).map_err(invalid)?;
            if width > MAX_TAB_WIDTH {
                return Err(invalid(format!(
                    "Tab width must be between 0 and {}",
                    MAX_TAB_WIDTH
                )));
            }
            config.tab_width = Some(width);
        }
        "special_key_delay_ms" => {
            config.special_key_delay_ms = Some(parse_number(value).map_err(invalid)?)
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

/// Parse a non-negative integer
fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Value must be a non-negative integer, got '{}'", value))
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err("Value must be 'true' or 'false'".to_string()),
    }
}
