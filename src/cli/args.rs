//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// Keytyper - human-paced keyboard typing simulator
#[derive(Parser, Debug)]
#[command(name = "keytyper")]
#[command(version)]
#[command(about = "Types text into the focused window with human-like cadence")]
#[command(long_about = None)]
pub struct Cli {
    /// Read text to type from a file
    #[arg(short = 'f', long, value_name = "PATH", conflicts_with_all = ["text", "daemon"])]
    pub file: Option<PathBuf>,

    /// Text to type (reads stdin when neither --text nor --file is given)
    #[arg(short = 't', long, value_name = "TEXT", conflicts_with = "daemon")]
    pub text: Option<String>,

    /// Typing speed in characters per second
    #[arg(short = 's', long, value_name = "CPS")]
    pub speed: Option<u32>,

    /// Seconds to wait before typing starts
    #[arg(short = 'c', long, value_name = "SECS")]
    pub countdown: Option<u32>,

    /// Random delay variation in percent (0-100)
    #[arg(short = 'j', long, value_name = "PERCENT")]
    pub jitter: Option<u8>,

    /// Do not press Enter after the text
    #[arg(long)]
    pub no_enter: bool,

    /// Do not switch keyboard layouts per character class
    #[arg(long)]
    pub no_auto_switch: bool,

    /// Preserve indentation by clearing editor auto-indent before each line
    #[arg(short = 'i', long)]
    pub ide: bool,

    /// Key injector to use (auto, enigo; win32 on Windows), overrides KEYTYPER_INJECTOR
    #[arg(long, value_name = "INJECTOR")]
    pub injector: Option<String>,

    /// Tab expansion width in --ide mode (0 keeps tab keys)
    #[arg(long, value_name = "COLUMNS")]
    pub tab_width: Option<usize>,

    /// Run as daemon (control via: keytyper daemon start/stop/reset/status)
    #[arg(long)]
    pub daemon: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Config overrides given on the command line
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            speed: self.speed,
            countdown: self.countdown,
            jitter: self.jitter,
            send_enter: self.no_enter.then_some(false),
            auto_switch: self.no_auto_switch.then_some(false),
            ide_mode: self.ide.then_some(true),
            injector: self.injector.clone(),
            tab_width: self.tab_width,
            special_key_delay_ms: None,
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to running daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone)]
pub enum DaemonAction {
    /// Start typing text in the daemon
    Start {
        /// Text to type (reads stdin when neither --text nor --file is given)
        #[arg(short = 't', long, value_name = "TEXT", conflicts_with = "file")]
        text: Option<String>,

        /// Read text from a file
        #[arg(short = 'f', long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Typing speed in characters per second
        #[arg(short = 's', long, value_name = "CPS")]
        speed: Option<u32>,

        /// Seconds to wait before typing starts
        #[arg(short = 'c', long, value_name = "SECS")]
        countdown: Option<u32>,

        /// Preserve indentation
        #[arg(short = 'i', long)]
        ide: bool,
    },
    /// Stop the running session
    Stop,
    /// Reset a finished session to idle
    Reset,
    /// Show session status as JSON
    Status,
    /// Check that the daemon answers
    Health,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "speed",
    "countdown",
    "jitter",
    "send_enter",
    "auto_switch",
    "ide_mode",
    "injector",
    "tab_width",
    "special_key_delay_ms",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
