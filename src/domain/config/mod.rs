//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_SPECIAL_KEY_DELAY_MS};
