//! Configuration port interface

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Persistent store for the user's typing defaults.
///
/// Stored configs are partial: any field may be absent and is filled in by
/// `AppConfig::defaults()` when merged.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored config; a missing file yields `AppConfig::empty()`
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored config, creating parent directories as needed
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing file
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write the built-in defaults. Fails with `AlreadyExists` rather than
    /// overwrite an existing file.
    async fn init(&self) -> Result<(), ConfigError>;
}
