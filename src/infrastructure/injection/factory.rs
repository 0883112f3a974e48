//! Key injector factory with platform-aware selection

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{InjectError, InjectorFactory, KeyInjector};

use super::enigo::EnigoInjector;
#[cfg(windows)]
use super::win32::Win32Injector;

/// User preference for injector selection.
///
/// - All platforms support `Auto` (the default) and `Enigo`.
/// - Windows additionally supports `Win32` (SendInput with scan codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectorPreference {
    /// Best injector for the platform
    #[default]
    Auto,
    /// Cross-platform enigo library
    Enigo,
    /// SendInput with scan codes (Windows only)
    #[cfg(windows)]
    Win32,
}

/// Valid injector names on this platform
#[cfg(windows)]
pub const VALID_INJECTORS: &[&str] = &["auto", "enigo", "win32"];

#[cfg(not(windows))]
pub const VALID_INJECTORS: &[&str] = &["auto", "enigo"];

impl fmt::Display for InjectorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectorPreference::Auto => write!(f, "auto"),
            InjectorPreference::Enigo => write!(f, "enigo"),
            #[cfg(windows)]
            InjectorPreference::Win32 => write!(f, "win32"),
        }
    }
}

/// Error type for parsing injector preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInjectorError {
    pub value: String,
}

impl fmt::Display for ParseInjectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid injector '{}'. Valid options: {}",
            self.value,
            VALID_INJECTORS.join(", ")
        )
    }
}

impl std::error::Error for ParseInjectorError {}

impl FromStr for InjectorPreference {
    type Err = ParseInjectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(InjectorPreference::Auto),
            "enigo" => Ok(InjectorPreference::Enigo),
            #[cfg(windows)]
            "win32" => Ok(InjectorPreference::Win32),
            _ => Err(ParseInjectorError {
                value: s.to_string(),
            }),
        }
    }
}

/// Create an injector for `preference` on the calling thread
pub fn create_injector(
    preference: InjectorPreference,
) -> Result<Box<dyn KeyInjector>, InjectError> {
    let injector: Box<dyn KeyInjector> = match preference {
        #[cfg(windows)]
        InjectorPreference::Auto | InjectorPreference::Win32 => Box::new(Win32Injector::new()),
        #[cfg(not(windows))]
        InjectorPreference::Auto => Box::new(EnigoInjector::new()?),
        InjectorPreference::Enigo => Box::new(EnigoInjector::new()?),
    };
    debug!(injector = injector.name(), %preference, "Created key injector");
    Ok(injector)
}

/// Factory the engine calls on its own thread
pub fn injector_factory(preference: InjectorPreference) -> InjectorFactory {
    Arc::new(move || create_injector(preference))
}
