//! Layout resolver: character class -> native keyboard layout

use tracing::{debug, info, warn};

use crate::domain::typing::CharacterClass;

use super::ports::{LayoutHandle, LayoutHost};

/// Language id of English (United States)
pub const LANG_EN_US: u16 = 0x0409;

/// Language id of Chinese (Simplified, PRC)
pub const LANG_ZH_CN: u16 = 0x0804;

/// KLID loaded on demand when no English layout is installed
pub const EN_US_KLID: &str = "00000409";

/// Maps character classes to installed layouts.
///
/// Built once at startup from the host's layout list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutResolver {
    ascii: Option<LayoutHandle>,
    wide: Option<LayoutHandle>,
}

impl LayoutResolver {
    /// Resolver with explicit handles
    pub fn new(ascii: Option<LayoutHandle>, wide: Option<LayoutHandle>) -> Self {
        Self { ascii, wide }
    }

    /// Resolver that never switches
    pub fn empty() -> Self {
        Self::default()
    }

    /// Enumerate host layouts and pick one per class
    pub fn discover(host: &dyn LayoutHost) -> Self {
        let installed = host.installed_layouts();
        debug!(count = installed.len(), "Enumerated keyboard layouts");

        let find = |lang: u16| installed.iter().copied().find(|h| h.language_id() == lang);

        let mut ascii = find(LANG_EN_US);
        let wide = find(LANG_ZH_CN);

        if ascii.is_none() && !installed.is_empty() {
            ascii = host.load_layout(EN_US_KLID);
            match ascii {
                Some(handle) => info!(layout = %handle, "Loaded English layout on demand"),
                None => warn!("English layout not installed and could not be loaded"),
            }
        }

        info!(
            ascii = ?ascii.map(|h| h.to_string()),
            wide = ?wide.map(|h| h.to_string()),
            "Layout resolver ready"
        );

        Self { ascii, wide }
    }

    /// Layout for `class`, or `None` when the current layout should stay
    pub fn resolve_layout_for(&self, class: CharacterClass) -> Option<LayoutHandle> {
        match class {
            CharacterClass::Ascii => self.ascii,
            CharacterClass::Wide => self.wide,
            CharacterClass::Control => None,
        }
    }

    /// Whether any switching is possible at all
    pub fn has_layouts(&self) -> bool {
        self.ascii.is_some() || self.wide.is_some()
    }
}
