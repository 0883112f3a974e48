//! Character classification for layout selection

use std::fmt;

/// Class of a character as far as the keyboard layout is concerned.
///
/// Derived from the code point alone and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// Code points below 32 (line feed, tab, other controls)
    Control,
    /// Printable ASCII, typed with the English layout
    Ascii,
    /// Everything above ASCII (CJK, accents, symbols)
    Wide,
}

impl CharacterClass {
    /// Classify a single character
    pub const fn of(ch: char) -> Self {
        let code = ch as u32;
        if code < 32 {
            Self::Control
        } else if code < 128 {
            Self::Ascii
        } else {
            Self::Wide
        }
    }

    /// Whether this class should drive a layout switch at all
    pub const fn wants_layout(&self) -> bool {
        !matches!(self, Self::Control)
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Ascii => "ascii",
            Self::Wide => "wide",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
