//! Typing domain module

mod cadence;
mod char_class;
mod preprocess;
mod request;

pub use cadence::{Cadence, CHARACTER_DELAY_FLOOR_SECS, NEWLINE_DELAY_FLOOR_SECS};
pub use char_class::CharacterClass;
pub use preprocess::{
    expand_tabs, normalize_line_endings, preprocess, PreprocessOptions, DEFAULT_TAB_WIDTH,
};
pub use request::{
    TypingRequest, DEFAULT_COUNTDOWN_SECS, DEFAULT_JITTER_PERCENT, DEFAULT_SPEED,
};
