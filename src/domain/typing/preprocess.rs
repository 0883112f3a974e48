//! Text preprocessing before typing
//!
//! Turns raw input into the form the typing engine consumes: a single
//! line-feed convention and, in indentation-preserving mode, tabs expanded to
//! spaces so that editors cannot reinterpret them.

/// Default tab stop width used in indentation-preserving mode
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Options controlling preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Indentation-preserving ("IDE") mode
    pub preserve_indentation: bool,
    /// Tab stop width for expansion; 0 keeps literal tabs
    pub tab_width: usize,
}

impl PreprocessOptions {
    /// Options for the given mode with the default tab width
    pub const fn new(preserve_indentation: bool) -> Self {
        Self {
            preserve_indentation,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    /// Override the tab width
    pub const fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Normalize line endings and, in indentation mode, expand tabs.
pub fn preprocess(text: &str, options: PreprocessOptions) -> String {
    let normalized = normalize_line_endings(text);
    if options.preserve_indentation && options.tab_width > 0 {
        expand_tabs(&normalized, options.tab_width)
    } else {
        normalized
    }
}

/// Replace CRLF and lone CR with LF.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Expand tabs to the next multiple of `width` columns.
///
/// The column counter restarts after every line break.
pub fn expand_tabs(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = width - (column % width);
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(normalize_line_endings("a\r\nb\r\n"), "a\nb\n");
    }

    #[test]
    fn lone_cr_becomes_lf() {
        assert_eq!(normalize_line_endings("a\rb\r\rc"), "a\nb\n\nc");
    }

    #[test]
    fn mixed_line_endings() {
        assert_eq!(normalize_line_endings("1\r\n2\r3\n4"), "1\n2\n3\n4");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_line_endings("x\r\ny\rz\n");
        assert_eq!(normalize_line_endings(&once), once);

        let already = "fn main() {\n    println!(\"hi\");\n}\n";
        assert_eq!(preprocess(already, PreprocessOptions::new(false)), already);
        assert_eq!(preprocess(already, PreprocessOptions::new(true)), already);
    }

    #[test]
    fn tabs_kept_outside_indentation_mode() {
        assert_eq!(preprocess("a\tb", PreprocessOptions::new(false)), "a\tb");
    }

    #[test]
    fn tabs_expanded_to_next_stop() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 4), "ab  x");
        assert_eq!(expand_tabs("abcd\tx", 4), "abcd    x");
        assert_eq!(expand_tabs("\t\tx", 4), "        x");
    }

    #[test]
    fn tab_column_resets_per_line() {
        assert_eq!(expand_tabs("abc\n\tx", 4), "abc\n    x");
    }

    #[test]
    fn wide_characters_count_as_one_column() {
        assert_eq!(expand_tabs("中\tx", 4), "中   x");
    }

    #[test]
    fn indentation_mode_expands_after_normalizing() {
        let out = preprocess("if x:\r\n\treturn 1\r\n", PreprocessOptions::new(true));
        assert_eq!(out, "if x:\n    return 1\n");
    }

    #[test]
    fn zero_tab_width_keeps_tabs() {
        let options = PreprocessOptions::new(true).with_tab_width(0);
        assert_eq!(preprocess("Hi\r\n\tX", options), "Hi\n\tX");
    }

    #[test]
    fn empty_text() {
        assert_eq!(preprocess("", PreprocessOptions::new(true)), "");
    }
}
