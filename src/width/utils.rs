//! Terminal display width helpers.
//!
//! Provides ANSI-aware width calculation so tile labels can be clipped to the
//! cell they are drawn into.

use unicode_width::UnicodeWidthChar;

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Clip `text` to at most `max` display columns, appending an ellipsis when
/// anything was cut. Escape sequences are dropped from the result.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    if unicode_width::UnicodeWidthStr::width(&*clean_str) <= max {
        return clean_str.into_owned();
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in clean_str.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_escape_sequences() {
        assert_eq!(display_width("\x1b[1mAlice\x1b[0m"), 5);
    }

    #[test]
    fn short_labels_pass_through() {
        assert_eq!(truncate_to_width("Bob", 10), "Bob");
    }

    #[test]
    fn long_labels_get_ellipsis() {
        let clipped = truncate_to_width("Olivia Zhang", 6);
        assert_eq!(clipped, "Olivi…");
        assert_eq!(display_width(&clipped), 6);
    }

    #[test]
    fn wide_glyphs_are_not_split() {
        let clipped = truncate_to_width("日本語テキスト", 6);
        assert!(display_width(&clipped) <= 6);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn zero_budget_is_empty() {
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}
