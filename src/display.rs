use std::borrow::Cow;

pub const DEFAULT_PREVIEW_CHARS: usize = 2000;
pub const ELLIPSIS: &str = "...";

/// Score with four decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

/// First `limit` characters of `text`, followed by `...` if anything was cut.
pub fn preview(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_has_four_decimals() {
        assert_eq!(format_score(1.0), "1.0000");
        assert_eq!(format_score(0.123456), "0.1235");
        assert_eq!(format_score(0.0), "0.0000");
    }

    #[test]
    fn short_text_is_untouched() {
        assert!(matches!(preview("short", 10), Cow::Borrowed("short")));
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééééé", 2), "éé...");
        let long = "x".repeat(DEFAULT_PREVIEW_CHARS + 1);
        let shown = preview(&long, DEFAULT_PREVIEW_CHARS);
        assert_eq!(shown.chars().count(), DEFAULT_PREVIEW_CHARS + ELLIPSIS.len());
    }
}
