use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?]").unwrap());
static PUNCT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.+|,+|!+|\?+").unwrap());

/// Switches for the steps that follow the fixed cleaning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// squeeze `!!`, `...`, `,,`, `??` into a single mark
    pub squeeze_punctuation: bool,
    /// collapse whitespace again after disallowed characters became spaces
    pub recollapse_whitespace: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            squeeze_punctuation: true,
            recollapse_whitespace: false,
        }
    }
}

/// Pure text cleaner applied to every raw document.
///
/// Steps, in order:
/// 1. trim
/// 2. every run of `\n` becomes one space
/// 3. every run of whitespace becomes one space
/// 4. everything but ASCII letters, digits, whitespace and `. , ! ?` becomes a space
/// 5. optional: squeeze repeated punctuation
/// 6. optional: collapse whitespace again
///
/// Step 4 may leave double spaces (`"a - b"` -> `"a   b"`) unless step 6 is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleaner {
    options: CleanOptions,
}

impl Cleaner {
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CleanOptions {
        self.options
    }

    pub fn clean(&self, text: &str) -> String {
        let text = text.trim();
        let text = NEWLINE_RUNS.replace_all(text, " ");
        let text = WHITESPACE_RUNS.replace_all(&text, " ");
        let mut text = DISALLOWED.replace_all(&text, " ").into_owned();
        if self.options.squeeze_punctuation {
            text = PUNCT_RUNS
                .replace_all(&text, |caps: &Captures| caps[0][..1].to_string())
                .into_owned();
        }
        if self.options.recollapse_whitespace {
            text = WHITESPACE_RUNS.replace_all(&text, " ").into_owned();
        }
        text
    }
}

/// Clean with the default options.
pub fn clean(text: &str) -> String {
    Cleaner::default().clean(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_and_repeated_punctuation() {
        assert_eq!(clean("Hello\n\nWorld   !!"), "Hello World !");
    }

    #[test]
    fn trims_and_collapses() {
        assert_eq!(clean("  \t one\r\n\ntwo \t three  "), "one two three");
    }

    #[test]
    fn disallowed_characters_become_spaces() {
        assert_eq!(clean("a-b (c) d's"), "a b  c  d s");
        assert_eq!(clean("café"), "caf ");
    }

    #[test]
    fn keeps_allowed_punctuation() {
        assert_eq!(clean("Yes, really. Why? No!"), "Yes, really. Why? No!");
    }

    #[test]
    fn squeezing_can_be_turned_off() {
        let cleaner = Cleaner::new(CleanOptions {
            squeeze_punctuation: false,
            recollapse_whitespace: false,
        });
        assert_eq!(cleaner.clean("wait... what?!"), "wait... what?!");
        assert_eq!(clean("wait... what?!"), "wait. what?!");
    }

    #[test]
    fn recollapse_removes_double_spaces() {
        let cleaner = Cleaner::new(CleanOptions {
            squeeze_punctuation: true,
            recollapse_whitespace: true,
        });
        assert_eq!(cleaner.clean("a - b"), "a b");
        assert_eq!(clean("a - b"), "a   b");
    }

    #[test]
    fn output_never_contains_newlines() {
        let inputs = ["x\ny", "\n\n\n", "a\r\nb\n\nc", "tab\there\n"];
        for input in inputs {
            let out = clean(input);
            assert!(!out.contains('\n'), "{out:?}");
            assert!(!out.contains("  "), "{out:?}");
        }
    }
}
