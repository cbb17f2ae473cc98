//! Last-resort JSON repair
//!
//! Two small tools used by the final recovery stage: a trailing-comma strip
//! and an explicit bracket-balancing scan. The scan is a hand-rolled state
//! machine rather than a regex so that string and escape handling stay
//! independently testable.

use std::sync::OnceLock;

use regex::Regex;

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([\]}])").expect("trailing comma regex"))
}

/// Remove commas that sit directly before a closing `]` or `}`
///
/// Operates on the raw text without string awareness; a comma-then-bracket
/// sequence inside a JSON string will also be rewritten. Acceptable for a
/// stage that only runs after every strict parse has already failed.
pub fn strip_trailing_commas(text: &str) -> String {
    trailing_comma_re().replace_all(text, "$1").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InString,
    Escaped,
}

/// Extract the first balanced `[...]` substring
///
/// Scans character by character from the first `[`, tracking bracket/brace
/// depth and string/escape state, and returns the slice up to the matching
/// `]`. Returns `None` when there is no `[` or the text ends (or closes on
/// a mismatched brace) before the array balances.
pub fn extract_balanced_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut state = ScanState::Normal;

    for (i, c) in text[start..].char_indices() {
        match state {
            ScanState::Escaped => state = ScanState::InString,
            ScanState::InString => match c {
                '\\' => state = ScanState::Escaped,
                '"' => state = ScanState::Normal,
                _ => {}
            },
            ScanState::Normal => match c {
                '"' => state = ScanState::InString,
                '[' | '{' => depth += 1,
                ']' | '}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        // The scan opened on '['; a '}' closing it means the
                        // text is malformed beyond this repair.
                        if c != ']' {
                            return None;
                        }
                        return Some(&text[start..start + i + c.len_utf8()]);
                    }
                }
                _ => {}
            },
        }
    }

    None
}
