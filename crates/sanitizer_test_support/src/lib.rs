//! Helpers shared by the sanitizer's integration tests.

pub mod golden;
pub mod recorder;

pub use golden::{GOLDEN_FORMAT_V1, GoldenCase, GoldenStatus, load_golden_cases};
pub use recorder::{Event, EventRecorder};

use std::fmt::Write;

/// Escape text so an event fits on one quoted snapshot line.
///
/// Control characters and U+00A0 are written as `\u{XX}`; quotes, backslashes
/// and the common whitespace escapes use their short forms.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let short = match ch {
            '\\' => "\\\\",
            '"' => "\\\"",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            ch if ch.is_control() || ch == '\u{A0}' => {
                let _ = write!(out, "\\u{{{:02X}}}", u32::from(ch));
                continue;
            }
            ch => {
                out.push(ch);
                continue;
            }
        };
        out.push_str(short);
    }
    out
}

/// Lines of context shown on each side of the first diverging event.
const DIFF_CONTEXT: usize = 2;

/// Report where two event line lists diverge.
///
/// Events are numbered from 1 in fixture order. Rows marked `>` are the first
/// divergence, `~` later differences inside the context window.
pub fn diff_events(expected: &[String], actual: &[String]) -> String {
    let mut report = String::new();
    let shared = expected.len().min(actual.len());
    let divergence = expected
        .iter()
        .zip(actual)
        .position(|(want, got)| want != got)
        .or((expected.len() != actual.len()).then_some(shared));

    match divergence {
        None => report.push_str("event lists are identical\n"),
        Some(at) => {
            let _ = writeln!(report, "events diverge at event {}:", at + 1);
            let last = expected.len().max(actual.len());
            for idx in at.saturating_sub(DIFF_CONTEXT)..(at + DIFF_CONTEXT + 1).min(last) {
                let want = expected.get(idx).map_or("(no event)", String::as_str);
                let got = actual.get(idx).map_or("(no event)", String::as_str);
                let marker = if idx == at {
                    '>'
                } else if want != got {
                    '~'
                } else {
                    ' '
                };
                let _ = writeln!(report, "{marker} #{:<4} want {want}", idx + 1);
                let _ = writeln!(report, "{marker} #{:<4}  got {got}", idx + 1);
            }
        }
    }
    let _ = writeln!(
        report,
        "{} events expected, {} recorded",
        expected.len(),
        actual.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(events: &[&str]) -> Vec<String> {
        events.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn escape_text_quotes_and_controls() {
        assert_eq!(escape_text("a\"b\\c\nd\u{1}"), "a\\\"b\\\\c\\nd\\u{01}");
        assert_eq!(escape_text("x\u{A0}y\u{7F}"), "x\\u{A0}y\\u{7F}");
        assert_eq!(escape_text("∉ é"), "∉ é");
    }

    #[test]
    fn diff_events_marks_first_divergence() {
        let expected = lines(&["#document", "<b>", "\"x\"", "</b>", "#/document"]);
        let actual = lines(&["#document", "<b>", "\"y\"", "</b>", "#/document", "extra"]);
        let report = diff_events(&expected, &actual);
        assert!(report.contains("events diverge at event 3:"), "{report}");
        assert!(report.contains("> #3    want \"x\""), "{report}");
        assert!(report.contains("> #3     got \"y\""), "{report}");
        assert!(report.contains("5 events expected, 6 recorded"), "{report}");
    }

    #[test]
    fn diff_events_reports_missing_tail() {
        let expected = lines(&["#document", "#/document"]);
        let actual = lines(&["#document"]);
        let report = diff_events(&expected, &actual);
        assert!(report.contains("events diverge at event 2:"), "{report}");
        assert!(report.contains("got (no event)"), "{report}");
    }

    #[test]
    fn diff_events_on_equal_lists() {
        let same = lines(&["#document", "#/document"]);
        let report = diff_events(&same, &same);
        assert!(report.starts_with("event lists are identical"), "{report}");
    }
}
