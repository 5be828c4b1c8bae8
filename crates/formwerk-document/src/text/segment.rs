// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmenter — splits raw text into blank-line-separated paragraph units.

use formwerk_core::ParagraphUnit;
use tracing::debug;

/// Two-character escape for a line feed, as left behind by double-escaping.
const ESCAPED_LF: &str = "\\n";

/// Four-character escape for a CRLF pair.
const ESCAPED_CRLF: &str = "\\r\\n";

/// Canonicalise line endings to LF.
///
/// Text that carries no real line break but does contain escaped ones has
/// been escaped twice somewhere upstream. Such payloads have lost their
/// blank-line structure, so each recovered break becomes a paragraph break.
/// Real CRLF and lone CR are always folded to LF afterwards.
///
/// Idempotent: already-normalised text comes back unchanged.
pub fn normalize_newlines(text: &str) -> String {
    let has_real_break = text.contains('\n') || text.contains('\r');
    let recovered = if !has_real_break && text.contains(ESCAPED_LF) {
        debug!("recovering escaped line breaks");
        text.replace(ESCAPED_CRLF, "\n\n").replace(ESCAPED_LF, "\n\n")
    } else {
        text.to_string()
    };
    recovered.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split raw input into paragraph units.
///
/// Consecutive non-blank lines form one unit; any blank line closes it.
/// Never fails: empty or whitespace-only input yields no units.
pub fn segment(raw: &str) -> Vec<ParagraphUnit> {
    let normalized = normalize_newlines(raw.trim());

    let mut units = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in normalized.split('\n').map(str::trim) {
        if line.is_empty() {
            flush(&mut buffer, &mut units);
        } else {
            buffer.push(line.to_string());
        }
    }
    flush(&mut buffer, &mut units);

    debug!(units = units.len(), "segmented input");
    units
}

fn flush(buffer: &mut Vec<String>, units: &mut Vec<ParagraphUnit>) {
    if let Some(unit) = ParagraphUnit::new(std::mem::take(buffer)) {
        units.push(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(raw: &str) -> Vec<String> {
        segment(raw).iter().map(ParagraphUnit::text).collect()
    }

    #[test]
    fn normalisation_is_idempotent() {
        let samples = [
            "plain",
            "a\nb\n\nc",
            "a\r\nb\rc",
            "line1\\nline2",
            "tab\tand\\r\\nescaped",
            "",
            "\\n",
        ];
        for sample in samples {
            let once = normalize_newlines(sample);
            assert_eq!(normalize_newlines(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn lf_only_text_is_untouched() {
        let text = "# Title\n\nBody\nmore body";
        assert_eq!(normalize_newlines(text), text);
    }

    #[test]
    fn crlf_and_cr_become_lf() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn escapes_are_left_alone_when_real_breaks_exist() {
        assert_eq!(normalize_newlines("C:\\new\nfolder"), "C:\\new\nfolder");
    }

    #[test]
    fn escaped_newline_recovery() {
        assert_eq!(texts("line1\\nline2"), ["line1", "line2"]);
        assert_eq!(texts("a\\r\\nb"), ["a", "b"]);
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        assert_eq!(
            texts("first\n\nsecond\n\n\n\nthird"),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn consecutive_lines_form_one_unit() {
        let units = segment("one\ntwo\nthree");
        assert_eq!(units.len(), 1);
        let text = units[0].text();
        assert_eq!(text.matches('\n').count(), 2);
        assert_eq!(text, "one\ntwo\nthree");
    }

    #[test]
    fn lines_are_trimmed_and_whitespace_lines_are_blank() {
        assert_eq!(texts("  a  \n \t \n  b\n   c "), ["a", "b\nc"]);
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
        assert!(segment("\n\n\r\n").is_empty());
    }

    #[test]
    fn no_unit_is_ever_blank() {
        let inputs = [
            "\n \n\t\n",
            "a\n\n \n\nb",
            "\\n\\n\\n",
            "\u{0}\u{1}binary\u{7f}",
            "\u{feff}text",
            "x\r\r\r\ry",
        ];
        for input in inputs {
            for unit in segment(input) {
                assert!(!unit.lines().is_empty(), "input {input:?}");
                assert!(
                    unit.lines().iter().all(|l| !l.trim().is_empty()),
                    "input {input:?}"
                );
            }
        }
    }
}
