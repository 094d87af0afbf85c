//! Post-processing: deterministic cleanup of model-generated summaries.
//!
//! Even well-prompted models occasionally wrap their answer in markdown
//! fences, emit Windows line endings, or pad paragraphs with runs of blank
//! lines. These are cheap, deterministic string fixes; keeping them here
//! rather than in the prompt keeps the prompt focused on content. Each
//! rule is a pure function and independently testable.
//!
//! Rules run in a fixed order: fences are stripped before whitespace
//! passes so the fence regex sees the raw response, and the final trim
//! runs last so the summary slots cleanly into its bundle block.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw model response.
///
/// Rules (applied in order):
/// 1. Strip outer markdown fences (models sometimes add them unasked)
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive newlines down to one blank line
/// 5. Trim leading/trailing whitespace from the whole summary
pub fn clean_summary(input: &str) -> String {
    let s = strip_outer_fences(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Strip outer markdown fences ──────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|text)?\n(.*)\n```\s*$").unwrap());

fn strip_outer_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_outer_fences() {
        let input = "```markdown\nThe report covers Q3.\n```";
        assert_eq!(clean_summary(input), "The report covers Q3.");
    }

    #[test]
    fn keeps_inner_fences() {
        let input = "Intro\n```\ncode\n```\nOutro";
        assert_eq!(clean_summary(input), input);
    }

    #[test]
    fn normalises_crlf() {
        assert_eq!(clean_summary("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn trims_line_trailing_whitespace() {
        assert_eq!(clean_summary("a   \nb\t"), "a\nb");
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(clean_summary("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn trims_outer_whitespace() {
        assert_eq!(clean_summary("\n\n  summary text  \n\n"), "summary text");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_summary("   "), "");
    }
}
