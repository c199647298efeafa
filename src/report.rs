//! Report formatting and printing utilities.
//!
//! This module provides functions to display findings in cargo-style format.
//! Separate from core logic to allow loqa to be used as a library.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthChar;

use crate::findings::{Finding, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum display width of the source excerpt line.
const MAX_SOURCE_WIDTH: usize = 80;

/// Print findings in cargo-style format to stdout.
///
/// Findings are sorted and displayed with severity, rule, location and the
/// rendered highlight.
pub fn report(findings: &[Finding]) {
    report_to(findings, &mut io::stdout().lock());
}

/// Print findings to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(findings: &[Finding], writer: &mut W) {
    if findings.is_empty() {
        return;
    }

    let mut sorted = findings.to_vec();
    sorted.sort();

    for finding in &sorted {
        print_finding(finding, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no findings were produced.
pub fn print_success(files_checked: usize) {
    print_success_to(files_checked, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(files_checked: usize, writer: &mut W) {
    let msg = format!(
        "Checked {} resource {} - no issues found",
        files_checked,
        if files_checked == 1 { "file" } else { "files" }
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_finding<W: Write>(finding: &Finding, writer: &mut W) {
    let severity_str = match finding.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        finding.description,
        finding.rule.dimmed().cyan()
    );

    let _ = writeln!(
        writer,
        "  {} {} (key: {}, locale: {})",
        "-->".blue(),
        finding.path,
        finding.key,
        finding.locale
    );

    if !finding.source.is_empty() {
        let _ = writeln!(
            writer,
            "   source: {}",
            truncate_display(&finding.source, MAX_SOURCE_WIDTH)
        );
    }

    let _ = writeln!(
        writer,
        "   {} {}",
        "=".blue(),
        render_highlight(&finding.highlight, finding.severity)
    );
    let _ = writeln!(writer);
}

fn print_summary<W: Write>(findings: &[Finding], writer: &mut W) {
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let warnings = findings.len() - errors;

    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(format!(
            "{} {}",
            errors,
            if errors == 1 { "error" } else { "errors" }
        ));
    }
    if warnings > 0 {
        parts.push(format!(
            "{} {}",
            warnings,
            if warnings == 1 { "warning" } else { "warnings" }
        ));
    }

    let line = format!("{} {}", FAILURE_MARK, parts.join(", "));
    let colored_line = if errors > 0 { line.red() } else { line.yellow() };
    let _ = writeln!(writer, "{}", colored_line);
}

/// Render `<eN>…</eN>` highlight tags as colored emphasis.
///
/// Tags are rule-generated and never nest; anything that does not parse as
/// a tag passes through verbatim.
pub fn render_highlight(highlight: &str, severity: Severity) -> String {
    let mut out = String::with_capacity(highlight.len());
    let mut rest = highlight;

    while let Some(start) = rest.find("<e") {
        let after = &rest[start + 2..];
        let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() || !after[digits.len()..].starts_with('>') {
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            continue;
        }
        let close = format!("</e{}>", digits);
        let inner_start = start + 2 + digits.len() + 1;
        let Some(inner_len) = rest[inner_start..].find(&close) else {
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            continue;
        };
        let inner = &rest[inner_start..inner_start + inner_len];
        out.push_str(&rest[..start]);
        out.push_str(&emphasize(inner, severity).to_string());
        rest = &rest[inner_start + inner_len + close.len()..];
    }

    out.push_str(rest);
    out
}

fn emphasize(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => text.red().bold(),
        Severity::Warning => text.yellow().bold(),
    }
}

/// Truncate to a display width, honoring wide (CJK) characters.
fn truncate_display(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width > max_width {
            out.push('…');
            return out;
        }
        width += char_width;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use crate::report::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            rule: "dnt-terms".to_string(),
            severity,
            path: "locales/fr-FR.json".to_string(),
            locale: "fr-FR".to_string(),
            key: "login.title".to_string(),
            description: "Do-not-translate term \"OAuth\" is missing from the target".to_string(),
            source: "Sign in with OAuth".to_string(),
            highlight: "Missing term: <e0>OAuth</e0>".to_string(),
        }
    }

    #[test]
    fn test_render_highlight_strips_tags_without_color() {
        colored::control::set_override(false);
        assert_snapshot!(
            render_highlight("Missing term: <e0>OAuth</e0>", Severity::Error),
            @"Missing term: OAuth"
        );
    }

    #[test]
    fn test_render_highlight_multiple_spans() {
        colored::control::set_override(false);
        assert_snapshot!(
            render_highlight("<e0>a</e0> and <e1>b</e1>", Severity::Warning),
            @"a and b"
        );
    }

    #[test]
    fn test_render_highlight_passes_non_tags_through() {
        colored::control::set_override(false);
        assert_snapshot!(
            render_highlight("1 <e 2 <extra> <e0>three", Severity::Error),
            @"1 <e 2 <extra> <e0>three"
        );
    }

    #[test]
    fn test_report_to_layout() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        report_to(&[finding(Severity::Error)], &mut out);
        let text = String::from_utf8(out).unwrap();
        let expected = "\
error: Do-not-translate term \"OAuth\" is missing from the target  dnt-terms
  --> locales/fr-FR.json (key: login.title, locale: fr-FR)
   source: Sign in with OAuth
   = Missing term: OAuth

✘ 1 error
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_to_empty_prints_nothing() {
        let mut out = Vec::new();
        report_to(&[], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_summary_counts_both_severities() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        report_to(
            &[finding(Severity::Error), finding(Severity::Warning)],
            &mut out,
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("✘ 1 error, 1 warning"));
    }

    #[test]
    fn test_truncate_display_handles_wide_chars() {
        assert_eq!(truncate_display("hello", 80), "hello");
        assert_eq!(truncate_display("hello", 4), "hell…");
        // Each CJK character is two columns wide
        assert_eq!(truncate_display("保存して続行", 4), "保存…");
    }

    #[test]
    fn test_print_success_message() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_success_to(3, &mut out);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "✓ Checked 3 resource files - no issues found\n");
    }
}
