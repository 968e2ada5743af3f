//! Rendering of check results.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;
use wordusage_core::{Diagnostic, Severity};

/// Outcome for one input.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path as given or discovered, `<stdin>` for standard input.
    pub file: String,
    /// Surviving diagnostics, in document order.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the input could not be checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Report for a checked file.
    pub const fn checked(file: String, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            file,
            diagnostics,
            error: None,
        }
    }

    /// Report for a file that failed.
    pub const fn failed(file: String, error: String) -> Self {
        Self {
            file,
            diagnostics: Vec::new(),
            error: Some(error),
        }
    }
}

/// Counts across all reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Error-severity diagnostics.
    pub errors: usize,
    /// Warning-severity diagnostics.
    pub warnings: usize,
    /// Inputs that could not be checked.
    pub failed: usize,
}

impl Totals {
    /// Tallies `reports`.
    pub fn of(reports: &[FileReport]) -> Self {
        reports.iter().fold(Self::default(), |mut totals, report| {
            if report.error.is_some() {
                totals.failed += 1;
            }
            for d in &report.diagnostics {
                match d.severity {
                    Severity::Error => totals.errors += 1,
                    Severity::Warning => totals.warnings += 1,
                }
            }
            totals
        })
    }

    /// Whether the run fails: errors or failed inputs always do, warnings
    /// only when `frail`.
    pub const fn fails(&self, frail: bool) -> bool {
        self.errors > 0 || self.failed > 0 || (frail && self.warnings > 0)
    }
}

/// Human-readable report.
///
/// One block per file; clean files get a one-line note unless `quiet`.
/// With `why`, suggestions are printed under each diagnostic.
pub fn render_text(reports: &[FileReport], why: bool, quiet: bool) -> String {
    let mut out = String::new();

    for report in reports {
        if let Some(ref error) = report.error {
            let _ = writeln!(out, "{}", report.file.bold());
            let _ = writeln!(out, "  {} {error}", "error".red());
            let _ = writeln!(out);
            continue;
        }
        if report.diagnostics.is_empty() {
            if !quiet {
                let _ = writeln!(out, "{}: {}", report.file, "no issues found".green());
            }
            continue;
        }

        let _ = writeln!(out, "{}", report.file.bold());
        let labels: Vec<String> = report.diagnostics.iter().map(Diagnostic::span_label).collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        let msg_width = report
            .diagnostics
            .iter()
            .map(|d| d.message.chars().count())
            .max()
            .unwrap_or(0);

        for (d, label) in report.diagnostics.iter().zip(&labels) {
            let severity = match d.severity {
                Severity::Error => format!("{:<7}", d.severity.as_str()).red().to_string(),
                Severity::Warning => format!("{:<7}", d.severity.as_str()).yellow().to_string(),
            };
            let pad = msg_width - d.message.chars().count();
            let _ = writeln!(
                out,
                "  {}  {severity}  {}{:pad$}  {}  {}",
                format!("{label:<width$}").dimmed(),
                d.message,
                "",
                d.rule_id.cyan(),
                d.source.dimmed(),
            );
            if why && !d.expected.is_empty() {
                let _ = writeln!(
                    out,
                    "  {:width$}  {}",
                    "",
                    format!("suggest: {}", d.expected.join(", ")).dimmed(),
                );
            }
        }
        let _ = writeln!(out);
    }

    let totals = Totals::of(reports);
    if totals.errors + totals.warnings + totals.failed > 0 {
        let _ = writeln!(out, "{}", summary(&totals));
    }
    out
}

fn summary(totals: &Totals) -> String {
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    };
    let mut parts = Vec::new();
    if totals.errors > 0 {
        parts.push(plural(totals.errors, "error").red().to_string());
    }
    if totals.warnings > 0 {
        parts.push(plural(totals.warnings, "warning").yellow().to_string());
    }
    if totals.failed > 0 {
        parts.push(plural(totals.failed, "unreadable file").red().to_string());
    }
    parts.join(", ")
}

/// JSON report: the file list plus totals.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn render_json(reports: &[FileReport]) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        files: &'a [FileReport],
        totals: Totals,
    }
    serde_json::to_string_pretty(&JsonReport {
        files: reports,
        totals: Totals::of(reports),
    })
}
