//! Human-readable and JSON output for command results

use domain_contacts::ParseOutcome;
use email::DispatchOutcome;
use serde::Serialize;
use std::fmt::Write;

/// Everything `send` reports back, in the shape printed with `--json`
#[derive(Debug, Serialize)]
pub struct SendReport<'a> {
    pub file: &'a str,
    pub provider: &'a str,
    pub dry_run: bool,
    pub diagnostics: &'a [String],
    #[serde(flatten)]
    pub outcome: &'a DispatchOutcome,
}

pub fn parse_summary(outcome: &ParseOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} valid record(s)", outcome.records.len());
    for contact in &outcome.records {
        let _ = writeln!(
            out,
            "  {:<32} {:<24} {}",
            contact.email(),
            contact.name(),
            contact.description()
        );
    }

    if !outcome.diagnostics.is_empty() {
        let _ = writeln!(out, "{} diagnostic(s)", outcome.diagnostics.len());
        for diagnostic in &outcome.diagnostics {
            let _ = writeln!(out, "  {}", diagnostic);
        }
    }

    out
}

pub fn send_summary(report: &SendReport<'_>) -> String {
    let outcome = report.outcome;
    let mut out = String::new();

    let mode = if report.dry_run { " (dry run)" } else { "" };
    let _ = writeln!(out, "{} via {}{}", report.file, report.provider, mode);
    let _ = writeln!(
        out,
        "Sent: {}  Failed: {}  Diagnostics: {}",
        outcome.success_count,
        outcome.failure_count,
        report.diagnostics.len()
    );

    if outcome.was_cancelled() {
        let _ = writeln!(
            out,
            "Stopped early: {} recipient(s) not attempted",
            outcome.skipped_count
        );
    }

    for failure in &outcome.failures {
        let _ = writeln!(out, "  {}: {}", failure.recipient, failure.message);
    }

    out
}
