//! Report rendering for the terminal.

use std::io::{self, Write};

use email_linter_core::{Report, SenderIndex, Truncation};

/// Writes the human-readable report.
///
/// Addresses with more than `max_from` senders get a count instead of the
/// sender list.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text(out: &mut impl Write, report: &Report, max_from: usize) -> io::Result<()> {
    let count = report.disposable.len();
    if count == 1 {
        writeln!(out, "Your inbox's 1 disposable address and those it received from:")?;
    } else {
        writeln!(
            out,
            "Your inbox's {count} disposable addresses and those they received from:"
        )?;
    }

    for address in report.disposable.iter() {
        writeln!(out, "{address}")?;
        let senders = report.senders.senders(address);
        if senders.is_empty() {
            writeln!(out, "\t(no senders outside spam)")?;
        } else if senders.len() > max_from {
            writeln!(
                out,
                "\tReceived emails from {n} unique addresses. Use `-f {n}` if you want to see them.",
                n = senders.len()
            )?;
        } else {
            for sender in senders {
                writeln!(out, "\t{sender}")?;
            }
        }
    }
    Ok(())
}

/// Writes the sender index as one JSON object.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(out: &mut impl Write, senders: &SenderIndex) -> io::Result<()> {
    serde_json::to_writer(&mut *out, senders)?;
    writeln!(out)
}

/// Notices about incomplete scans and ambiguous recipients, one per line.
#[must_use]
pub fn notices(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(t) = report.inbox_truncation {
        lines.push(inbox_notice(t));
    }
    if let Some(t) = report.search_truncation {
        lines.push(format!(
            "Only {} of {} emails sent to disposable addresses were checked. Use `-l {}` to check them all.",
            t.retrieved, t.total, t.total
        ));
    }
    if report.ambiguous_emails > 0 {
        lines.push(format!(
            "{} email(s) were addressed to several disposable addresses at once.",
            report.ambiguous_emails
        ));
    }
    lines
}

/// Notice for an inbox scan that stopped before the oldest thread.
#[must_use]
pub fn inbox_notice(t: Truncation) -> String {
    format!(
        "Only the newest {} of {} inbox threads were scanned. Use `-l {}` to scan them all.",
        t.retrieved, t.total, t.total
    )
}
