//! Plain-text rendering of diagnostics for terminal output.

use crate::diagnostic::Diagnostic;
use std::fmt::Write;

/// Renders a diagnostic as a single-line (plus notes) text message.
///
/// Format: `severity[CODE]: message (gates 1, 2)` with one indented
/// `note: ...` line per attached note.
pub fn render_text(diag: &Diagnostic) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message);
    if !diag.gates.is_empty() {
        let ids: Vec<String> = diag.gates.iter().map(|g| g.to_string()).collect();
        let _ = write!(out, " (gates {})", ids.join(", "));
    }
    for note in &diag.notes {
        let _ = write!(out, "\n  note: {note}");
    }
    out
}
