//! Diagnostic rendering for human-readable terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics, separated by blank lines.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[P103]: pin 'B2' is claimed by both resource 'led#0' and resource 'btn#1'
///   --> resource 'btn#1'
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes for the severity header.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let ansi = match diag.severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note => "1;36",
        };
        format!("\x1b[{ansi}m{label}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if let Some(location) = &diag.location {
            out.push_str(&format!("  --> {location}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_plain_error() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Binding, 201),
            "unknown resource 'uart#0'",
        );
        let out = TerminalRenderer::new(false).render(&diag);
        assert_eq!(out, "error[B201]: unknown resource 'uart#0'\n");
    }

    #[test]
    fn render_location_notes_and_help() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 1), "no IOSTANDARD")
            .at("binding 'blink'")
            .with_note("the toolchain default will be used")
            .with_help("add IOSTANDARD to the resource attrs");
        let out = TerminalRenderer::new(false).render(&diag);
        assert!(out.starts_with("warning[W001]: no IOSTANDARD\n"));
        assert!(out.contains("  --> binding 'blink'\n"));
        assert!(out.contains("   = note: the toolchain default will be used\n"));
        assert!(out.contains("   = help: add IOSTANDARD to the resource attrs\n"));
    }

    #[test]
    fn render_colored_header() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Platform, 101), "dup");
        let out = TerminalRenderer::new(true).render(&diag);
        assert!(out.starts_with("\x1b[1;31merror[P101]\x1b[0m: dup"));
    }

    #[test]
    fn render_all_joins() {
        let a = Diagnostic::note(DiagnosticCode::new(Category::Timing, 1), "a");
        let b = Diagnostic::note(DiagnosticCode::new(Category::Timing, 2), "b");
        let out = TerminalRenderer::new(false).render_all(&[a, b]);
        assert_eq!(out, "note[T001]: a\n\nnote[T002]: b\n");
    }
}
