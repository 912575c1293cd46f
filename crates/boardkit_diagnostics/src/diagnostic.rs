//! Structured diagnostic messages with severity, codes, and context lines.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Board definitions are declarative data, so instead of a source span a
/// diagnostic carries an optional `location`: a human-readable path to the
/// offending declaration, such as `resource 'ddr3#0' / subsignal 'dqs'`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where in the board definition or binding request the issue was found.
    pub location: Option<String>,
    /// Explanatory footnotes (`note: ...`).
    pub notes: Vec<String>,
    /// Actionable suggestions (`help: ...`).
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    /// Creates a new informational note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message)
    }

    /// Sets the location this diagnostic refers to.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Platform, 103);
        let diag = Diagnostic::error(code, "pin 'B2' claimed twice");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "pin 'B2' claimed twice");
        assert_eq!(diag.code.to_string(), "P103");
        assert!(diag.location.is_none());
    }

    #[test]
    fn create_warning() {
        let code = DiagnosticCode::new(Category::Warning, 1);
        let diag = Diagnostic::warning(code, "no IOSTANDARD");
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Binding, 201);
        let diag = Diagnostic::error(code, "unknown resource 'uart#0'")
            .at("binding 'tx'")
            .with_note("declared resources: led#0, led#1")
            .with_help("check the resource number");
        assert_eq!(diag.location.as_deref(), Some("binding 'tx'"));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Timing, 1);
        let diag = Diagnostic::note(code, "clock on output").at("resource 'clk'");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, back);
    }
}
