//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Library crates never print. They report non-fatal findings as structured
//! [`Diagnostic`] values into a thread-safe [`DiagnosticSink`] supplied by the
//! caller, and fatal errors convert into diagnostics for uniform rendering
//! through a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
