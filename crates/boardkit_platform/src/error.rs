//! Errors raised while parsing pin notation and constructing a platform.

use boardkit_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Errors that can occur while declaring resources and connectors or
/// building a [`Platform`](crate::Platform).
///
/// Construction is all-or-nothing: any of these aborts the build and no
/// partially validated descriptor is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// A pin expression contains an empty or invalid token.
    #[error("malformed pin expression '{expr}': {reason}")]
    MalformedExpression {
        /// The full expression text.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two resources share the same name and number.
    #[error("duplicate resource '{key}'")]
    DuplicateResource {
        /// The repeated resource key, e.g. `led#0`.
        key: String,
    },

    /// Two connectors share the same name and number.
    #[error("duplicate connector '{key}'")]
    DuplicateConnector {
        /// The repeated connector key, e.g. `pmod#0`.
        key: String,
    },

    /// A board pin is claimed more than once.
    #[error("pin '{pin}' is claimed by both {first} and {second}")]
    PinConflict {
        /// The absolute board pin.
        pin: String,
        /// The earlier declaration that claims the pin.
        first: String,
        /// The later declaration that claims it again.
        second: String,
    },

    /// A differential pair's halves differ in length or share pins.
    #[error("malformed differential pair (p: '{p}', n: '{n}'): {reason}")]
    MalformedDiffPair {
        /// Positive half.
        p: String,
        /// Negative half.
        n: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A connector-relative reference names a missing connector or slot.
    #[error("resource '{resource}' references unknown pin '{pin}' of connector '{connector}'")]
    UnknownConnectorPin {
        /// The referencing resource.
        resource: String,
        /// The connector key.
        connector: String,
        /// The connector pin name.
        pin: String,
    },

    /// The default clock or reset names a resource that was never declared.
    #[error("default {role} '{name}' does not name a declared resource")]
    UnknownDefaultResource {
        /// `"clock"` or `"reset"`.
        role: &'static str,
        /// The resource name.
        name: String,
    },

    /// A bundle was declared with no sub-signals.
    #[error("'{name}' is a bundle with no subsignals")]
    EmptyBundle {
        /// Name of the resource or subsignal.
        name: String,
    },

    /// A bundle declares two sub-signals with the same name.
    #[error("'{parent}' declares subsignal '{name}' more than once")]
    DuplicateSubsignal {
        /// The enclosing resource or subsignal.
        parent: String,
        /// The repeated subsignal name.
        name: String,
    },

    /// A resource, subsignal or connector name is not a plain identifier.
    #[error("invalid name '{name}': expected letters, digits and '_'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Numbering a resource family runs past `u32::MAX`.
    #[error("numbering '{family}' from {first} overflows")]
    NumberOverflow {
        /// The family name, e.g. `led`.
        family: String,
        /// The number the family starts from.
        first: u32,
    },

    /// A named connector maps the same connector pin twice.
    #[error("connector '{connector}' maps pin '{pin}' more than once")]
    DuplicateConnectorPin {
        /// The connector key.
        connector: String,
        /// The repeated connector pin name.
        pin: String,
    },
}

impl PlatformError {
    /// Returns the stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            PlatformError::MalformedExpression { .. } => 101,
            PlatformError::DuplicateResource { .. } => 102,
            PlatformError::DuplicateConnector { .. } => 103,
            PlatformError::PinConflict { .. } => 104,
            PlatformError::MalformedDiffPair { .. } => 105,
            PlatformError::UnknownConnectorPin { .. } => 106,
            PlatformError::UnknownDefaultResource { .. } => 107,
            PlatformError::EmptyBundle { .. } => 108,
            PlatformError::DuplicateSubsignal { .. } => 109,
            PlatformError::InvalidName { .. } => 110,
            PlatformError::NumberOverflow { .. } => 111,
            PlatformError::DuplicateConnectorPin { .. } => 112,
        };
        DiagnosticCode::new(Category::Platform, number)
    }

    /// Converts this error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            PlatformError::PinConflict { .. } => diag.with_help(
                "each board pin may be used by one resource; \
                 set `pin_conflicts = \"resources\"` if connectors intentionally alias pins",
            ),
            PlatformError::MalformedExpression { .. } => {
                diag.with_note("pins are whitespace separated; '-' marks an unconnected slot")
            }
            PlatformError::UnknownConnectorPin { resource, .. } => {
                diag.at(format!("resource '{resource}'"))
            }
            _ => diag,
        }
    }
}
