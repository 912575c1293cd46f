//! Errors raised while compiling a binding request.

use boardkit_diagnostics::{Category, Diagnostic, DiagnosticCode};
use boardkit_platform::Direction;

/// A failure that aborts one compilation.
///
/// None of these leave partial output behind: the caller gets either a full
/// [`ConstraintSet`](crate::ConstraintSet) or one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The requested resource is not declared.
    #[error("unknown resource '{resource}' requested for signal '{signal}'")]
    UnknownResource {
        /// The requested resource key.
        resource: String,
        /// The design signal being bound.
        signal: String,
    },

    /// The requested sub-signal path does not exist in the resource.
    #[error("resource '{resource}' has no subsignal '{subsignal}'")]
    UnknownSubsignal {
        /// The resource key.
        resource: String,
        /// The requested sub-signal path.
        subsignal: String,
    },

    /// A connector-relative pin resolves to an unconnected connector slot.
    #[error("signal '{signal}' uses pin '{pin}' of connector '{connector}', which is not connected")]
    UnresolvedConnectorRef {
        /// The emitted design signal.
        signal: String,
        /// The connector key.
        connector: String,
        /// The connector pin name.
        pin: String,
    },

    /// One signal name is bound with incompatible directions.
    #[error("signal '{signal}' is bound as {first} and again as {second}")]
    DirectionConflict {
        /// The emitted design signal.
        signal: String,
        /// Direction of the earlier binding.
        first: Direction,
        /// Direction of the later binding.
        second: Direction,
    },

    /// The resource (or an overlapping part of it) was already requested.
    #[error("'{resource}' is already bound to signal '{previous}'")]
    ResourceAlreadyRequested {
        /// The resource reference requested again.
        resource: String,
        /// The signal that first claimed it.
        previous: String,
    },

    /// A requested bit maps to an unconnected (`-`) slot.
    #[error("bit {bit} of signal '{signal}' is not connected to any pin")]
    UnconnectedPin {
        /// The emitted design signal.
        signal: String,
        /// Position within the pin expression.
        bit: u32,
    },

    /// Two bindings produce the same toolchain port on different pins.
    #[error("port '{port}' is placed on both pin '{first}' and pin '{second}'")]
    PortConflict {
        /// The emitted port name, e.g. `blink` or `mem__dq[3]`.
        port: String,
        /// The pin the port was first placed on.
        first: String,
        /// The pin the later binding asked for.
        second: String,
    },
}

impl CompileError {
    /// Returns the stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            CompileError::UnknownResource { .. } => 201,
            CompileError::UnknownSubsignal { .. } => 202,
            CompileError::UnresolvedConnectorRef { .. } => 203,
            CompileError::DirectionConflict { .. } => 204,
            CompileError::ResourceAlreadyRequested { .. } => 205,
            CompileError::UnconnectedPin { .. } => 206,
            CompileError::PortConflict { .. } => 207,
        };
        DiagnosticCode::new(Category::Binding, number)
    }

    /// Converts this error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            CompileError::UnknownResource { signal, .. } => diag
                .at(format!("binding '{signal}'"))
                .with_help("run `boardkit resources` to list what the board declares"),
            CompileError::DirectionConflict { .. } => diag.with_note(
                "only outputs may reuse a signal name, and each port still takes one pin",
            ),
            CompileError::PortConflict { .. } => {
                diag.with_help("give each binding its own signal name")
            }
            CompileError::UnresolvedConnectorRef { signal, .. } => diag.at(format!("signal '{signal}'")),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_direction_conflict() {
        let err = CompileError::DirectionConflict {
            signal: "data".into(),
            first: Direction::In,
            second: Direction::Out,
        };
        assert_eq!(err.to_string(), "signal 'data' is bound as in and again as out");
        assert_eq!(err.code().to_string(), "B204");
    }

    #[test]
    fn unknown_resource_diagnostic() {
        let err = CompileError::UnknownResource {
            resource: "uart#0".into(),
            signal: "tx".into(),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code.to_string(), "B201");
        assert_eq!(diag.location.as_deref(), Some("binding 'tx'"));
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn display_port_conflict() {
        let err = CompileError::PortConflict {
            port: "blink".into(),
            first: "H5".into(),
            second: "J5".into(),
        };
        assert_eq!(
            err.to_string(),
            "port 'blink' is placed on both pin 'H5' and pin 'J5'"
        );
        assert_eq!(err.code().to_string(), "B207");
        assert_eq!(err.to_diagnostic().help.len(), 1);
    }
}
