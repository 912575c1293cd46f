//! Constraint compilation: binding design signals to board resources.
//!
//! A build supplies a [`BindingRequest`] naming which resources (or which
//! sub-signals of them) each top-level design signal drives. [`compile`]
//! resolves every request against a validated
//! [`Platform`](boardkit_platform::Platform), follows connector indirection,
//! merges attributes, and produces a [`ConstraintSet`]: one
//! [`ConstraintRecord`] per physical pin, in request order.
//!
//! Compilation is all-or-nothing. Any resolution failure returns a
//! [`CompileError`] and no records; warnings are only reported for requests
//! that compile.

#![warn(missing_docs)]

pub mod compile;
pub mod error;
pub mod record;
pub mod request;

pub use compile::compile;
pub use error::CompileError;
pub use record::{ConstraintRecord, ConstraintSet, DiffLeg};
pub use request::{Binding, BindingRequest, ResourceRef};
