//! Loading board definitions and binding requests from TOML files.
//!
//! A board file (`board.toml`) is deserialized into [`BoardConfig`] and then
//! lowered through the same validating builders programmatic users call, so
//! a file-defined [`Platform`](boardkit_platform::Platform) obeys exactly the
//! same invariants. A bindings file (`bindings.toml`) becomes a
//! [`BindingRequest`](boardkit_constraints::BindingRequest).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_bindings, load_bindings_from_str, load_board, load_board_from_str};
pub use resolve::{resolve_bindings, resolve_board};
pub use types::*;
