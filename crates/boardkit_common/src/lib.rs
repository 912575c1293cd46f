//! Shared foundational types used across the boardkit crates.
//!
//! Currently this is the [`Frequency`] value type used by clock annotations
//! and timing constraints.

#![warn(missing_docs)]

pub mod frequency;

pub use frequency::{Frequency, ParseFrequencyError};
