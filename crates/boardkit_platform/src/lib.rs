//! Board platform descriptions: pins, connectors, resources and their validation.
//!
//! A board is described as a set of named, optionally numbered [`Resource`]s
//! (single pins, differential pairs, or bundles of named [`Subsignal`]s) and a
//! set of [`Connector`]s that resources may address indirectly. Every piece is
//! built through a validating constructor, and [`PlatformBuilder::build`]
//! checks the whole declaration for duplicate names and double-claimed pins
//! before handing out an immutable [`Platform`].
//!
//! ```ignore
//! use boardkit_platform::*;
//!
//! let platform = PlatformBuilder::new(Device::new("xc7z007s", "clg400", "1"))
//!     .default_clock("clk")
//!     .resource(
//!         Resource::new("clk", None, IoBinding::pins("H16", Direction::In)?
//!             .with_clock(Clock::new(Frequency::from_mhz(125.0).unwrap())))?
//!             .with_attrs(Attrs::new().with("IOSTANDARD", "LVCMOS33")),
//!     )
//!     .connector(Connector::positional("pmod", 0, "Y18 Y19 Y16 Y17 - -")?)
//!     .build()?;
//! ```
//!
//! # Architecture
//!
//! - [`pins`]: pin identifiers, pin expressions and differential pairs
//! - [`attrs`]: attribute sets and innermost-wins merging
//! - [`resource`]: I/O bindings, sub-signals and resources
//! - [`connector`]: positional and named connectors
//! - [`platform`] / [`builder`]: the validated descriptor and its construction
//! - [`presets`]: common resource families (buttons, LEDs, RGB LEDs)

#![warn(missing_docs)]

pub mod attrs;
pub mod builder;
pub mod connector;
pub mod direction;
pub mod error;
pub mod pins;
pub mod platform;
pub mod presets;
pub mod resource;

pub use attrs::{AttrValue, Attrs, IoStandard};
pub use boardkit_common::Frequency;
pub use builder::PlatformBuilder;
pub use connector::{Connector, ConnectorKey, ConnectorPins};
pub use direction::Direction;
pub use error::PlatformError;
pub use pins::{DiffPairs, PinExpr, PinId};
pub use platform::{Device, PinConflictScope, Platform};
pub use presets::PresetOptions;
pub use resource::{Clock, IoBinding, Leaf, PinSource, Resource, ResourceKey, SignalShape, Subsignal};
