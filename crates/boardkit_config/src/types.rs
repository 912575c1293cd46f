//! Configuration types deserialized from board and bindings files.

use boardkit_platform::{Direction, PinConflictScope};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level board definition.
#[derive(Debug, Deserialize)]
pub struct BoardConfig {
    /// Device identity.
    pub device: DeviceConfig,
    /// Default clock/reset, platform-wide attributes and validation scope.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Explicitly declared resources (`[[resource]]`).
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
    /// Resource families expanded from a pin list (`[[preset]]`).
    #[serde(default, rename = "preset")]
    pub presets: Vec<PresetConfig>,
    /// Connectors (`[[connector]]`).
    #[serde(default, rename = "connector")]
    pub connectors: Vec<ConnectorConfig>,
}

/// The `[device]` table.
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    /// Part number, e.g. `"xc7z007s"`.
    pub part: String,
    /// Package, e.g. `"clg400"`.
    pub package: String,
    /// Speed grade, e.g. `"1"`.
    pub speed: String,
}

/// The `[defaults]` table.
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Name of the default clock resource.
    pub clock: Option<String>,
    /// Name of the default reset resource.
    pub reset: Option<String>,
    /// Attributes applied to every pin unless overridden.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Which declarations take part in pin-conflict checking.
    #[serde(default)]
    pub pin_conflicts: PinConflictScope,
}

/// A `{ name, number }` connector reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnRef {
    /// Connector name.
    pub name: String,
    /// Connector number.
    #[serde(default)]
    pub number: u32,
}

/// Positive and negative pin lists of a differential binding.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffConfig {
    /// Positive pins.
    pub p: String,
    /// Negative pins.
    pub n: String,
}

/// The body shared by resources and sub-signals: either a leaf binding
/// (`pins` or `diff`) or nested `subsignal` tables.
#[derive(Debug, Default, Deserialize)]
pub struct SignalConfig {
    /// Single-ended pin expression.
    pub pins: Option<String>,
    /// Differential pin expressions.
    pub diff: Option<DiffConfig>,
    /// Direction; defaults to `inout`.
    pub dir: Option<Direction>,
    /// Active-low.
    #[serde(default)]
    pub invert: bool,
    /// Connector the pin names refer to.
    pub conn: Option<ConnRef>,
    /// Nominal clock frequency, e.g. `"125MHz"`.
    pub clock: Option<String>,
    /// Attributes at this level.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Nested sub-signals.
    #[serde(default, rename = "subsignal")]
    pub subsignals: Vec<SubsignalConfig>,
}

/// A `[[resource]]` table.
#[derive(Debug, Deserialize)]
pub struct ResourceConfig {
    /// Resource name.
    pub name: String,
    /// Resource number; omitted for singletons.
    pub number: Option<u32>,
    /// Leaf binding or sub-signals.
    #[serde(flatten)]
    pub signal: SignalConfig,
}

/// A `[[resource.subsignal]]` table (recursively nestable).
#[derive(Debug, Deserialize)]
pub struct SubsignalConfig {
    /// Sub-signal name.
    pub name: String,
    /// Leaf binding or nested sub-signals.
    #[serde(flatten)]
    pub signal: SignalConfig,
}

/// The kind of a `[[preset]]` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    /// `button#n` inputs.
    Buttons,
    /// `led#n` outputs.
    Leds,
    /// `switch#n` inputs.
    Switches,
    /// One `rgb_led#n` bundle.
    RgbLed,
}

impl PresetKind {
    /// The resource name the preset generates.
    pub fn resource_name(self) -> &'static str {
        match self {
            PresetKind::Buttons => "button",
            PresetKind::Leds => "led",
            PresetKind::Switches => "switch",
            PresetKind::RgbLed => "rgb_led",
        }
    }
}

/// A `[[preset]]` table.
#[derive(Debug, Deserialize)]
pub struct PresetConfig {
    /// Which family to generate.
    pub kind: PresetKind,
    /// Pin list for `buttons`, `leds` and `switches`.
    pub pins: Option<String>,
    /// Red pin of an `rgb_led`.
    pub r: Option<String>,
    /// Green pin of an `rgb_led`.
    pub g: Option<String>,
    /// Blue pin of an `rgb_led`.
    pub b: Option<String>,
    /// First number; defaults to the next free number for the family.
    pub number: Option<u32>,
    /// Active-low.
    #[serde(default)]
    pub invert: bool,
    /// Connector the pin names refer to.
    pub conn: Option<ConnRef>,
    /// Attributes for every generated resource.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

/// A `[[connector]]` table.
#[derive(Debug, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name.
    pub name: String,
    /// Connector number.
    #[serde(default)]
    pub number: u32,
    /// Positional pin list.
    pub pins: Option<String>,
    /// Named pin mapping.
    #[serde(default)]
    pub named: BTreeMap<String, String>,
}

/// The top-level bindings file.
#[derive(Debug, Default, Deserialize)]
pub struct BindingsConfig {
    /// `[[bind]]` tables in request order.
    #[serde(default, rename = "bind")]
    pub binds: Vec<BindConfig>,
}

/// A `[[bind]]` table.
#[derive(Debug, Deserialize)]
pub struct BindConfig {
    /// The design signal name.
    pub signal: String,
    /// Resource name.
    pub resource: String,
    /// Resource number.
    pub number: Option<u32>,
    /// Dot-separated sub-signal path.
    pub subsignal: Option<String>,
}
