//! Resource families that nearly every board declares.
//!
//! Each helper expands a pin list into one numbered single-pin resource per
//! pin (`led#0`, `led#1`, ...), or builds the fixed `r`/`g`/`b` bundle of an
//! RGB LED.

use crate::attrs::Attrs;
use crate::connector::ConnectorKey;
use crate::direction::Direction;
use crate::error::PlatformError;
use crate::pins::PinExpr;
use crate::resource::{IoBinding, Resource, Subsignal};

/// Options shared by all preset families.
#[derive(Clone, Debug, Default)]
pub struct PresetOptions {
    /// Number given to the first generated resource.
    pub first_number: u32,
    /// Whether the pins are active-low.
    pub invert: bool,
    /// Connector the pin names refer to.
    pub conn: Option<ConnectorKey>,
    /// Attributes attached to every generated resource.
    pub attrs: Attrs,
}

impl PresetOptions {
    /// Options numbering from `first_number` with no other settings.
    pub fn numbered(first_number: u32) -> Self {
        Self {
            first_number,
            ..Self::default()
        }
    }

    fn binding(&self, pin: &str, dir: Direction) -> Result<IoBinding, PlatformError> {
        let io = IoBinding::pins(pin, dir)?.with_invert(self.invert);
        Ok(match &self.conn {
            Some(conn) => io.with_conn(conn.clone()),
            None => io,
        })
    }
}

/// One `button#n` input per pin.
pub fn button_resources(pins: &str, opts: &PresetOptions) -> Result<Vec<Resource>, PlatformError> {
    single_pin_family("button", Direction::In, pins, opts)
}

/// One `led#n` output per pin.
pub fn led_resources(pins: &str, opts: &PresetOptions) -> Result<Vec<Resource>, PlatformError> {
    single_pin_family("led", Direction::Out, pins, opts)
}

/// One `switch#n` input per pin.
pub fn switch_resources(pins: &str, opts: &PresetOptions) -> Result<Vec<Resource>, PlatformError> {
    single_pin_family("switch", Direction::In, pins, opts)
}

/// An `rgb_led#n` bundle with `r`, `g` and `b` outputs.
pub fn rgb_led_resource(
    r: &str,
    g: &str,
    b: &str,
    opts: &PresetOptions,
) -> Result<Resource, PlatformError> {
    let children = [("r", r), ("g", g), ("b", b)]
        .into_iter()
        .map(|(name, pin)| Subsignal::new(name, opts.binding(pin, Direction::Out)?))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Resource::bundle("rgb_led", Some(opts.first_number), children)?.with_attrs(opts.attrs.clone()))
}

// An unconnected slot still consumes a number, so numbering follows the
// physical position on the board.
fn single_pin_family(
    name: &str,
    dir: Direction,
    pins: &str,
    opts: &PresetOptions,
) -> Result<Vec<Resource>, PlatformError> {
    let expr = PinExpr::parse(pins)?;
    let mut out = Vec::with_capacity(expr.width());
    for (offset, slot) in expr.slots().iter().enumerate() {
        let Some(pin) = slot else {
            continue;
        };
        let number = u32::try_from(offset)
            .ok()
            .and_then(|offset| opts.first_number.checked_add(offset))
            .ok_or_else(|| PlatformError::NumberOverflow {
                family: name.to_string(),
                first: opts.first_number,
            })?;
        let res = Resource::new(name, Some(number), opts.binding(pin.as_str(), dir)?)?
            .with_attrs(opts.attrs.clone());
        out.push(res);
    }
    Ok(out)
}
