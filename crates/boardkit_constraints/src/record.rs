//! Constraint records: the resolved pin bindings handed to a toolchain adapter.

use boardkit_common::Frequency;
use boardkit_platform::{Attrs, Direction, PinId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Which half of a differential pair a record describes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLeg {
    /// The positive (`_p`) pin.
    Positive,
    /// The negative (`_n`) pin.
    Negative,
}

impl DiffLeg {
    /// The port-name suffix for this leg.
    pub fn suffix(self) -> &'static str {
        match self {
            DiffLeg::Positive => "_p",
            DiffLeg::Negative => "_n",
        }
    }
}

/// One physical pin bound to one bit of a design signal.
///
/// The two legs of a differential signal are emitted as two adjacent records
/// sharing `signal` and `bit`, tagged [`DiffLeg::Positive`] then
/// [`DiffLeg::Negative`].
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ConstraintRecord {
    /// The absolute board pin.
    pub pin: PinId,
    /// The emitted design-signal name.
    pub signal: String,
    /// Bit index for multi-bit signals; `None` for single-bit ones.
    pub bit: Option<u32>,
    /// Direction of the signal.
    pub direction: Direction,
    /// Effective attributes after merging.
    pub attrs: Attrs,
    /// Nominal clock frequency, if the leaf is clock-annotated.
    pub clock: Option<Frequency>,
    /// Whether the pin is active-low.
    pub inverted: bool,
    /// Differential leg, or `None` for single-ended pins.
    pub diff: Option<DiffLeg>,
}

impl ConstraintRecord {
    /// The toolchain port this record constrains, e.g. `blink`, `dq[3]` or
    /// `clk_p`.
    pub fn port_name(&self) -> String {
        let mut port = self.signal.clone();
        if let Some(leg) = self.diff {
            port.push_str(leg.suffix());
        }
        if let Some(bit) = self.bit {
            port.push_str(&format!("[{bit}]"));
        }
        port
    }

    /// Returns `true` for either leg of a differential pair.
    pub fn is_differential(&self) -> bool {
        self.diff.is_some()
    }
}

impl fmt::Display for ConstraintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.port_name(), self.pin, self.direction)?;
        if let Some(std) = self.attrs.io_standard() {
            write!(f, " {std}")?;
        }
        if let Some(clock) = self.clock {
            write!(f, " @ {clock}")?;
        }
        Ok(())
    }
}

/// The output of one successful compilation.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    records: Vec<ConstraintRecord>,
}

impl ConstraintSet {
    pub(crate) fn new(records: Vec<ConstraintRecord>) -> Self {
        Self { records }
    }

    /// All records in binding order.
    pub fn records(&self) -> &[ConstraintRecord] {
        &self.records
    }

    /// Consumes the set, returning its records.
    pub fn into_records(self) -> Vec<ConstraintRecord> {
        self.records
    }

    /// Number of records (physical pins).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing was compiled.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `(port, pin)` binding table for the build system.
    pub fn pin_table(&self) -> Vec<(String, &PinId)> {
        self.records.iter().map(|r| (r.port_name(), &r.pin)).collect()
    }

    /// Distinct `(port, frequency)` clock constraints.
    ///
    /// A differential clock is constrained on its positive leg only.
    pub fn clocks(&self) -> Vec<(String, Frequency)> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.diff != Some(DiffLeg::Negative))
            .filter_map(|r| r.clock.map(|f| (r.port_name(), f)))
            .filter(|(port, _)| seen.insert(port.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a ConstraintRecord;
    type IntoIter = std::slice::Iter<'a, ConstraintRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
