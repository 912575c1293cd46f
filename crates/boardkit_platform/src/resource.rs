//! Resources: named hardware features bound to board pins.
//!
//! A [`Resource`] is either a bare I/O binding (a single implicit signal) or a
//! bundle of named [`Subsignal`]s, which may themselves be bundles. Leaves of
//! this tree carry an [`IoBinding`]: which pins, which direction, whether the
//! signal is inverted, an optional connector the pin names are relative to,
//! and an optional clock annotation.

use crate::attrs::Attrs;
use crate::connector::ConnectorKey;
use crate::direction::Direction;
use crate::error::PlatformError;
use crate::pins::{DiffPairs, PinExpr};
use boardkit_common::Frequency;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The lookup key of a resource: its name plus an optional number.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct ResourceKey {
    /// Resource family name, e.g. `led`.
    pub name: String,
    /// Index within the family; `None` for singleton resources.
    pub number: Option<u32>,
}

impl ResourceKey {
    /// Creates a key.
    pub fn new(name: impl Into<String>, number: Option<u32>) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(n) => write!(f, "{}#{n}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A nominal clock frequency attached to an input for timing constraints.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Clock {
    /// The nominal frequency.
    pub frequency: Frequency,
}

impl Clock {
    /// Creates a clock annotation.
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }
}

/// Where a leaf's pins come from.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinSource {
    /// Single-ended pins.
    Pins(PinExpr),
    /// Differential pairs.
    DiffPairs(DiffPairs),
}

/// The binding of one leaf signal to pins.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct IoBinding {
    source: PinSource,
    dir: Direction,
    invert: bool,
    conn: Option<ConnectorKey>,
    clock: Option<Clock>,
}

impl IoBinding {
    /// Binds to an already parsed pin source.
    pub fn new(source: PinSource, dir: Direction) -> Self {
        Self {
            source,
            dir,
            invert: false,
            conn: None,
            clock: None,
        }
    }

    /// Binds to single-ended pins, e.g. `IoBinding::pins("N2 K2 M3", Direction::Out)`.
    pub fn pins(expr: &str, dir: Direction) -> Result<Self, PlatformError> {
        Ok(Self::new(PinSource::Pins(PinExpr::parse(expr)?), dir))
    }

    /// Binds to active-low single-ended pins.
    pub fn pins_n(expr: &str, dir: Direction) -> Result<Self, PlatformError> {
        Ok(Self::pins(expr, dir)?.with_invert(true))
    }

    /// Binds to differential pairs.
    pub fn diff_pairs(p: &str, n: &str, dir: Direction) -> Result<Self, PlatformError> {
        Ok(Self::new(PinSource::DiffPairs(DiffPairs::parse(p, n)?), dir))
    }

    /// Binds to active-low differential pairs.
    pub fn diff_pairs_n(p: &str, n: &str, dir: Direction) -> Result<Self, PlatformError> {
        Ok(Self::diff_pairs(p, n, dir)?.with_invert(true))
    }

    /// Marks the binding as inverted (active-low) or not.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Makes the pin names relative to a connector.
    pub fn with_conn(mut self, conn: ConnectorKey) -> Self {
        self.conn = Some(conn);
        self
    }

    /// Attaches a clock annotation.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// The pin source.
    pub fn source(&self) -> &PinSource {
        &self.source
    }

    /// The signal direction.
    pub fn dir(&self) -> Direction {
        self.dir
    }

    /// Whether the signal is active-low.
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// The connector the pin names refer to, if any.
    pub fn conn(&self) -> Option<&ConnectorKey> {
        self.conn.as_ref()
    }

    /// The clock annotation, if any.
    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    /// Returns `true` for differential bindings.
    pub fn is_differential(&self) -> bool {
        matches!(self.source, PinSource::DiffPairs(_))
    }

    /// Signal width in bits.
    pub fn width(&self) -> usize {
        match &self.source {
            PinSource::Pins(expr) => expr.width(),
            PinSource::DiffPairs(dp) => dp.width(),
        }
    }

    /// Every pin expression in the binding (one, or the p and n halves).
    pub fn expressions(&self) -> Vec<&PinExpr> {
        match &self.source {
            PinSource::Pins(expr) => vec![expr],
            PinSource::DiffPairs(dp) => vec![dp.p(), dp.n()],
        }
    }
}

/// The shape of a resource or sub-signal: a leaf binding or a bundle.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalShape {
    /// A single pin-bound signal.
    Leaf(IoBinding),
    /// Named child sub-signals, in declaration order.
    Bundle(Vec<Subsignal>),
}

impl SignalShape {
    fn child(&self, name: &str) -> Option<&Subsignal> {
        match self {
            SignalShape::Leaf(_) => None,
            SignalShape::Bundle(children) => children.iter().find(|s| s.name == name),
        }
    }
}

/// A named signal within a resource.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Subsignal {
    name: String,
    shape: SignalShape,
    attrs: Attrs,
}

impl Subsignal {
    /// Creates a leaf sub-signal.
    pub fn new(name: impl Into<String>, io: IoBinding) -> Result<Self, PlatformError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            shape: SignalShape::Leaf(io),
            attrs: Attrs::new(),
        })
    }

    /// Creates a nested bundle of sub-signals.
    pub fn bundle(name: impl Into<String>, children: Vec<Subsignal>) -> Result<Self, PlatformError> {
        let name = name.into();
        validate_name(&name)?;
        validate_children(&name, &children)?;
        Ok(Self {
            name,
            shape: SignalShape::Bundle(children),
            attrs: Attrs::new(),
        })
    }

    /// Attaches attributes to this sub-signal.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// The sub-signal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leaf binding or bundle.
    pub fn shape(&self) -> &SignalShape {
        &self.shape
    }

    /// Attributes declared directly on this sub-signal.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

/// A named, optionally numbered hardware feature.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Resource {
    key: ResourceKey,
    shape: SignalShape,
    attrs: Attrs,
}

impl Resource {
    /// Creates a bare-pin resource with one implicit signal.
    pub fn new(
        name: impl Into<String>,
        number: Option<u32>,
        io: IoBinding,
    ) -> Result<Self, PlatformError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            key: ResourceKey::new(name, number),
            shape: SignalShape::Leaf(io),
            attrs: Attrs::new(),
        })
    }

    /// Creates a resource made of named sub-signals.
    pub fn bundle(
        name: impl Into<String>,
        number: Option<u32>,
        children: Vec<Subsignal>,
    ) -> Result<Self, PlatformError> {
        let key = ResourceKey::new(name, number);
        validate_name(&key.name)?;
        validate_children(&key.to_string(), &children)?;
        Ok(Self {
            key,
            shape: SignalShape::Bundle(children),
            attrs: Attrs::new(),
        })
    }

    /// Attaches resource-level attributes.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// The lookup key.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// The resource name.
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// The resource number.
    pub fn number(&self) -> Option<u32> {
        self.key.number
    }

    /// Leaf binding or bundle.
    pub fn shape(&self) -> &SignalShape {
        &self.shape
    }

    /// Resource-level attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// All leaves of this resource, depth first in declaration order.
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        self.leaves_at(&[]).unwrap_or_default()
    }

    /// The leaves below the sub-signal at `path` (empty for the whole
    /// resource), or `None` if the path does not exist.
    pub fn leaves_at(&self, path: &[&str]) -> Option<Vec<Leaf<'_>>> {
        let mut shape = &self.shape;
        let mut names = Vec::with_capacity(path.len());
        let mut chain = vec![&self.attrs];

        for segment in path {
            let child = shape.child(segment)?;
            names.push(child.name.as_str());
            chain.push(&child.attrs);
            shape = &child.shape;
        }

        let mut out = Vec::new();
        collect_leaves(shape, &mut names, &mut chain, &mut out);
        Some(out)
    }
}

/// One pin-bound leaf of a resource, with the context needed to compile it.
#[derive(Clone, Debug)]
pub struct Leaf<'a> {
    /// Sub-signal names from the resource root down to this leaf.
    pub path: Vec<&'a str>,
    /// The leaf's binding.
    pub io: &'a IoBinding,
    /// Attribute sets from the resource root down to this leaf, outermost first.
    pub attrs: Vec<&'a Attrs>,
}

fn collect_leaves<'a>(
    shape: &'a SignalShape,
    path: &mut Vec<&'a str>,
    chain: &mut Vec<&'a Attrs>,
    out: &mut Vec<Leaf<'a>>,
) {
    match shape {
        SignalShape::Leaf(io) => out.push(Leaf {
            path: path.clone(),
            io,
            attrs: chain.clone(),
        }),
        SignalShape::Bundle(children) => {
            for child in children {
                path.push(&child.name);
                chain.push(&child.attrs);
                collect_leaves(&child.shape, path, chain, out);
                chain.pop();
                path.pop();
            }
        }
    }
}

/// Checks that `name` is a plain identifier: ASCII letters, digits and `_`.
pub(crate) fn validate_name(name: &str) -> Result<(), PlatformError> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PlatformError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn validate_children(parent: &str, children: &[Subsignal]) -> Result<(), PlatformError> {
    if children.is_empty() {
        return Err(PlatformError::EmptyBundle {
            name: parent.to_string(),
        });
    }
    let mut seen = HashSet::new();
    for child in children {
        if !seen.insert(child.name.as_str()) {
            return Err(PlatformError::DuplicateSubsignal {
                parent: parent.to_string(),
                name: child.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(pins: &str) -> IoBinding {
        IoBinding::pins(pins, Direction::Out).unwrap()
    }

    fn ddr() -> Resource {
        Resource::bundle(
            "ddr3",
            Some(0),
            vec![
                Subsignal::new("rst", out("B4")).unwrap(),
                Subsignal::new(
                    "clk",
                    IoBinding::diff_pairs("L2", "M2", Direction::Out).unwrap(),
                )
                .unwrap()
                .with_attrs(Attrs::new().with("IOSTANDARD", "DIFF_SSTL15")),
                Subsignal::new("a", out("N2 K2 M3")).unwrap(),
            ],
        )
        .unwrap()
        .with_attrs(Attrs::new().with("IOSTANDARD", "SSTL15"))
    }

    #[test]
    fn key_display() {
        assert_eq!(ResourceKey::new("led", Some(3)).to_string(), "led#3");
        assert_eq!(ResourceKey::new("clk", None).to_string(), "clk");
    }

    #[test]
    fn bare_resource_has_one_leaf() {
        let res = Resource::new("led", Some(0), out("A1")).unwrap();
        let leaves = res.leaves();
        assert_eq!(leaves.len(), 1);
        assert!(leaves[0].path.is_empty());
        assert_eq!(leaves[0].io.width(), 1);
    }

    #[test]
    fn bundle_leaves_carry_attr_chain() {
        let res = ddr();
        let leaves = res.leaves();
        let paths: Vec<_> = leaves.iter().map(|l| l.path.join(".")).collect();
        assert_eq!(paths, vec!["rst", "clk", "a"]);
        let clk = &leaves[1];
        assert_eq!(clk.attrs.len(), 2);
        let merged = Attrs::merge_chain(clk.attrs.iter().copied());
        assert_eq!(merged.io_standard().unwrap().to_string(), "DIFF_SSTL15");
    }

    #[test]
    fn nested_bundles() {
        let res = Resource::bundle(
            "ps",
            Some(0),
            vec![
                Subsignal::new("por", IoBinding::pins("C7", Direction::In).unwrap()).unwrap(),
                Subsignal::bundle(
                    "uart",
                    vec![
                        Subsignal::new("tx", out("A2")).unwrap(),
                        Subsignal::new("rx", IoBinding::pins("A3", Direction::In).unwrap())
                            .unwrap(),
                    ],
                )
                .unwrap(),
            ],
        )
        .unwrap();

        let leaves = res.leaves_at(&["uart"]).unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[1].path, vec!["uart", "rx"]);
        assert_eq!(res.leaves_at(&["uart", "tx"]).unwrap().len(), 1);
        assert!(res.leaves_at(&["uart", "cts"]).is_none());
        assert!(res.leaves_at(&["por", "x"]).is_none());
    }

    #[test]
    fn empty_bundle_rejected() {
        let err = Resource::bundle("i2c", Some(0), vec![]).unwrap_err();
        assert!(matches!(err, PlatformError::EmptyBundle { .. }));
    }

    #[test]
    fn duplicate_subsignal_rejected() {
        let err = Resource::bundle(
            "i2c",
            Some(0),
            vec![
                Subsignal::new("scl", out("P16")).unwrap(),
                Subsignal::new("scl", out("P15")).unwrap(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, PlatformError::DuplicateSubsignal { .. }));
    }

    #[test]
    fn invalid_names_rejected() {
        assert!(Resource::new("", None, out("A1")).is_err());
        assert!(Resource::new("a.b", None, out("A1")).is_err());
        assert!(Subsignal::new("tx rx", out("A1")).is_err());
    }

    #[test]
    fn inverted_and_clocked_binding() {
        let clk = IoBinding::pins_n("D9", Direction::In)
            .unwrap()
            .with_clock(Clock::new(Frequency::from_mhz(125.0).unwrap()));
        assert!(clk.is_inverted());
        assert_eq!(clk.clock().unwrap().frequency.mhz(), 125.0);
        assert!(!clk.is_differential());
    }
}
