//! Attribute sets: electrical and tooling metadata attached to resources.
//!
//! Attribute sets nest the same way resources do. The effective attributes of
//! a pin are computed by [`Attrs::merge_chain`] over the sets found on the
//! path from the platform defaults down to the leaf sub-signal, with inner
//! definitions overriding outer ones.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The attribute key holding the I/O standard.
pub const IOSTANDARD: &str = "IOSTANDARD";

/// I/O standards recognized by name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IoStandard {
    /// 3.3 V LVTTL.
    Lvttl,
    /// 3.3 V LVCMOS.
    Lvcmos33,
    /// 2.5 V LVCMOS.
    Lvcmos25,
    /// 1.8 V LVCMOS.
    Lvcmos18,
    /// 1.5 V LVCMOS.
    Lvcmos15,
    /// 1.2 V LVCMOS.
    Lvcmos12,
    /// 1.5 V SSTL (DDR3).
    Sstl15,
    /// 1.5 V SSTL with split-termination DCI.
    Sstl15TDci,
    /// 1.35 V SSTL (DDR3L).
    Sstl135,
    /// Differential 1.5 V SSTL.
    DiffSstl15,
    /// Differential 1.5 V SSTL with DCI.
    DiffSstl15Dci,
    /// Differential 1.35 V SSTL.
    DiffSstl135,
    /// LVDS (1.8 V banks).
    Lvds,
    /// LVDS (2.5 V banks).
    Lvds25,
    /// TMDS (3.3 V banks).
    Tmds33,
}

impl IoStandard {
    const ALL: [(IoStandard, &'static str); 15] = [
        (IoStandard::Lvttl, "LVTTL"),
        (IoStandard::Lvcmos33, "LVCMOS33"),
        (IoStandard::Lvcmos25, "LVCMOS25"),
        (IoStandard::Lvcmos18, "LVCMOS18"),
        (IoStandard::Lvcmos15, "LVCMOS15"),
        (IoStandard::Lvcmos12, "LVCMOS12"),
        (IoStandard::Sstl15, "SSTL15"),
        (IoStandard::Sstl15TDci, "SSTL15_T_DCI"),
        (IoStandard::Sstl135, "SSTL135"),
        (IoStandard::DiffSstl15, "DIFF_SSTL15"),
        (IoStandard::DiffSstl15Dci, "DIFF_SSTL15_DCI"),
        (IoStandard::DiffSstl135, "DIFF_SSTL135"),
        (IoStandard::Lvds, "LVDS"),
        (IoStandard::Lvds25, "LVDS_25"),
        (IoStandard::Tmds33, "TMDS_33"),
    ];

    /// The toolchain spelling of this standard.
    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(s, _)| *s == self)
            .map_or("", |(_, name)| name)
    }

    /// Returns `true` for standards that require a differential pair.
    pub fn is_differential(self) -> bool {
        matches!(
            self,
            IoStandard::DiffSstl15
                | IoStandard::DiffSstl15Dci
                | IoStandard::DiffSstl135
                | IoStandard::Lvds
                | IoStandard::Lvds25
                | IoStandard::Tmds33
        )
    }
}

impl FromStr for IoStandard {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(std, _)| *std)
            .ok_or(())
    }
}

impl fmt::Display for IoStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of one attribute.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AttrValue {
    /// A recognized I/O standard.
    Standard(IoStandard),
    /// Any other value, passed through verbatim.
    Text(String),
}

impl AttrValue {
    /// Interprets `value` for `key`: `IOSTANDARD` values naming a known
    /// standard become [`AttrValue::Standard`], everything else is text.
    pub fn for_key(key: &str, value: &str) -> Self {
        if key == IOSTANDARD {
            if let Ok(std) = value.parse() {
                return AttrValue::Standard(std);
            }
        }
        AttrValue::Text(value.to_string())
    }

    /// The recognized I/O standard, if this is one.
    pub fn as_standard(&self) -> Option<IoStandard> {
        match self {
            AttrValue::Standard(std) => Some(*std),
            AttrValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Standard(std) => write!(f, "{std}"),
            AttrValue::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An immutable-by-convention mapping from attribute name to value.
///
/// Keys are unique and kept sorted, so rendering is deterministic.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this set with `key` set to `value`, replacing any earlier value.
    pub fn with(mut self, key: impl Into<String>, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: &str) {
        let key = key.into();
        let value = AttrValue::for_key(&key, value);
        self.0.insert(key, value);
    }

    /// Looks up an attribute.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// The `IOSTANDARD` attribute, if set.
    pub fn io_standard(&self) -> Option<&AttrValue> {
        self.get(IOSTANDARD)
    }

    /// Iterates over attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new set with `inner`'s entries layered over this one.
    pub fn overlay(&self, inner: &Attrs) -> Attrs {
        let mut merged = self.0.clone();
        for (key, value) in &inner.0 {
            merged.insert(key.clone(), value.clone());
        }
        Attrs(merged)
    }

    /// Merges a chain ordered from outermost to innermost.
    ///
    /// For every key the innermost definition wins. An empty chain yields an
    /// empty set.
    pub fn merge_chain<'a>(chain: impl IntoIterator<Item = &'a Attrs>) -> Attrs {
        chain
            .into_iter()
            .fold(Attrs::new(), |acc, inner| acc.overlay(inner))
    }
}

impl<K: Into<String>> FromIterator<(K, String)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (key, value) in iter {
            attrs.insert(key, &value);
        }
        attrs
    }
}
