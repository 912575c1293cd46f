//! Connectors: physical headers whose pins resources may address indirectly.
//!
//! A positional connector lists its board pins in header order; its pins are
//! named `"1"` through `"N"`. A named connector maps arbitrary pin names (such
//! as `a0_p`) to board pins.

use crate::error::PlatformError;
use crate::pins::{PinExpr, PinId};
use crate::resource::validate_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The lookup key of a connector: name plus number, e.g. `pmod#1`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct ConnectorKey {
    /// Connector family name.
    pub name: String,
    /// Index within the family.
    pub number: u32,
}

impl ConnectorKey {
    /// Creates a key.
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

impl fmt::Display for ConnectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.number)
    }
}

/// The pin mapping of a connector.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorPins {
    /// Board pins in header order; slot `i` is connector pin `i + 1`.
    Positional(PinExpr),
    /// Connector pin name to board pin.
    Named(BTreeMap<String, PinId>),
}

/// A named, numbered header exposing board pins.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Connector {
    key: ConnectorKey,
    pins: ConnectorPins,
}

impl Connector {
    /// Declares a positional connector from a pin expression.
    pub fn positional(name: &str, number: u32, pins: &str) -> Result<Self, PlatformError> {
        validate_name(name)?;
        Ok(Self {
            key: ConnectorKey::new(name, number),
            pins: ConnectorPins::Positional(PinExpr::parse(pins)?),
        })
    }

    /// Declares a named connector from `(connector pin, board pin)` pairs.
    pub fn named<'a>(
        name: &str,
        number: u32,
        mapping: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PlatformError> {
        validate_name(name)?;
        let mut pins = BTreeMap::new();
        for (conn_pin, board_pin) in mapping {
            PinId::new(conn_pin)?;
            if pins.insert(conn_pin.to_string(), PinId::new(board_pin)?).is_some() {
                return Err(PlatformError::DuplicateConnectorPin {
                    connector: format!("{name}#{number}"),
                    pin: conn_pin.to_string(),
                });
            }
        }
        if pins.is_empty() {
            return Err(PlatformError::MalformedExpression {
                expr: String::new(),
                reason: format!("connector '{name}#{number}' maps no pins"),
            });
        }
        Ok(Self {
            key: ConnectorKey::new(name, number),
            pins: ConnectorPins::Named(pins),
        })
    }

    /// The lookup key.
    pub fn key(&self) -> &ConnectorKey {
        &self.key
    }

    /// The pin mapping.
    pub fn pins(&self) -> &ConnectorPins {
        &self.pins
    }

    /// Resolves a connector pin name to a board pin.
    ///
    /// Returns `None` if the connector has no such pin, and `Some(None)` if
    /// the pin exists but is declared unconnected (`-`).
    pub fn lookup(&self, conn_pin: &str) -> Option<Option<&PinId>> {
        match &self.pins {
            ConnectorPins::Positional(expr) => {
                let position: usize = conn_pin.parse().ok()?;
                expr.slot(position.checked_sub(1)?)
            }
            ConnectorPins::Named(map) => map.get(conn_pin).map(Some),
        }
    }

    /// Iterates over `(connector pin, board pin)` for every connected pin.
    pub fn connected(&self) -> Vec<(String, &PinId)> {
        match &self.pins {
            ConnectorPins::Positional(expr) => expr
                .slots()
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| slot.as_ref().map(|pin| ((i + 1).to_string(), pin)))
                .collect(),
            ConnectorPins::Named(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        }
    }
}
