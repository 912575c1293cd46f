//! Pin identifiers, pin expressions and differential pairs.
//!
//! A pin expression is the compact textual notation board files use for pin
//! lists: whitespace separated identifiers, with `-` marking a position that
//! is intentionally left unconnected. Positions are significant, since they
//! line up with connector slots and with the bits of a multi-bit signal.

use crate::error::PlatformError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The token marking an unconnected slot.
pub const UNCONNECTED: &str = "-";

/// A board pin (or connector pin) identifier, such as `H16`, `PIN_AF14` or `a0_p`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    /// Creates a pin identifier, checking it against the accepted alphabet
    /// (ASCII letters, digits, `_` and `.`).
    pub fn new(name: &str) -> Result<Self, PlatformError> {
        if name.is_empty() {
            return Err(PlatformError::MalformedExpression {
                expr: name.to_string(),
                reason: "empty pin name".to_string(),
            });
        }
        if let Some(bad) = name.chars().find(|&c| !is_pin_char(c)) {
            return Err(PlatformError::MalformedExpression {
                expr: name.to_string(),
                reason: format!("invalid character '{bad}' in pin '{name}'"),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_pin_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// An ordered sequence of pin slots, each either a pin or unconnected.
///
/// The width is fixed once parsed and slot indices are stable.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PinExpr {
    slots: Vec<Option<PinId>>,
}

impl PinExpr {
    /// Parses a whitespace-delimited pin list such as `"A1 B2 - C3"`.
    ///
    /// Fails with [`PlatformError::MalformedExpression`] if the expression has
    /// no tokens or any token falls outside the identifier alphabet.
    pub fn parse(expr: &str) -> Result<Self, PlatformError> {
        let malformed = |reason: String| PlatformError::MalformedExpression {
            expr: expr.to_string(),
            reason,
        };

        let mut slots = Vec::new();
        for token in expr.split_whitespace() {
            if token == UNCONNECTED {
                slots.push(None);
                continue;
            }
            if let Some(bad) = token.chars().find(|&c| !is_pin_char(c)) {
                return Err(malformed(format!(
                    "invalid character '{bad}' in pin '{token}'"
                )));
            }
            slots.push(Some(PinId(token.to_string())));
        }

        if slots.is_empty() {
            return Err(malformed("expression has no pins".to_string()));
        }
        Ok(Self { slots })
    }

    /// Number of slots, connected or not.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// All slots in positional order.
    pub fn slots(&self) -> &[Option<PinId>] {
        &self.slots
    }

    /// The slot at `index`, or `None` if out of range.
    pub fn slot(&self, index: usize) -> Option<Option<&PinId>> {
        self.slots.get(index).map(Option::as_ref)
    }

    /// Iterates over connected pins only, in positional order.
    pub fn pins(&self) -> impl Iterator<Item = &PinId> + '_ {
        self.slots.iter().flatten()
    }

    /// Renders the expression back into tokens, `-` for unconnected slots.
    pub fn to_tokens(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|s| s.as_ref().map_or(UNCONNECTED, PinId::as_str))
            .collect()
    }
}

impl fmt::Display for PinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tokens().join(" "))
    }
}

/// Positive and negative halves of one or more differential signals.
///
/// Bit `i` of the signal is the pair (`p[i]`, `n[i]`).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct DiffPairs {
    p: PinExpr,
    n: PinExpr,
}

impl DiffPairs {
    /// Pairs two parsed expressions, checking that their widths match and
    /// that no pin appears in both halves.
    pub fn new(p: PinExpr, n: PinExpr) -> Result<Self, PlatformError> {
        Self::validate(&p, &n)?;
        Ok(Self { p, n })
    }

    /// Parses and pairs two pin lists.
    pub fn parse(p: &str, n: &str) -> Result<Self, PlatformError> {
        Self::new(PinExpr::parse(p)?, PinExpr::parse(n)?)
    }

    /// Checks the pairing invariants without constructing a value.
    pub fn validate(p: &PinExpr, n: &PinExpr) -> Result<(), PlatformError> {
        let malformed = |reason: String| PlatformError::MalformedDiffPair {
            p: p.to_string(),
            n: n.to_string(),
            reason,
        };

        if p.width() != n.width() {
            return Err(malformed(format!(
                "positive half has {} pins but negative half has {}",
                p.width(),
                n.width()
            )));
        }
        let positive: HashSet<&PinId> = p.pins().collect();
        if let Some(shared) = n.pins().find(|pin| positive.contains(pin)) {
            return Err(malformed(format!("pin '{shared}' appears in both halves")));
        }
        Ok(())
    }

    /// The positive half.
    pub fn p(&self) -> &PinExpr {
        &self.p
    }

    /// The negative half.
    pub fn n(&self) -> &PinExpr {
        &self.n
    }

    /// Number of differential pairs.
    pub fn width(&self) -> usize {
        self.p.width()
    }
}
