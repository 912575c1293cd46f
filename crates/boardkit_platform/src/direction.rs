//! Signal direction as seen from the FPGA fabric.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a pin-bound signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven from outside the FPGA.
    #[serde(alias = "i", alias = "input")]
    In,
    /// Driven by the FPGA.
    #[serde(alias = "o", alias = "output")]
    Out,
    /// Bidirectional.
    #[serde(rename = "inout", alias = "io")]
    InOut,
}

impl Direction {
    /// Returns `true` if two bindings of one logical signal with these
    /// directions can coexist.
    ///
    /// Only outputs may reuse a name; an input (or the input half of an
    /// inout) cannot be driven by two distinct physical bindings. Reuse
    /// still has to produce distinct ports, as with two bundles whose
    /// subsignals differ.
    pub fn can_share_with(self, other: Direction) -> bool {
        self == Direction::Out && other == Direction::Out
    }

    /// Returns `true` if the pin is driven from outside.
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        })
    }
}

/// Error returned for an unrecognized direction string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction '{0}': expected in, out or inout")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "i" | "in" | "input" => Ok(Direction::In),
            "o" | "out" | "output" => Ok(Direction::Out),
            "io" | "inout" => Ok(Direction::InOut),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_forms() {
        assert_eq!("i".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!("output".parse::<Direction>().unwrap(), Direction::Out);
        assert_eq!("io".parse::<Direction>().unwrap(), Direction::InOut);
        assert!("oe".parse::<Direction>().is_err());
    }

    #[test]
    fn only_outputs_share() {
        assert!(Direction::Out.can_share_with(Direction::Out));
        assert!(!Direction::In.can_share_with(Direction::In));
        assert!(!Direction::Out.can_share_with(Direction::In));
        assert!(!Direction::InOut.can_share_with(Direction::Out));
    }

    #[test]
    fn display_and_serde_agree() {
        for dir in [Direction::In, Direction::Out, Direction::InOut] {
            let json = serde_json::to_string(&dir).unwrap();
            assert_eq!(json, format!("\"{dir}\""));
        }
    }

    #[test]
    fn deserialize_short_forms() {
        let dirs: Vec<Direction> = serde_json::from_str(r#"["i", "o", "io", "output"]"#).unwrap();
        assert_eq!(
            dirs,
            vec![Direction::In, Direction::Out, Direction::InOut, Direction::Out]
        );
    }
}
