//! Frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Parses strings like `"125MHz"`, `"32.768kHz"`, `"1GHz"` and bare numbers
/// (`"50e6"`, interpreted as Hz). Only finite, strictly positive values are
/// accepted, since a clock annotation with a zero or negative frequency has
/// no period to constrain.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    ///
    /// Returns `None` if `hz` is not finite or not strictly positive.
    pub fn from_hz(hz: f64) -> Option<Self> {
        (hz.is_finite() && hz > 0.0).then_some(Self(hz))
    }

    /// Creates a frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Option<Self> {
        Self::from_hz(mhz * 1_000_000.0)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period in nanoseconds.
    pub fn period_ns(&self) -> f64 {
        1_000_000_000.0 / self.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}kHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

impl TryFrom<f64> for Frequency {
    type Error = ParseFrequencyError;

    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::from_hz(hz).ok_or_else(|| ParseFrequencyError {
            input: hz.to_string(),
        })
    }
}

impl From<Frequency> for f64 {
    fn from(f: Frequency) -> f64 {
        f.0
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency '{input}'")]
pub struct ParseFrequencyError {
    /// The input that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        Frequency::from_hz(val * scale).ok_or_else(err)
    }
}
