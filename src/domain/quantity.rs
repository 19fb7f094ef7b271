//! Quantity and unit representation.
//!
//! Quantities are exact decimals so that splitting a requirement across
//! stores is repeatable to the last digit. Units are opaque labels: two
//! quantities only combine when their units match, and nothing here ever
//! converts between units.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amount of an ingredient, always interpreted together with a [`Unit`].
pub type Quantity = Decimal;

/// Normalized unit label (e.g., "lb", "cup", "each").
///
/// Labels are trimmed, lowercased and have inner whitespace collapsed, so
/// `" Fl  Oz"` and `"fl oz"` are the same unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Unit(String);

impl Unit {
    /// Create a unit from a raw label.
    pub fn new(label: impl AsRef<str>) -> Self {
        let normalized = label
            .as_ref()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self(normalized)
    }

    /// Get the unit label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
