//! Availability answers returned by stores.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::quantity::Quantity;

/// Answer to "can this store cover this quantity?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Availability {
    /// The full quantity is available.
    Available,
    /// Only `available` can be covered (possibly zero).
    Insufficient { available: Quantity },
    /// The store could not tell, e.g. inference timed out or failed.
    ///
    /// Never to be read as either present or absent.
    Unknown,
}

impl Availability {
    /// Return true if the full quantity is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Return true if the store could not answer.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Verdict from the availability inference collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferredPresence {
    confidence: f64,
    likely_present: bool,
}

impl InferredPresence {
    /// Create a validated verdict.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfidence`] unless `0 <= confidence <= 1`.
    pub fn try_new(confidence: f64, likely_present: bool) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::InvalidConfidence { confidence });
        }
        Ok(Self {
            confidence,
            likely_present,
        })
    }

    /// Confidence that the ingredient is already present (0..=1).
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub const fn likely_present(&self) -> bool {
        self.likely_present
    }

    /// Return true if the verdict is positive with at least `min_confidence`.
    #[must_use]
    pub fn is_confidently_present(&self, min_confidence: f64) -> bool {
        self.likely_present && self.confidence >= min_confidence
    }
}
