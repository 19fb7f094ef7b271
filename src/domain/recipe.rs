//! Recipe selection lifecycle.
//!
//! Recipe content is owned by the generator; the core only tracks where a
//! selected recipe is in its claim lifecycle:
//!
//! ```text
//! Selected ──▶ ClaimsReserved ──▶ Cooked
//!    │               │
//!    └───────────────┴──────────▶ Abandoned
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{RecipeId, SessionId};

/// Lifecycle status of a selected recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    Selected,
    ClaimsReserved,
    Cooked,
    Abandoned,
}

impl RecipeStatus {
    /// Stable name used in logs and persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::ClaimsReserved => "claims_reserved",
            Self::Cooked => "cooked",
            Self::Abandoned => "abandoned",
        }
    }

    /// Parse a persisted status name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "selected" => Some(Self::Selected),
            "claims_reserved" => Some(Self::ClaimsReserved),
            "cooked" => Some(Self::Cooked),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Return true for Cooked and Abandoned.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cooked | Self::Abandoned)
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe selected within a planning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub session_id: SessionId,
    pub name: String,
    pub status: RecipeStatus,
    /// Selection order within the planner; keeps listings deterministic.
    pub sequence: u64,
    pub selected_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a newly selected recipe.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] if `name` is blank.
    pub fn select(
        session_id: SessionId,
        name: impl Into<String>,
        sequence: u64,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyName {
                field: "recipe name",
            });
        }
        Ok(Self {
            id: RecipeId::new(),
            session_id,
            name,
            status: RecipeStatus::Selected,
            sequence,
            selected_at: Utc::now(),
        })
    }

    /// Return true once the recipe is Cooked or Abandoned.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record that claims now exist for this recipe.
    ///
    /// Idempotent while the recipe is already `ClaimsReserved`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRecipeTransition`] for terminal recipes.
    pub fn mark_reserved(&mut self) -> Result<(), DomainError> {
        match self.status {
            RecipeStatus::Selected | RecipeStatus::ClaimsReserved => {
                self.status = RecipeStatus::ClaimsReserved;
                Ok(())
            }
            from => Err(self.refuse(from, RecipeStatus::ClaimsReserved)),
        }
    }

    /// Check that the recipe can be finished as `to` without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRecipeTransition`] if the recipe is already
    /// terminal or `to` is not a terminal status.
    pub fn check_finish(&self, to: RecipeStatus) -> Result<(), DomainError> {
        if self.status.is_terminal() || !to.is_terminal() {
            return Err(self.refuse(self.status, to));
        }
        Ok(())
    }

    /// Move the recipe to Cooked or Abandoned.
    ///
    /// # Errors
    ///
    /// Same as [`check_finish`](Self::check_finish).
    pub fn finish(&mut self, to: RecipeStatus) -> Result<(), DomainError> {
        self.check_finish(to)?;
        self.status = to;
        Ok(())
    }

    fn refuse(&self, from: RecipeStatus, to: RecipeStatus) -> DomainError {
        DomainError::InvalidRecipeTransition {
            recipe: self.id.clone(),
            from,
            to,
        }
    }
}
