//! Ingredient name normalization port.

/// Maps raw ingredient mentions to canonical names.
///
/// Naming content (synonyms, plural folding, brand stripping) belongs to the
/// implementation; the registry only relies on equal canonical names meaning
/// the same ingredient.
pub trait NameNormalizer: Send + Sync {
    /// Return the canonical name for `raw`, or `None` if it names nothing.
    fn canonical_name(&self, raw: &str) -> Option<String>;
}
