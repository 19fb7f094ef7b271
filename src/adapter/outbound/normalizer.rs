//! Lexical name normalizer.

use crate::port::outbound::normalizer::NameNormalizer;

/// Folds case and whitespace. `"  Ground   Beef "` and `"ground beef"` map to
/// the same canonical name; synonyms and plurals are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicNormalizer;

impl NameNormalizer for BasicNormalizer {
    fn canonical_name(&self, raw: &str) -> Option<String> {
        let name = raw
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }
}
