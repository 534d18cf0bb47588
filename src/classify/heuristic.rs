use crate::classify::Lexicon;
use crate::models::Category;

/// Deterministic keyword classifier.
///
/// Scans the lexicon in its fixed priority order and returns the first
/// category with a matching trigger phrase. When the configured lexicon
/// has no match and is empty (degenerate load), the built-in minimal
/// FIRE/MEDICAL list gets a final look before falling back to OTHER.
pub fn classify(lexicon: &Lexicon, text: &str) -> Category {
    if let Some(category) = lexicon.match_category(text) {
        return category;
    }
    if lexicon.is_empty() {
        if let Some(category) = Lexicon::builtin().match_category(text) {
            return category;
        }
    }
    Category::Other
}
