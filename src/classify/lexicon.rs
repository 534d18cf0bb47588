use crate::error::{AppError, Result};
use crate::models::Category;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Minimal built-in lexicon used when the external document is missing,
/// malformed, or empty. Covers only the two categories that must never be
/// missed even in a degraded deployment.
static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_entries(vec![
        (
            Category::Fire,
            phrases(&["fire", "smoke", "flame", "burning", "እሳት", "ቃጠሎ"]),
        ),
        (
            Category::Medical,
            phrases(&[
                "medical",
                "injury",
                "injured",
                "ambulance",
                "sick",
                "ሕክምና",
                "አምቡላንስ",
                "ታመመ",
            ]),
        ),
    ])
});

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

/// Versionable keyword table driving the heuristic classifier.
///
/// Entries are an explicit ordered list rather than a map, so the
/// tie-break order between overlapping categories is fixed by
/// [`Category::priority_order`] and not by document key order.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<(Category, Vec<String>)>,
}

impl Lexicon {
    fn from_entries(entries: Vec<(Category, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// The embedded two-category fallback lexicon.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Load a lexicon from an external JSON document mapping category tag
    /// to a list of trigger phrases.
    ///
    /// Category tags are case-insensitive ("fire", "Fire", "FIRE" all key
    /// the same category); phrases are lowercased on load. Categories are
    /// arranged in the fixed priority order regardless of key order in the
    /// document; unknown tags are skipped with a warning, and an OTHER
    /// entry is ignored because OTHER is never keyword-matched.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&raw)
            .map_err(|e| AppError::Serialization(format!("invalid lexicon document: {}", e)))?;

        let map = doc.as_object().ok_or_else(|| {
            AppError::Validation("lexicon document must be a JSON object".to_string())
        })?;

        let mut by_category: HashMap<Category, Vec<String>> = HashMap::new();
        for (key, value) in map {
            if key.eq_ignore_ascii_case("OTHER") {
                continue;
            }
            let category = Category::parse_or_other(key);
            if category == Category::Other {
                tracing::warn!(category = %key, "Unknown category tag in lexicon, skipping");
                continue;
            }
            let Some(list) = value.as_array() else {
                tracing::warn!(category = %key, "Lexicon entry is not an array, skipping");
                continue;
            };
            let words = by_category.entry(category).or_default();
            words.extend(
                list.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty()),
            );
        }

        let mut entries = Vec::new();
        for category in Category::priority_order() {
            if let Some(words) = by_category.remove(&category) {
                if !words.is_empty() {
                    entries.push((category, words));
                }
            }
        }

        Ok(Self::from_entries(entries))
    }

    /// Load from `path`, degrading to the built-in lexicon when the
    /// document is absent, malformed, or yields no entries.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(lexicon) if !lexicon.is_empty() => {
                tracing::info!(
                    path = %path.display(),
                    categories = lexicon.entries.len(),
                    "Loaded keyword lexicon"
                );
                lexicon
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Lexicon document is empty, using built-in keywords");
                Self::builtin().clone()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load lexicon, using built-in keywords");
                Self::builtin().clone()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First category whose trigger phrases substring-match `text`.
    ///
    /// `text` is expected lowercased; iteration order is the fixed
    /// priority order established at load time.
    pub fn match_category(&self, text: &str) -> Option<Category> {
        for (category, words) in &self.entries {
            if words.iter().any(|w| text.contains(w.as_str())) {
                return Some(*category);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_matches_fire_and_medical() {
        let lexicon = Lexicon::builtin();
        assert_eq!(
            lexicon.match_category("big fire downtown"),
            Some(Category::Fire)
        );
        assert_eq!(
            lexicon.match_category("need an ambulance now"),
            Some(Category::Medical)
        );
        assert_eq!(lexicon.match_category("lost wallet"), None);
    }

    #[test]
    fn test_builtin_matches_amharic() {
        assert_eq!(
            Lexicon::builtin().match_category("በአካባቢው እሳት አለ"),
            Some(Category::Fire)
        );
    }

    #[test]
    fn test_load_orders_by_priority_not_key_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // TRAFFIC listed first in the document, FIRE must still win ties
        write!(
            file,
            r#"{{"TRAFFIC": ["crash"], "FIRE": ["fire", "crash"]}}"#
        )
        .unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.match_category("crash"), Some(Category::Fire));
    }

    #[test]
    fn test_load_accepts_mixed_case_tags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fire": ["fire"], "Traffic": ["crash"], "crime": ["theft"]}}"#
        )
        .unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(
            lexicon.match_category("crash on the road"),
            Some(Category::Traffic)
        );
        assert_eq!(lexicon.match_category("fire nearby"), Some(Category::Fire));
        assert_eq!(lexicon.match_category("theft at night"), Some(Category::Crime));
    }

    #[test]
    fn test_load_merges_duplicate_tags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"FIRE": ["fire"], "fire": ["smoke"]}}"#).unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.match_category("fire ahead"), Some(Category::Fire));
        assert_eq!(lexicon.match_category("smoke rising"), Some(Category::Fire));
    }

    #[test]
    fn test_load_skips_unknown_tags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"EARTHQUAKE": ["quake"], "CRIME": ["theft"]}}"#).unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.match_category("quake"), None);
        assert_eq!(lexicon.match_category("theft reported"), Some(Category::Crime));
    }

    #[test]
    fn test_load_or_builtin_on_missing_file() {
        let lexicon = Lexicon::load_or_builtin(Path::new("/nonexistent/keywords.json"));
        assert_eq!(
            lexicon.match_category("fire in the market"),
            Some(Category::Fire)
        );
    }

    #[test]
    fn test_load_or_builtin_on_malformed_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let lexicon = Lexicon::load_or_builtin(file.path());
        assert!(!lexicon.is_empty());
        assert_eq!(
            lexicon.match_category("smoke everywhere"),
            Some(Category::Fire)
        );
    }

    #[test]
    fn test_phrases_lowercased_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"CRIME": ["Robbery", "GUN"]}}"#).unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.match_category("robbery at the shop"), Some(Category::Crime));
        assert_eq!(lexicon.match_category("man with a gun"), Some(Category::Crime));
    }
}
