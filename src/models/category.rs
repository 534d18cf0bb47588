use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Incident classification taxonomy.
///
/// Every classification the service emits uses exactly one of these
/// variants; raw model label ids never leak to callers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Category {
    Fire,
    Medical,
    Crime,
    Traffic,
    Infrastructure,
    Other,
}

impl Category {
    /// Fixed tie-break order for keyword matching.
    ///
    /// When a report matches keywords from several categories (e.g. "car
    /// crash, injury"), the first match in this order wins. OTHER is the
    /// fallback and never carries trigger phrases of its own.
    pub const fn priority_order() -> [Category; 5] {
        [
            Category::Fire,
            Category::Medical,
            Category::Traffic,
            Category::Crime,
            Category::Infrastructure,
        ]
    }

    /// Parse a category tag, mapping unknown or generic tags to OTHER.
    pub fn parse_or_other(tag: &str) -> Category {
        tag.trim().parse().unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Category::parse_or_other("fire"), Category::Fire);
        assert_eq!(Category::parse_or_other("TRAFFIC"), Category::Traffic);
        assert_eq!(Category::parse_or_other(" Medical "), Category::Medical);
    }

    #[test]
    fn test_unknown_tag_maps_to_other() {
        assert_eq!(Category::parse_or_other("LABEL_1"), Category::Other);
        assert_eq!(Category::parse_or_other(""), Category::Other);
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(Category::Fire.to_string(), "FIRE");
        assert_eq!(Category::Infrastructure.to_string(), "INFRASTRUCTURE");
    }

    #[test]
    fn test_priority_order_excludes_other() {
        assert!(!Category::priority_order().contains(&Category::Other));
    }
}
