use crate::models::Category;

/// Keywords that force the +2 severity adjustment.
const HIGH_MARKERS: &[&str] = &[
    "dead",
    "death",
    "killed",
    "died",
    "explosion",
    "bomb",
    "mass casualty",
    "ሞት",
    "ተገደለ",
    "ሞተ",
    "ፍንዳታ",
    "ብዙ ሰዎች ተጎዱ",
];

/// Keywords that force the +1 severity adjustment.
const MEDIUM_MARKERS: &[&str] = &[
    "injured",
    "injury",
    "burn",
    "serious",
    "blood",
    "ጉዳት",
    "ተጎዳ",
    "እሳት ቃጠሎ",
    "ወድቆ",
    "ደም",
];

/// Base severity per category; unknown categories map to 2.
fn base_score(category: Category) -> u8 {
    match category {
        Category::Fire | Category::Medical | Category::Traffic => 3,
        Category::Crime | Category::Infrastructure | Category::Other => 2,
    }
}

/// Map a category plus keyword signals in `text` to a 0-5 severity.
///
/// High markers add +2, otherwise medium markers add +1; the two
/// adjustments are mutually exclusive, high takes precedence. The result
/// is clamped to [0,5]. Empty text yields the unmodified base score.
pub fn estimate(category: Category, text: &str) -> u8 {
    let t = text.to_lowercase();
    let mut score = base_score(category) as i32;

    if HIGH_MARKERS.iter().any(|w| t.contains(w)) {
        score += 2;
    } else if MEDIUM_MARKERS.iter().any(|w| t.contains(w)) {
        score += 1;
    }

    score.clamp(0, 5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_scores() {
        assert_eq!(estimate(Category::Fire, "this is a fire"), 3);
        assert_eq!(estimate(Category::Crime, "theft reported"), 2);
        assert_eq!(estimate(Category::Other, "lost cat"), 2);
        assert_eq!(estimate(Category::Infrastructure, "pipe leaking"), 2);
    }

    #[test]
    fn test_high_markers_add_two() {
        assert_eq!(estimate(Category::Fire, "huge explosion caused fire"), 5);
        assert_eq!(estimate(Category::Medical, "person died in accident"), 5);
        assert_eq!(estimate(Category::Crime, "one person killed"), 4);
    }

    #[test]
    fn test_medium_markers_add_one() {
        assert_eq!(estimate(Category::Traffic, "car crash, minor injury"), 4);
        assert_eq!(estimate(Category::Crime, "armed robbery, serious threat"), 3);
    }

    #[test]
    fn test_high_takes_precedence_over_medium() {
        // "explosion" (high) and "injury" (medium) together must not stack
        assert_eq!(estimate(Category::Fire, "explosion with injury"), 5);
        assert_eq!(estimate(Category::Crime, "bomb threat, serious injury"), 4);
    }

    #[test]
    fn test_score_is_capped_at_five() {
        assert_eq!(estimate(Category::Fire, "explosion death killed"), 5);
    }

    #[test]
    fn test_amharic_markers() {
        assert_eq!(estimate(Category::Traffic, "መኪና ግጭት፣ ጉዳት አለ"), 4);
        assert_eq!(estimate(Category::Fire, "ፍንዳታ ተከስቷል"), 5);
    }

    #[test]
    fn test_empty_text_keeps_base() {
        assert_eq!(estimate(Category::Other, ""), 2);
        assert_eq!(estimate(Category::Fire, ""), 3);
    }
}
