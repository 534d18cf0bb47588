/// Bilingual phrases that negate or retract an incident claim.
///
/// A match here outranks every other signal: the decision engine forces
/// category OTHER regardless of model or heuristic output.
const NEGATION_PHRASES: &[&str] = &[
    "no fire",
    "no accident",
    "no emergency",
    "not an emergency",
    "false alarm",
    "test only",
    "just testing",
    "ignore this",
    "nothing happened",
    "አደጋ የለም",
    "እሳት የለም",
    "የለም",
    "ልምምድ ነው",
];

/// Returns true if `text` contains any negation phrase.
///
/// Pure case-insensitive substring check; callers pass the normalized
/// request text.
pub fn detect(text: &str) -> bool {
    let t = text.to_lowercase();
    NEGATION_PHRASES.iter().any(|p| t.contains(p))
}
