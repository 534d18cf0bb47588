/// Classification decision core
///
/// This module contains the actual decision logic of the service:
/// - Keyword lexicon loading with a built-in minimal fallback
/// - Negation detection (highest-priority signal)
/// - Deterministic keyword heuristic used as fallback and override
/// - Severity estimation from category plus text markers
/// - The per-request decision engine reconciling all signals

pub mod engine;
pub mod heuristic;
pub mod lexicon;
pub mod negation;
pub mod severity;

pub use engine::DecisionEngine;
pub use lexicon::Lexicon;
