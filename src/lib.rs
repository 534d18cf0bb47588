//! Incident report classification service
//!
//! Classifies short bilingual (English/Amharic) incident reports into a
//! fixed category taxonomy and assigns a bounded severity score for
//! downstream triage. The decision engine reconciles a statistical
//! model's prediction with a deterministic keyword heuristic, a negation
//! filter, and a severity-inference rule, and is guaranteed to produce a
//! well-formed response for every request.

pub mod api;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod inference;
pub mod models;
pub mod training;
