pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::classify::DecisionEngine;
use crate::context::InferenceContext;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<InferenceContext>,
    pub engine: Arc<DecisionEngine>,
    /// Expected `x-api-key` value; None disables the check
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(ctx: Arc<InferenceContext>) -> Self {
        let engine = Arc::new(DecisionEngine::new(ctx.clone()));
        Self {
            ctx,
            engine,
            api_key: None,
        }
    }

    /// Require an API key on classification requests
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}
