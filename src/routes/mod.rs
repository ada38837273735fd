pub mod health;
pub mod history;
pub mod parse;
pub mod run;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::executor::Executor;
use crate::history::History;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub executor: Executor,
    pub history: Arc<History>,
}

/// Request body for endpoints that take a raw curl command.
#[derive(Debug, Deserialize)]
pub struct CommandInput {
    pub command: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/parse", post(parse::parse_command))
        .route("/api/run", post(run::run_command))
        .route(
            "/api/history",
            get(history::list_history).delete(history::clear_history),
        )
        .route(
            "/api/history/:id",
            get(history::get_entry).delete(history::delete_entry),
        )
        .with_state(state)
}
