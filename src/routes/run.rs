use axum::{extract::State, Json};

use super::{AppState, CommandInput};
use crate::error::AppError;
use crate::history::HistoryEntry;
use crate::parser::parse_curl_command;

/// Parses, executes and records a command. Commands that do not parse are
/// rejected before anything is sent or recorded.
pub async fn run_command(
    State(state): State<AppState>,
    Json(input): Json<CommandInput>,
) -> Result<Json<HistoryEntry>, AppError> {
    let request = parse_curl_command(&input.command)?;
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        "Running curl command"
    );

    let result = state.executor.execute(&request).await;
    if let Some(message) = result.error_message() {
        tracing::warn!(message = %message, "Command failed");
    }

    let entry = state.history.record(input.command, result).await;
    Ok(Json(entry))
}
