use axum::Json;
use serde::Serialize;

use super::CommandInput;
use crate::error::{AppError, ParseError};
use crate::parser::{parse_with_diagnostics, CurlRequest, Diagnostic};

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub request: CurlRequest,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a command without sending it.
pub async fn parse_command(Json(input): Json<CommandInput>) -> Result<Json<ParseResponse>, AppError> {
    let outcome = parse_with_diagnostics(&input.command);
    let request = outcome.request.ok_or(ParseError::MissingUrl)?;

    Ok(Json(ParseResponse {
        request,
        diagnostics: outcome.diagnostics,
    }))
}
