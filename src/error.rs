use crate::executor::FailureKind;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error as StdError;
use thiserror::Error;

/// The only way a curl command can fail to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No quoted URL found in curl command")]
    MissingUrl,
}

/// Transport-level failure while executing a request.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Connection failed: {0}")]
    Network(String),

    #[error("Failed to read response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::InvalidRequest(_) => FailureKind::InvalidRequest,
            TransportError::Proxy(_) => FailureKind::Proxy,
            TransportError::Timeout(_) => FailureKind::Timeout,
            TransportError::Tls(_) => FailureKind::Tls,
            TransportError::Network(_) => FailureKind::Network,
            TransportError::Decode(_) => FailureKind::Decode,
        }
    }

    /// Classifies a reqwest error. `via_proxy` marks requests that were
    /// routed through a proxy, so connect failures are attributed to it.
    pub fn from_reqwest(err: reqwest::Error, via_proxy: bool) -> Self {
        let message = error_chain(&err);

        if err.is_timeout() {
            TransportError::Timeout(message)
        } else if is_tls_error(&err) {
            TransportError::Tls(message)
        } else if err.is_builder() {
            TransportError::InvalidRequest(message)
        } else if err.is_connect() && via_proxy {
            TransportError::Proxy(message)
        } else if err.is_body() || err.is_decode() {
            TransportError::Decode(message)
        } else {
            TransportError::Network(message)
        }
    }
}

/// Joins an error and its sources into one line. reqwest's own message
/// rarely names the underlying cause.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = Vec::new();
    for e in std::iter::successors(Some(err), |&e| e.source()) {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
    }
    parts.join(": ")
}

fn is_tls_error(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |&e| e.source())
        .any(|e| innermost_io(e).is::<rustls::Error>())
}

/// Follows nested `io::Error` wrappers down to the error they carry.
/// `io::Error::source` skips the wrapped error itself, so `get_ref` is used.
fn innermost_io<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err
        .downcast_ref::<std::io::Error>()
        .and_then(|io| io.get_ref())
    {
        Some(inner) => innermost_io(inner),
        None => err,
    }
}

/// Errors surfaced by the HTTP API.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("History entry {0} not found")]
    NotFound(u64),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            AppError::Parse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_FAILED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "message": self.to_string(),
                "code": error_code,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_kinds() {
        assert_eq!(
            TransportError::Proxy("refused".into()).kind(),
            FailureKind::Proxy
        );
        assert_eq!(
            TransportError::Timeout("slow".into()).kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            TransportError::InvalidRequest("bad".into()).to_string(),
            "Invalid request: bad"
        );
    }

    #[test]
    fn test_nested_io_errors_reveal_rustls_cause() {
        let rustls_err = rustls::Error::InvalidMessage(rustls::InvalidMessage::InvalidContentType);
        let inner = std::io::Error::new(std::io::ErrorKind::InvalidData, rustls_err);
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        assert!(is_tls_error(&outer));

        let plain = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(!is_tls_error(&plain));
    }

    #[test]
    fn test_error_chain_includes_io_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(error_chain(&io), "refused");
    }

    #[test]
    fn test_app_error_status() {
        let response = AppError::Parse(ParseError::MissingUrl).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let response = AppError::NotFound(7).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
