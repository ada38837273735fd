use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Per-transport settings fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Upper bound for the whole exchange, connect through body.
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Raw response handed back by a [`Transport`](super::Transport).
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    /// Header pairs in wire order. Repeated names appear once per value.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    Timeout,
    Tls,
    Proxy,
    Decode,
    InvalidRequest,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Timeout => "timeout",
            FailureKind::Tls => "tls",
            FailureKind::Proxy => "proxy",
            FailureKind::Decode => "decode",
            FailureKind::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of executing a request.
///
/// Any completed HTTP exchange is a `Success`, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ExecutionResult {
    #[serde(rename_all = "camelCase")]
    Success {
        status: u16,
        headers: HashMap<String, String>,
        set_cookie: String,
        body: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl ExecutionResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExecutionResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Response body, or an empty string for failures.
    pub fn body(&self) -> &str {
        match self {
            ExecutionResult::Success { body, .. } => body,
            ExecutionResult::Failure { .. } => "",
        }
    }

    /// Failure message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { message, .. } => Some(message),
        }
    }
}

impl From<TransportError> for ExecutionResult {
    fn from(err: TransportError) -> Self {
        ExecutionResult::failure(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let result = ExecutionResult::Success {
            status: 200,
            headers: HashMap::from([("content-type".to_string(), "text/plain".to_string())]),
            set_cookie: "a=1".to_string(),
            body: "ok".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["outcome"], "success");
        assert_eq!(value["setCookie"], "a=1");
        assert_eq!(value["headers"]["content-type"], "text/plain");
    }

    #[test]
    fn test_failure_from_transport_error() {
        let result = ExecutionResult::from(TransportError::Network("refused".to_string()));
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("Connection failed: refused"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"outcome": "failure", "kind": "network", "message": "Connection failed: refused"})
        );
    }
}
