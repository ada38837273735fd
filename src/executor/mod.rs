//! Request execution.
//!
//! [`execute`] sends a parsed [`CurlRequest`] through a [`Transport`] and
//! folds every outcome into an [`ExecutionResult`]: a response with any
//! status code is a success, anything that prevented a response is a
//! failure. Nothing is retried.

pub mod encoding;
pub mod response;
pub mod transport;
pub mod types;

pub use response::normalize_response;
pub use transport::{ReqwestTransport, Transport, TransportFuture};
pub use types::*;

use crate::error::{ParseError, TransportError};
use crate::parser::{parse_curl_command, CurlRequest};
use std::sync::Arc;

/// Executes `request` through `transport`.
pub async fn execute(request: &CurlRequest, transport: &dyn Transport) -> ExecutionResult {
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        proxy = ?request.proxy,
        "Executing request"
    );

    match transport.send(request).await {
        Ok(response) => {
            tracing::debug!(status = response.status, "Request completed");
            normalize_response(response)
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind(), error = %err, "Request failed");
            ExecutionResult::from(err)
        }
    }
}

/// Cloneable handle pairing a shared transport with [`execute`].
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
}

impl Executor {
    /// Creates an executor backed by a [`ReqwestTransport`].
    pub fn new(options: TransportOptions) -> Result<Self, TransportError> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new(options)?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn execute(&self, request: &CurlRequest) -> ExecutionResult {
        execute(request, self.transport.as_ref()).await
    }

    /// Parses `command` and executes it. A command that does not parse is
    /// never sent.
    pub async fn run(&self, command: &str) -> Result<ExecutionResult, ParseError> {
        let request = parse_curl_command(command)?;
        Ok(self.execute(&request).await)
    }
}
