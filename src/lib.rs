pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod parser;
pub mod routes;

pub use config::Config;
pub use error::{AppError, ParseError, TransportError};
pub use executor::{execute, ExecutionResult, Executor, FailureKind, Transport, TransportOptions};
pub use parser::{parse_curl_command, parse_with_diagnostics, CurlRequest, HttpMethod};
