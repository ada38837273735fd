use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Request body parameters. JSON bodies keep their value types, form bodies
/// produce string values.
pub type Parameters = BTreeMap<String, Value>;

/// Standard HTTP verbs accepted by `-X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether parameters for this method travel in the query string
    /// instead of the request body.
    pub fn encodes_parameters_in_url(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "CONNECT" => Ok(HttpMethod::Connect),
            "OPTIONS" => Ok(HttpMethod::Options),
            "TRACE" => Ok(HttpMethod::Trace),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Structured request extracted from a curl command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurlRequest {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub parameters: Parameters,
    /// Pairs taken from a `Cookie` request header. `None` rather than empty
    /// when nothing was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl CurlRequest {
    /// Creates a GET request for `url` with nothing else set.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::default(),
            headers: HashMap::new(),
            parameters: Parameters::new(),
            cookies: None,
            proxy: None,
        }
    }

    /// Looks up a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What went wrong with a segment that was skipped or partly ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownDirective,
    MissingQuotedValue,
    MalformedHeader,
    MalformedCookie,
    MalformedFormPair,
    UnknownMethod,
    EmptyValue,
}

/// A non-fatal note produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Zero-based index of the directive segment.
    pub segment: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}: {}", self.segment, self.message)
    }
}

/// Result of a best-effort parse: the request if a URL was found, plus
/// everything that was skipped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub request: Option<CurlRequest>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn into_result(self) -> Result<CurlRequest, ParseError> {
        self.request.ok_or(ParseError::MissingUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str_is_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&HttpMethod::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut request = CurlRequest::new("https://example.com");
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("accept"), None);
    }

    #[test]
    fn test_absent_cookies_are_not_serialized() {
        let json = serde_json::to_value(CurlRequest::new("https://example.com")).unwrap();
        assert!(json.get("cookies").is_none());
        assert!(json.get("proxy").is_none());
        assert_eq!(json["method"], "GET");
    }
}
