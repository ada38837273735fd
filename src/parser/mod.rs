//! Translation of copied `curl` commands into [`CurlRequest`] values.
//!
//! The parser is lenient: it walks the command one directive segment at a
//! time, keeps whatever it recognises and records a [`Diagnostic`] for the
//! rest. The only hard failure is a command without a quoted URL.

pub mod body;
pub mod segments;
pub mod types;

pub use types::*;

use crate::error::ParseError;
use body::merge_body;
use segments::{first_quoted, split_directives, split_pair, unquote};
use std::collections::HashMap;

/// Parses `raw` into a request, failing only when no URL is present.
pub fn parse_curl_command(raw: &str) -> Result<CurlRequest, ParseError> {
    parse_with_diagnostics(raw).into_result()
}

/// Parses `raw` and keeps the notes about every skipped or malformed segment.
pub fn parse_with_diagnostics(raw: &str) -> ParseOutcome {
    let segments = split_directives(raw);
    tracing::debug!(segments = segments.len(), "Parsing curl command");

    let mut acc = RequestAccumulator::default();
    for (index, segment) in segments.into_iter().enumerate() {
        acc.apply(index, segment);
    }
    acc.finish()
}

/// Directive state gathered while walking the segments in order.
#[derive(Default)]
struct RequestAccumulator {
    url: Option<String>,
    method: HttpMethod,
    headers: HashMap<String, String>,
    parameters: Parameters,
    cookies: HashMap<String, String>,
    proxy: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl RequestAccumulator {
    fn apply(&mut self, index: usize, segment: &str) {
        if segment.starts_with("curl ") {
            self.apply_url(index, segment);
        } else if let Some(rest) = segment.strip_prefix("-X ") {
            self.apply_method(index, rest);
        } else if segment.starts_with("-H ") {
            self.apply_header(index, segment);
        } else if segment.starts_with("--data-raw ") {
            self.apply_body(index, segment);
        } else if let Some(rest) = segment.strip_prefix("--proxy ") {
            self.apply_proxy(index, rest);
        } else {
            self.note(
                index,
                DiagnosticKind::UnknownDirective,
                format!("ignored directive `{}`", segment),
            );
        }
    }

    fn apply_url(&mut self, index: usize, segment: &str) {
        match first_quoted(segment) {
            Some(url) => self.url = Some(url.to_string()),
            None => self.note(
                index,
                DiagnosticKind::MissingQuotedValue,
                "curl directive has no quoted URL".to_string(),
            ),
        }
    }

    fn apply_method(&mut self, index: usize, rest: &str) {
        let raw = unquote(rest);
        if raw.is_empty() {
            self.note(index, DiagnosticKind::EmptyValue, "-X without a method".to_string());
            return;
        }
        match raw.parse::<HttpMethod>() {
            Ok(method) => self.method = method,
            Err(e) => self.note(index, DiagnosticKind::UnknownMethod, e.to_string()),
        }
    }

    fn apply_header(&mut self, index: usize, segment: &str) {
        let Some(quoted) = first_quoted(segment) else {
            self.note(
                index,
                DiagnosticKind::MissingQuotedValue,
                "-H without a quoted header".to_string(),
            );
            return;
        };
        let Some((key, value)) = split_pair(quoted, ": ") else {
            self.note(
                index,
                DiagnosticKind::MalformedHeader,
                format!("header `{}` is not `Name: value`", quoted),
            );
            return;
        };

        if key.eq_ignore_ascii_case("cookie") {
            self.apply_cookies(index, value);
        }
        self.headers.insert(key.to_string(), value.to_string());
    }

    fn apply_cookies(&mut self, index: usize, value: &str) {
        for piece in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            match split_pair(piece, "=") {
                Some((name, value)) => {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
                None => self.note(
                    index,
                    DiagnosticKind::MalformedCookie,
                    format!("cookie `{}` has no value", piece),
                ),
            }
        }
    }

    fn apply_body(&mut self, index: usize, segment: &str) {
        let Some(body) = first_quoted(segment) else {
            self.note(
                index,
                DiagnosticKind::MissingQuotedValue,
                "--data-raw without a quoted body".to_string(),
            );
            return;
        };

        let merge = merge_body(body, &mut self.parameters);
        tracing::trace!(kind = ?merge.kind, "Merged request body");
        for piece in merge.skipped {
            self.note(
                index,
                DiagnosticKind::MalformedFormPair,
                format!("form piece `{}` is not `key=value`", piece),
            );
        }
    }

    fn apply_proxy(&mut self, index: usize, rest: &str) {
        let proxy = unquote(rest);
        if proxy.is_empty() {
            self.note(index, DiagnosticKind::EmptyValue, "--proxy without a URL".to_string());
            return;
        }
        self.proxy = Some(proxy.to_string());
    }

    fn note(&mut self, segment: usize, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic {
            segment,
            kind,
            message,
        });
    }

    fn finish(self) -> ParseOutcome {
        let request = self.url.map(|url| CurlRequest {
            url,
            method: self.method,
            headers: self.headers,
            parameters: self.parameters,
            cookies: (!self.cookies.is_empty()).then_some(self.cookies),
            proxy: self.proxy,
        });

        match &request {
            Some(r) => tracing::debug!(
                method = %r.method,
                url = %r.url,
                headers = r.headers.len(),
                parameters = r.parameters.len(),
                skipped = self.diagnostics.len(),
                "Parsed curl command"
            ),
            None => tracing::debug!(skipped = self.diagnostics.len(), "No URL found in curl command"),
        }

        ParseOutcome {
            request,
            diagnostics: self.diagnostics,
        }
    }
}
