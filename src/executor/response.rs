//! Normalization of raw transport responses into [`ExecutionResult`]s.

use super::types::{ExecutionResult, TransportResponse};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Builds a `Success` result from a completed exchange.
///
/// Repeated header names are joined with `", "`. The body is decoded as
/// UTF-8 and left empty when it is not valid UTF-8.
pub fn normalize_response(response: TransportResponse) -> ExecutionResult {
    let TransportResponse {
        status,
        headers: raw_headers,
        body,
    } = response;

    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in raw_headers {
        match headers.entry(name) {
            Entry::Occupied(mut existing) => {
                let joined = existing.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    let set_cookie = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
        .map(|(_, value)| value.clone())
        .unwrap_or_default();

    let body = String::from_utf8(body).unwrap_or_default();

    ExecutionResult::Success {
        status,
        headers,
        set_cookie,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_normalize_collects_headers_and_cookie() {
        let result = normalize_response(TransportResponse {
            status: 201,
            headers: vec![
                header("content-type", "application/json"),
                header("set-cookie", "a=1; Path=/"),
                header("set-cookie", "b=2"),
            ],
            body: br#"{"ok":true}"#.to_vec(),
        });

        match result {
            ExecutionResult::Success {
                status,
                headers,
                set_cookie,
                body,
            } => {
                assert_eq!(status, 201);
                assert_eq!(headers.len(), 2);
                assert_eq!(headers["content-type"], "application/json");
                assert_eq!(set_cookie, "a=1; Path=/, b=2");
                assert_eq!(body, r#"{"ok":true}"#);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_set_cookie_is_empty() {
        let result = normalize_response(TransportResponse {
            status: 204,
            headers: vec![header("Server", "test")],
            body: Vec::new(),
        });
        match result {
            ExecutionResult::Success {
                set_cookie, body, ..
            } => {
                assert!(set_cookie.is_empty());
                assert!(body.is_empty());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_body_is_empty() {
        let result = normalize_response(TransportResponse {
            status: 200,
            headers: Vec::new(),
            body: vec![0xff, 0xfe, 0x00],
        });
        assert!(result.is_success());
        assert_eq!(result.body(), "");
    }

    #[test]
    fn test_error_status_is_still_success() {
        let result = normalize_response(TransportResponse {
            status: 503,
            headers: Vec::new(),
            body: b"unavailable".to_vec(),
        });
        assert!(result.is_success());
        assert_eq!(result.body(), "unavailable");
    }
}
