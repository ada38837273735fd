//! Form encoding of request parameters.
//!
//! Parameters are always sent form-encoded, whatever shape the
//! `--data-raw` body had in the command. GET, HEAD and DELETE carry them in the query
//! string; every other method carries them in the body.

use crate::parser::{HttpMethod, Parameters};
use serde_json::Value;
use url::{form_urlencoded, Url};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// URL and body after parameters have been placed.
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedRequest {
    pub url: Url,
    pub body: Option<String>,
    /// Content type to add when the caller did not set one.
    pub content_type: Option<&'static str>,
}

/// Places `parameters` into the query or body depending on `method`.
///
/// `has_content_type` suppresses the default form content type so an
/// explicit `Content-Type` header is sent unchanged.
pub fn encode_parameters(
    method: HttpMethod,
    mut url: Url,
    parameters: &Parameters,
    has_content_type: bool,
) -> EncodedRequest {
    if parameters.is_empty() {
        return EncodedRequest {
            url,
            body: None,
            content_type: None,
        };
    }

    let pairs = form_pairs(parameters);
    if method.encodes_parameters_in_url() {
        url.query_pairs_mut().extend_pairs(pairs);
        EncodedRequest {
            url,
            body: None,
            content_type: None,
        }
    } else {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        EncodedRequest {
            url,
            body: Some(body),
            content_type: (!has_content_type).then_some(FORM_CONTENT_TYPE),
        }
    }
}

/// Flattens parameters into form pairs with keys in ascending order.
///
/// Nested objects become `key[sub]`, arrays `key[]`, booleans `1`/`0` and
/// nulls an empty value.
pub fn form_pairs(parameters: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in parameters {
        push_components(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_components(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (nested, v) in entries {
                push_components(format!("{}[{}]", key, nested), v, pairs);
            }
        }
        Value::Array(items) => {
            for item in items {
                push_components(format!("{}[]", key), item, pairs);
            }
        }
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Null => pairs.push((key, String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_flattening() {
        let pairs = form_pairs(&params(json!({
            "b": true,
            "a": {"y": 2, "x": "s"},
            "c": [1, "two"],
            "d": null,
        })));
        let expected: Vec<(String, String)> = [
            ("a[x]", "s"),
            ("a[y]", "2"),
            ("b", "1"),
            ("c[]", "1"),
            ("c[]", "two"),
            ("d", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_get_appends_to_query() {
        let url = Url::parse("http://example.com/search?q=1").unwrap();
        let encoded = encode_parameters(
            HttpMethod::Get,
            url,
            &params(json!({"page": 2, "tag": "a b"})),
            false,
        );
        assert_eq!(encoded.url.as_str(), "http://example.com/search?q=1&page=2&tag=a+b");
        assert_eq!(encoded.body, None);
        assert_eq!(encoded.content_type, None);
    }

    #[test]
    fn test_post_uses_form_body() {
        let url = Url::parse("http://example.com/submit").unwrap();
        let encoded =
            encode_parameters(HttpMethod::Post, url, &params(json!({"x": 1, "y": "s&t"})), false);
        assert_eq!(encoded.url.as_str(), "http://example.com/submit");
        assert_eq!(encoded.body.as_deref(), Some("x=1&y=s%26t"));
        assert_eq!(encoded.content_type, Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_explicit_content_type_is_respected() {
        let url = Url::parse("http://example.com/submit").unwrap();
        let encoded = encode_parameters(HttpMethod::Put, url, &params(json!({"x": 1})), true);
        assert_eq!(encoded.body.as_deref(), Some("x=1"));
        assert_eq!(encoded.content_type, None);
    }

    #[test]
    fn test_no_parameters_leaves_request_untouched() {
        let url = Url::parse("http://example.com/a?b=c").unwrap();
        let encoded = encode_parameters(HttpMethod::Post, url.clone(), &Parameters::new(), false);
        assert_eq!(
            encoded,
            EncodedRequest {
                url,
                body: None,
                content_type: None,
            }
        );
    }
}
