//! `--data-raw` body interpretation.

use super::segments::split_pair;
use super::types::Parameters;
use serde_json::Value;

/// How a body was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
}

/// Outcome of merging one body into the parameter map.
#[derive(Debug)]
pub struct BodyMerge<'a> {
    pub kind: BodyKind,
    /// Form pieces that had no usable `key=value` shape.
    pub skipped: Vec<&'a str>,
}

/// Merges `body` into `parameters`.
///
/// A body whose top level is a JSON object contributes its entries with
/// their JSON types. Anything else, including JSON arrays and scalars, is
/// read as `key=value` pairs joined by `&`.
pub fn merge_body<'a>(body: &'a str, parameters: &mut Parameters) -> BodyMerge<'a> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
        parameters.extend(object);
        return BodyMerge {
            kind: BodyKind::Json,
            skipped: Vec::new(),
        };
    }

    let mut skipped = Vec::new();
    for piece in body.split('&').filter(|p| !p.is_empty()) {
        match split_pair(piece, "=") {
            Some((key, value)) => {
                parameters.insert(key.to_string(), Value::String(value.to_string()));
            }
            None => skipped.push(piece),
        }
    }

    BodyMerge {
        kind: BodyKind::Form,
        skipped,
    }
}
