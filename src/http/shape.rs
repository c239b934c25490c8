//! Request payload shaping.
//!
//! Service calls hand the client a flat option map plus a merge mode. The
//! shaper decides where the options travel: as the query string, as the
//! JSON body, or split across both when the caller addresses the slots
//! explicitly.

use reqwest::Method;
use serde_json::{Map, Value};

/// How caller options combine into the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Options become the whole query for GET requests and the whole JSON
    /// body for any other method.
    Replace,
    /// Options are a payload-level mapping whose `query` and `json`
    /// entries land in the matching slots.
    Merge,
}

/// A shaped request payload with its slots filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPayload {
    /// Query string parameters
    pub query: Option<Map<String, Value>>,
    /// JSON request body
    pub json: Option<Value>,
}

/// Shape a flat option map into query and body slots.
pub fn shape_payload(method: &Method, mode: MergeMode, options: Map<String, Value>) -> RequestPayload {
    match mode {
        MergeMode::Replace => {
            if *method == Method::GET {
                RequestPayload {
                    query: Some(options),
                    json: None,
                }
            } else {
                RequestPayload {
                    query: None,
                    json: Some(Value::Object(options)),
                }
            }
        }
        MergeMode::Merge => {
            let mut payload = RequestPayload::default();
            for (key, value) in options {
                match (key.as_str(), value) {
                    ("query", Value::Object(map)) => payload.query = Some(map),
                    ("json", value) => payload.json = Some(value),
                    // Unknown slots are dropped rather than guessed at.
                    _ => {}
                }
            }
            payload
        }
    }
}

/// Serialize an option map into query pairs.
///
/// Null values are dropped entirely, booleans render as `1`/`0`, numbers
/// and strings as themselves. Matches the serialization the API expects
/// for flag parameters like `one_way=0`.
pub fn query_pairs(options: &Map<String, Value>) -> Vec<(String, String)> {
    options
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::Bool(true) => "1".to_string(),
                Value::Bool(false) => "0".to_string(),
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
