//! Canonical and human-facing JSON encodings.

use std::collections::BTreeMap;
use std::iter::FromIterator;

use ::serde::de::DeserializeOwned;
use ::serde::Serialize;
use nsim_core::errors::{ErrorInfo, NsimError};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> NsimError {
    NsimError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut ordered = BTreeMap::new();
            for (key, val) in map {
                ordered.insert(key, canonicalize(val));
            }
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => {
            let canonical_values = values.into_iter().map(canonicalize).collect();
            Value::Array(canonical_values)
        }
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, NsimError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Serializes a value as JSON indented by four spaces, the layout of `log.txt`.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, NsimError> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|err| serde_error("json-encode", err))?;
    String::from_utf8(bytes).map_err(|err| serde_error("json-utf8", err))
}

/// Restores a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, NsimError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-read", err))
}
