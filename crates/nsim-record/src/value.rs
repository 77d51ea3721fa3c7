//! Scalar and list values carried by estimator options and swept params.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar as it appears in an estimator option or a sweep list.
///
/// Integers and floats are kept apart so that `15` and `15.0` survive a
/// read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON number without a fractional part or exponent.
    Integer(i64),
    /// Any other JSON number.
    Float(f64),
    /// JSON string.
    Text(String),
}

impl ParamValue {
    /// Returns the numeric value, widening integers to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(value) => Some(*value as f64),
            ParamValue::Float(value) => Some(*value),
            ParamValue::Bool(_) | ParamValue::Text(_) => None,
        }
    }

    /// Returns the integer value, if the scalar was written as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// True for non-finite floats; integers, strings and booleans are always finite.
    pub fn is_non_finite(&self) -> bool {
        matches!(self, ParamValue::Float(value) if !value.is_finite())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Integer(value) => write!(f, "{value}"),
            // `{:?}` keeps the decimal point on whole floats (`0.0`, not `0`).
            ParamValue::Float(value) => write!(f, "{value:?}"),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Estimator option: either a scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Single scalar, e.g. `"split_by": "stateq"`.
    Scalar(ParamValue),
    /// List of scalars, e.g. `"n_neighbors": [0.5]`.
    List(Vec<ParamValue>),
}

impl OptionValue {
    /// Views the option as a slice regardless of its shape.
    pub fn as_slice(&self) -> &[ParamValue] {
        match self {
            OptionValue::Scalar(value) => std::slice::from_ref(value),
            OptionValue::List(values) => values,
        }
    }

    /// Returns the scalar, if the option is not a list.
    pub fn as_scalar(&self) -> Option<&ParamValue> {
        match self {
            OptionValue::Scalar(value) => Some(value),
            OptionValue::List(_) => None,
        }
    }
}

impl From<ParamValue> for OptionValue {
    fn from(value: ParamValue) -> Self {
        OptionValue::Scalar(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Scalar(ParamValue::Float(value))
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Scalar(ParamValue::Integer(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Scalar(ParamValue::from(value))
    }
}

impl From<Vec<ParamValue>> for OptionValue {
    fn from(values: Vec<ParamValue>) -> Self {
        OptionValue::List(values)
    }
}
