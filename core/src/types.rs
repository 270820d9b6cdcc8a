//! Response DTOs and the scalar field value type.
//!
//! # Design
//! These mirror the remote service's JSON but are defined independently from
//! the mock-server crate; integration tests catch schema drift. Nested
//! explanation payloads are kept as opaque JSON since their shape is owned by
//! the service.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scalar form value.
///
/// Serialized untagged, so it reads and writes as a bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    /// Converts a JSON scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Flag(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_f64().map(FieldValue::Number)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value the way it is compared against allowed-values lists.
/// Integral floats print without a fractional part (`2.0` renders as `2`).
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Result of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Recommendation label, e.g. "Good Match" or "Poor Match".
    pub recommendation: String,
    /// Probability of a successful adoption, in `[0, 1]`.
    pub adoption_probability: f64,
    /// Model confidence, in `[0, 1]`.
    pub confidence_score: f64,
    pub model_version: String,
    pub timestamp: String,
    /// Green/yellow/red band summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_band_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_guidance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_info: Option<Value>,
}

impl PredictionResponse {
    /// Band name from `simplified_band_info`, when the service sent one.
    pub fn band(&self) -> Option<&str> {
        self.simplified_band_info
            .as_ref()
            .and_then(|info| info.get("band"))
            .and_then(Value::as_str)
    }
}

/// Service health, as reported by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
}
