use super::FieldPath;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Wrong container type, or wrong length for a fixed-length list.
    #[error("invalid shape: {detail}")]
    Shape { detail: String },

    #[error("missing required field(s): {}", .fields.join(", "))]
    MissingField { fields: Vec<String> },

    #[error("non-numeric value {value}")]
    NonNumericValue { value: Value },
}

/// A rejected payload, with the offending data and a canonical example
/// of what the metric expects.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("invalid {metric} payload at {path}: {kind}")]
pub struct ValidationError {
    pub metric: String,
    pub kind: ValidationErrorKind,
    pub path: FieldPath,
    pub payload: Value,
    pub expected: Value,
}

impl ValidationError {
    pub fn is_missing_field(&self) -> bool {
        matches!(self.kind, ValidationErrorKind::MissingField { .. })
    }
}
