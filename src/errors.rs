//! Crate-wide error type.
//!
//! Every fallible operation returns [`MetricError`]. Variants fall into
//! two classes:
//!
//! - **User-fixable**: an invalid survey payload or a broken configuration
//!   file. These carry enough context to correct the input.
//! - **Programmer errors**: an out-of-range `selected_index`, an
//!   unregistered metric or version, a malformed cut-point table. A
//!   well-formed caller never sees them.
//!
//! # Error Codes
//!
//! - E020-E029: Configuration errors
//! - E050-E059: Payload validation errors
//! - E060-E069: Programmer errors
//!
//! ```rust
//! use ux_metrics::{ErrorCode, MetricError};
//!
//! let err = MetricError::UnknownMetric("nps".into());
//! assert_eq!(err.code(), ErrorCode::UNKNOWN_METRIC);
//! assert!(err.is_programmer_error());
//! ```

use crate::validation::{ValidationError, ValidationErrorKind};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Config error - invalid value or syntax
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - file could not be read
    pub const CONFIG_UNREADABLE: ErrorCode = ErrorCode("E022");

    /// Validation error - wrong container type or length
    pub const VALIDATION_SHAPE: ErrorCode = ErrorCode("E050");
    /// Validation error - required field absent
    pub const VALIDATION_MISSING_FIELD: ErrorCode = ErrorCode("E051");
    /// Validation error - value is not numeric
    pub const VALIDATION_NON_NUMERIC: ErrorCode = ErrorCode("E052");

    pub const SELECTED_INDEX_OUT_OF_RANGE: ErrorCode = ErrorCode("E060");
    pub const MISSING_ARGUMENT: ErrorCode = ErrorCode("E061");
    pub const UNKNOWN_METRIC: ErrorCode = ErrorCode("E062");
    pub const UNKNOWN_VERSION: ErrorCode = ErrorCode("E063");
    pub const DUPLICATE_VERSION: ErrorCode = ErrorCode("E064");
    pub const INVALID_CUT_POINTS: ErrorCode = ErrorCode("E065");
    pub const PAYLOAD_MISMATCH: ErrorCode = ErrorCode("E066");
    pub const MISSING_COMPONENT: ErrorCode = ErrorCode("E067");
    pub const NOT_RANKED: ErrorCode = ErrorCode("E068");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// The payload does not match the metric's declared shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("selected index {index} is out of range for a batch of {len} questions")]
    SelectedIndexOutOfRange { index: usize, len: usize },

    #[error("metric '{metric}' requires the '{argument}' argument")]
    MissingArgument {
        metric: String,
        argument: &'static str,
    },

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("metric '{metric}' has no version '{version}'")]
    UnknownVersion { metric: String, version: String },

    #[error("metric '{metric}' already has a version '{version}'")]
    DuplicateVersion { metric: String, version: String },

    #[error("invalid cut-point table: {0}")]
    InvalidCutPoints(String),

    /// A formula or classifier received data of the wrong kind.
    #[error("expected {expected}, found {found}")]
    PayloadMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("score component '{0}' was not produced by the formula")]
    MissingComponent(String),

    #[error("metric '{0}' is not rank-classified")]
    NotRanked(String),

    #[error("configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
    },
}

impl MetricError {
    pub fn payload_mismatch(expected: &'static str, found: &'static str) -> Self {
        MetricError::PayloadMismatch { expected, found }
    }

    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        MetricError::Config {
            code: ErrorCode::CONFIG_INVALID,
            message: message.into(),
            path,
        }
    }

    pub fn config_unreadable(message: impl Into<String>, path: PathBuf) -> Self {
        MetricError::Config {
            code: ErrorCode::CONFIG_UNREADABLE,
            message: message.into(),
            path: Some(path),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            MetricError::Validation(err) => match err.kind {
                ValidationErrorKind::Shape { .. } => ErrorCode::VALIDATION_SHAPE,
                ValidationErrorKind::MissingField { .. } => ErrorCode::VALIDATION_MISSING_FIELD,
                ValidationErrorKind::NonNumericValue { .. } => ErrorCode::VALIDATION_NON_NUMERIC,
            },
            MetricError::SelectedIndexOutOfRange { .. } => ErrorCode::SELECTED_INDEX_OUT_OF_RANGE,
            MetricError::MissingArgument { .. } => ErrorCode::MISSING_ARGUMENT,
            MetricError::UnknownMetric(_) => ErrorCode::UNKNOWN_METRIC,
            MetricError::UnknownVersion { .. } => ErrorCode::UNKNOWN_VERSION,
            MetricError::DuplicateVersion { .. } => ErrorCode::DUPLICATE_VERSION,
            MetricError::InvalidCutPoints(_) => ErrorCode::INVALID_CUT_POINTS,
            MetricError::PayloadMismatch { .. } => ErrorCode::PAYLOAD_MISMATCH,
            MetricError::MissingComponent(_) => ErrorCode::MISSING_COMPONENT,
            MetricError::NotRanked(_) => ErrorCode::NOT_RANKED,
            MetricError::Config { code, .. } => *code,
        }
    }

    /// Misuse of the engine API rather than bad input data.
    pub fn is_programmer_error(&self) -> bool {
        !self.is_user_fixable()
    }

    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            MetricError::Validation(_) | MetricError::Config { .. }
        )
    }
}
