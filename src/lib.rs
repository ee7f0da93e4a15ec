//! Scoring and classification of UX survey metrics.
//!
//! A caller hands the [`Engine`] a metric name and the aggregated survey
//! answers for that metric as JSON. The engine validates the payload
//! against the metric's declared shape, computes a score with the
//! metric's formula and classifies the score into a qualitative
//! [`Threshold`] with a human label.
//!
//! Metrics are versioned. Each metric has a default version, which can be
//! pinned per project in `.ux-metrics.toml` (see [`config`]).

pub mod classification;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod registry;
pub mod scoring;
pub mod validation;

pub use crate::classification::{Classifier, Comparison, CutPoint, CutPointTable, LabelSet};
pub use crate::config::{load_config, load_config_from, EngineConfig};
pub use crate::core::{
    Breakdown, Choices, ClickData, Coercion, EngagementCounts, MetricResult, Payload,
    SelectionOption, Threshold,
};
pub use crate::engine::{Engine, ParseArgs};
pub use crate::errors::{ErrorCode, MetricError};
pub use crate::metrics::builtin_registry;
pub use crate::registry::{VersionId, VersionRegistry, VersionedFormula};
pub use crate::scoring::{RankClassifier, RankDenominator, RankFraction, RankedQuestion, Scored};
pub use crate::validation::{FieldPath, MetricSpec, Shape, ValidationError, ValidationErrorKind};
