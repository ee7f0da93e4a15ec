//! The synchronous call contract: validate, parse, breakdown and rank.
//!
//! ```rust
//! use serde_json::json;
//! use ux_metrics::{Engine, ParseArgs};
//!
//! let engine = Engine::new()?;
//! let result = engine.parse(
//!     "completion",
//!     &json!({"direct_success": 0.5, "indirect_success": 0.3}),
//!     &ParseArgs::default(),
//! )?;
//! assert_eq!(result.label(), "Successful");
//! # Ok::<(), ux_metrics::MetricError>(())
//! ```

use crate::classification::Classifier;
use crate::config::EngineConfig;
use crate::core::{Breakdown, MetricResult};
use crate::errors::MetricError;
use crate::metrics::builtin_registry;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{RankedQuestion, Scored};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

/// Metric-specific arguments to [`Engine::parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseArgs {
    /// Question whose rank is reported; required by rank-classified metrics.
    pub selected_index: Option<usize>,
}

impl ParseArgs {
    pub fn selected(index: usize) -> Self {
        Self {
            selected_index: Some(index),
        }
    }
}

/// Scores survey payloads against a registry of versioned metrics.
///
/// Every call is independent: nothing is cached between calls and the
/// caller's payload is never mutated.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: VersionRegistry,
}

impl Engine {
    /// Engine over the built-in catalog with each metric's latest version
    /// as default.
    pub fn new() -> Result<Self, MetricError> {
        Ok(Self::from_registry(builtin_registry()?))
    }

    /// Built-in catalog with defaults pinned by `config`. Pins naming an
    /// unknown metric or version are logged and skipped.
    pub fn with_config(config: &EngineConfig) -> Result<Self, MetricError> {
        let mut registry = builtin_registry()?;
        for (metric, version) in &config.versions {
            if let Err(err) = registry.set_default(metric, version) {
                warn!(code = %err.code(), "Ignoring version pin {metric} = {version}: {err}");
            } else {
                debug!("Pinned {metric} to {version}");
            }
        }
        Ok(Self::from_registry(registry))
    }

    pub fn from_registry(registry: VersionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Pre-flight check. Unknown metrics are reported as invalid.
    pub fn validate(&self, metric: &str, payload: &Value) -> bool {
        self.check(metric, payload).is_ok()
    }

    /// Like [`Engine::validate`], returning the reason for rejection.
    pub fn check(&self, metric: &str, payload: &Value) -> Result<(), MetricError> {
        let formula = self.registry.resolve(metric, None)?;
        formula.spec().extract(metric, payload)?;
        Ok(())
    }

    /// Validate, score and classify under the default version.
    pub fn parse(
        &self,
        metric: &str,
        payload: &Value,
        args: &ParseArgs,
    ) -> Result<MetricResult, MetricError> {
        self.evaluate(metric, None, payload, args)
    }

    /// Validate, score and classify under an explicit version.
    pub fn parse_version(
        &self,
        metric: &str,
        version: &str,
        payload: &Value,
        args: &ParseArgs,
    ) -> Result<MetricResult, MetricError> {
        self.evaluate(metric, Some(version), payload, args)
    }

    /// Named sub-scores of a composite metric; empty for metrics without
    /// components.
    pub fn breakdown(&self, metric: &str, payload: &Value) -> Result<Breakdown, MetricError> {
        let formula = self.registry.resolve(metric, None)?;
        score(metric, &formula, payload).map(|scored| scored.breakdown())
    }

    /// Every question of a rank-classified batch, in ascending score order.
    pub fn rank(&self, metric: &str, payload: &Value) -> Result<Vec<RankedQuestion>, MetricError> {
        self.rank_questions(metric, None, payload)
    }

    pub fn rank_version(
        &self,
        metric: &str,
        version: &str,
        payload: &Value,
    ) -> Result<Vec<RankedQuestion>, MetricError> {
        self.rank_questions(metric, Some(version), payload)
    }

    fn rank_questions(
        &self,
        metric: &str,
        version: Option<&str>,
        payload: &Value,
    ) -> Result<Vec<RankedQuestion>, MetricError> {
        let formula = self.registry.resolve(metric, version)?;
        let Classifier::Rank(ranker) = formula.classifier() else {
            return Err(MetricError::NotRanked(metric.to_string()));
        };
        match score(metric, &formula, payload)? {
            Scored::Batch(scores) => Ok(ranker.rank(&scores, None)),
            other => Err(MetricError::payload_mismatch(
                "a batch of scores",
                other.kind(),
            )),
        }
    }

    fn evaluate(
        &self,
        metric: &str,
        version: Option<&str>,
        payload: &Value,
        args: &ParseArgs,
    ) -> Result<MetricResult, MetricError> {
        let formula = self.registry.resolve(metric, version)?;
        let span = debug_span!("parse_metric", metric, version = %formula.version());
        let _enter = span.enter();

        let scored = score(metric, &formula, payload)?;
        let result = formula.classifier().classify(metric, &scored, args)?;
        debug!(
            result = result.result(),
            threshold = result.threshold_name(),
            label = result.label(),
            "Classified"
        );
        Ok(result)
    }
}

fn score(
    metric: &str,
    formula: &Arc<VersionedFormula>,
    payload: &Value,
) -> Result<Scored, MetricError> {
    let typed = formula.spec().extract(metric, payload).map_err(|err| {
        let err = MetricError::from(err);
        debug!(code = %err.code(), "Rejected payload: {err}");
        err
    })?;
    formula.score(&typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> Engine {
        Engine::new().unwrap()
    }

    #[test]
    fn validate_is_false_for_unknown_metric() {
        assert!(!engine().validate("nps", &json!([])));
        assert!(matches!(
            engine().check("nps", &json!([])),
            Err(MetricError::UnknownMetric(_))
        ));
    }

    #[test]
    fn parse_never_returns_partial_result_on_invalid_input() {
        let payload = json!({"direct_success": "0.5"});
        let err = engine()
            .parse("completion", &payload, &ParseArgs::default())
            .unwrap_err();
        assert!(err.is_user_fixable());
    }

    #[test]
    fn breakdown_is_empty_for_plain_metrics() {
        let payload = json!({"primary": 0.5, "secondary": 0.3, "tertiary": 0.2});
        let breakdown = engine().breakdown("intent", &payload).unwrap();
        assert!(breakdown.is_empty());
    }

    #[test]
    fn rank_rejects_metrics_classified_by_cut_points() {
        let payload = json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let err = engine().rank("loyalty", &payload).unwrap_err();
        assert_eq!(err, MetricError::NotRanked("loyalty".to_string()));
    }

    #[test]
    fn pinned_config_changes_default_version() {
        let config = EngineConfig::default()
            .pin("desirability", "v1")
            .pin("desirability_typo", "v1");
        let engine = Engine::with_config(&config).unwrap();
        let registry = engine.registry();
        assert_eq!(
            registry.default_version("desirability").unwrap().as_str(),
            "v1"
        );
        let batch = json!([[0.5, 0.5, 0, 0, 0, 0, 0, 0, 0, 0]]);
        let ranked = engine.rank("desirability", &batch).unwrap();
        assert_eq!(ranked[0].fraction.to_string(), "5/5");
    }

    #[test]
    fn explicit_version_overrides_pin() {
        let config = EngineConfig::default().pin("usefulness", "v1");
        let engine = Engine::with_config(&config).unwrap();
        let question = json!([{
            "strongly_disagree": 1,
            "disagree": 1,
            "neutral": 1,
            "agree": 1,
            "strongly_agree": 1
        }]);
        let pinned = engine
            .parse("usefulness", &question, &ParseArgs::default())
            .unwrap();
        let latest = engine
            .parse_version("usefulness", "v2", &question, &ParseArgs::default())
            .unwrap();
        // Same score, but v1 compares a 0-100 score against fractional bounds.
        assert_eq!(pinned.result(), latest.result());
        assert_eq!(pinned.label(), "High");
        assert_eq!(latest.label(), "Low");
    }
}
