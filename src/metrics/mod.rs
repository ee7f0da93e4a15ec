//! Built-in metric catalog.
//!
//! Each submodule registers the versions of a family of metrics into a
//! [`VersionRegistry`]. Versions are registered oldest first so the
//! newest becomes the default.

mod brand_score;
mod choice_metrics;
mod desirability;
mod distribution;
mod questionnaire;
mod task;

use crate::classification::{Classifier, CutPoint, CutPointTable, LabelSet};
use crate::core::Threshold;
use crate::errors::MetricError;
use crate::registry::VersionRegistry;
use serde_json::{Map, Value};

/// Registry holding every built-in metric.
pub fn builtin_registry() -> Result<VersionRegistry, MetricError> {
    let mut registry = VersionRegistry::new();
    choice_metrics::register(&mut registry)?;
    questionnaire::register(&mut registry)?;
    distribution::register(&mut registry)?;
    task::register(&mut registry)?;
    brand_score::register(&mut registry)?;
    desirability::register(&mut registry)?;
    Ok(registry)
}

/// Canonical example of a choices map: every key at `value`.
pub(crate) fn example_choices(keys: &[&str], value: f64) -> Value {
    let map: Map<String, Value> = keys
        .iter()
        .map(|key| (key.to_string(), Value::from(value)))
        .collect();
    Value::Object(map)
}

/// Positive/neutral/negative table wrapped as a classifier.
pub(crate) fn three_bucket(
    positive: CutPoint,
    neutral: CutPoint,
    labels: LabelSet,
) -> Result<Classifier, MetricError> {
    CutPointTable::three_bucket(positive, neutral, labels).map(Classifier::CutPoints)
}

pub(crate) fn at_least(bound: f64, category: Threshold) -> CutPoint {
    CutPoint::at_least(bound, category)
}

pub(crate) fn above(bound: f64, category: Threshold) -> CutPoint {
    CutPoint::above(bound, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_of<'a>(registry: &'a VersionRegistry, metric: &str) -> &'a str {
        registry.default_version(metric).unwrap().as_str()
    }

    #[test]
    fn catalog_registers_every_metric() {
        let registry = builtin_registry().unwrap();
        let metrics: Vec<&str> = registry.metrics().collect();
        assert_eq!(
            metrics,
            vec![
                "appeal",
                "brand_score",
                "completion",
                "comprehension",
                "desirability",
                "effort",
                "engagement",
                "expectations",
                "feeling",
                "frequency",
                "intent",
                "loyalty",
                "post_task_satisfaction",
                "satisfaction",
                "sentiment",
                "success",
                "usability",
                "usefulness",
            ]
        );
    }

    #[test]
    fn newest_versions_are_default() {
        let registry = builtin_registry().unwrap();
        assert_eq!(default_of(&registry, "desirability"), "v2");
        assert_eq!(default_of(&registry, "usefulness"), "v2");
        assert_eq!(default_of(&registry, "sentiment"), "v1");
    }

    #[test]
    fn every_canonical_example_validates() {
        let registry = builtin_registry().unwrap();
        for metric in registry.metrics() {
            for version in registry.versions(metric) {
                let formula = registry.resolve(metric, Some(version.as_str())).unwrap();
                assert!(
                    formula.spec().accepts(formula.spec().example()),
                    "{metric} {version} rejects its own example"
                );
            }
        }
    }
}
