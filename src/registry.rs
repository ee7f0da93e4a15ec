//! Versioned metric implementations.
//!
//! Each metric name maps to one or more [`VersionedFormula`]s plus a
//! default version. Registration is append-only: a `(metric, version)`
//! pair can never be replaced, so a historical report can always be
//! recomputed under the formula that produced it. Fixes ship as a new
//! version, which becomes the default.

use crate::classification::Classifier;
use crate::core::Payload;
use crate::errors::MetricError;
use crate::scoring::Scored;
use crate::validation::MetricSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of one formula revision, e.g. `v2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pure scoring function over a validated payload.
pub type Formula = Arc<dyn Fn(&Payload) -> Result<Scored, MetricError> + Send + Sync>;

/// One immutable revision of a metric: accepted shape, formula and
/// classifier.
#[derive(Clone)]
pub struct VersionedFormula {
    version: VersionId,
    spec: MetricSpec,
    formula: Formula,
    classifier: Classifier,
}

impl VersionedFormula {
    pub fn new<F>(
        version: impl Into<VersionId>,
        spec: MetricSpec,
        formula: F,
        classifier: Classifier,
    ) -> Self
    where
        F: Fn(&Payload) -> Result<Scored, MetricError> + Send + Sync + 'static,
    {
        Self {
            version: version.into(),
            spec,
            formula: Arc::new(formula),
            classifier,
        }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn spec(&self) -> &MetricSpec {
        &self.spec
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn score(&self, payload: &Payload) -> Result<Scored, MetricError> {
        (self.formula)(payload)
    }
}

impl fmt::Debug for VersionedFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedFormula")
            .field("version", &self.version)
            .field("spec", &self.spec)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct MetricVersions {
    versions: BTreeMap<VersionId, Arc<VersionedFormula>>,
    default: VersionId,
}

#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
    metrics: BTreeMap<String, MetricVersions>,
}

impl VersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version; it becomes the metric's default.
    pub fn register(
        &mut self,
        metric: impl Into<String>,
        formula: VersionedFormula,
    ) -> Result<(), MetricError> {
        let metric = metric.into();
        let version = formula.version().clone();
        match self.metrics.get_mut(&metric) {
            Some(entry) => {
                if entry.versions.contains_key(&version) {
                    return Err(MetricError::DuplicateVersion {
                        metric,
                        version: version.to_string(),
                    });
                }
                entry.versions.insert(version.clone(), Arc::new(formula));
                entry.default = version;
            }
            None => {
                let versions = BTreeMap::from([(version.clone(), Arc::new(formula))]);
                self.metrics.insert(
                    metric,
                    MetricVersions {
                        versions,
                        default: version,
                    },
                );
            }
        }
        Ok(())
    }

    /// Look up a version, or the default when `version` is `None`.
    pub fn resolve(
        &self,
        metric: &str,
        version: Option<&str>,
    ) -> Result<Arc<VersionedFormula>, MetricError> {
        let entry = self
            .metrics
            .get(metric)
            .ok_or_else(|| MetricError::UnknownMetric(metric.to_string()))?;
        let wanted = version.map_or_else(|| entry.default.clone(), VersionId::from);
        entry
            .versions
            .get(&wanted)
            .cloned()
            .ok_or_else(|| MetricError::UnknownVersion {
                metric: metric.to_string(),
                version: wanted.to_string(),
            })
    }

    /// Point the default at an already registered version.
    pub fn set_default(&mut self, metric: &str, version: &str) -> Result<(), MetricError> {
        let entry = self
            .metrics
            .get_mut(metric)
            .ok_or_else(|| MetricError::UnknownMetric(metric.to_string()))?;
        let version = VersionId::from(version);
        if !entry.versions.contains_key(&version) {
            return Err(MetricError::UnknownVersion {
                metric: metric.to_string(),
                version: version.to_string(),
            });
        }
        entry.default = version;
        Ok(())
    }

    pub fn default_version(&self, metric: &str) -> Option<&VersionId> {
        self.metrics.get(metric).map(|entry| &entry.default)
    }

    pub fn versions(&self, metric: &str) -> Vec<&VersionId> {
        self.metrics
            .get(metric)
            .map(|entry| entry.versions.keys().collect())
            .unwrap_or_default()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{CutPoint, CutPointTable, LabelSet};
    use crate::core::{Coercion, Threshold};
    use crate::validation::Shape;
    use serde_json::json;

    fn constant(version: &str, score: f64) -> VersionedFormula {
        let table = CutPointTable::three_bucket(
            CutPoint::at_least(0.8, Threshold::Positive),
            CutPoint::at_least(0.6, Threshold::Neutral),
            LabelSet::three("High", "Avg", "Low"),
        )
        .unwrap();
        VersionedFormula::new(
            version,
            MetricSpec::new(Shape::Samples, Coercion::Lexical, json!([1])),
            move |_| Ok(Scored::scalar(score)),
            Classifier::CutPoints(table),
        )
    }

    #[test]
    fn latest_registration_becomes_default() {
        let mut registry = VersionRegistry::new();
        registry.register("demo", constant("v1", 0.1)).unwrap();
        registry.register("demo", constant("v2", 0.9)).unwrap();
        assert_eq!(registry.default_version("demo").unwrap().as_str(), "v2");
        assert_eq!(
            registry.resolve("demo", None).unwrap().version().as_str(),
            "v2"
        );
        let v1 = registry.resolve("demo", Some("v1")).unwrap();
        assert_eq!(v1.version().as_str(), "v1");
        assert_eq!(registry.versions("demo").len(), 2);
    }

    #[test]
    fn registration_is_append_only() {
        let mut registry = VersionRegistry::new();
        registry.register("demo", constant("v1", 0.1)).unwrap();
        let err = registry.register("demo", constant("v1", 0.9)).unwrap_err();
        assert!(matches!(err, MetricError::DuplicateVersion { .. }));

        let payload = Payload::Values(vec![1.0]);
        let kept = registry.resolve("demo", Some("v1")).unwrap();
        assert_eq!(kept.score(&payload).unwrap(), Scored::scalar(0.1));
    }

    #[test]
    fn unknown_lookups_are_programmer_errors() {
        let mut registry = VersionRegistry::new();
        registry.register("demo", constant("v1", 0.1)).unwrap();
        let err = registry.resolve("other", None).unwrap_err();
        assert!(err.is_programmer_error());
        assert!(matches!(
            registry.resolve("demo", Some("v7")).unwrap_err(),
            MetricError::UnknownVersion { .. }
        ));
        assert!(registry.set_default("demo", "v7").is_err());
    }

    #[test]
    fn set_default_pins_historical_version() {
        let mut registry = VersionRegistry::new();
        registry.register("demo", constant("v1", 0.1)).unwrap();
        registry.register("demo", constant("v2", 0.9)).unwrap();
        registry.set_default("demo", "v1").unwrap();
        assert_eq!(
            registry.resolve("demo", None).unwrap().version().as_str(),
            "v1"
        );
    }
}
