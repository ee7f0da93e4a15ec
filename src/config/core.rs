use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of `.ux-metrics.toml`.
///
/// ```toml
/// [versions]
/// desirability = "v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Metric name to the version used when a call names none.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
}

impl EngineConfig {
    pub fn pin(mut self, metric: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(metric.into(), version.into());
        self
    }

    pub fn pinned_version(&self, metric: &str) -> Option<&str> {
        self.versions.get(metric).map(String::as_str)
    }

    /// Reject pins with blank names.
    pub fn validate(&self) -> Result<(), String> {
        let blank = self
            .versions
            .iter()
            .find(|(metric, version)| metric.trim().is_empty() || version.trim().is_empty());
        match blank {
            Some((metric, version)) => Err(format!(
                "version pin '{metric}' = '{version}' must name both a metric and a version"
            )),
            None => Ok(()),
        }
    }
}
