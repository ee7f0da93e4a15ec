use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named sub-scores of a composite metric, keyed by component name.
pub type Breakdown = BTreeMap<String, f64>;

/// Ordered classification bucket.
///
/// Variants are declared from highest to lowest so the derived `Ord`
/// sorts "better" categories first; use [`Threshold::rank`] when a
/// numeric comparison reads more naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Threshold {
    #[serde(rename = "very positive")]
    VeryPositive,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "very negative")]
    VeryNegative,
}

impl Threshold {
    /// Category name as presented to dashboards.
    pub fn as_str(&self) -> &'static str {
        match self {
            Threshold::VeryPositive => "very positive",
            Threshold::Positive => "positive",
            Threshold::Neutral => "neutral",
            Threshold::Negative => "negative",
            Threshold::VeryNegative => "very negative",
        }
    }

    /// Position on the 5-step scale, 4 for very positive down to 0.
    pub fn rank(&self) -> u8 {
        match self {
            Threshold::VeryPositive => 4,
            Threshold::Positive => 3,
            Threshold::Neutral => 2,
            Threshold::Negative => 1,
            Threshold::VeryNegative => 0,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform outcome of every metric: the scalar score, its category and
/// the metric-specific label shown for that category.
///
/// Fields are private; a result is built once by the engine and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricResult {
    result: f64,
    threshold: Option<Threshold>,
    label: String,
}

impl MetricResult {
    pub fn new(result: f64, threshold: Threshold, label: impl Into<String>) -> Self {
        Self {
            result,
            threshold: Some(threshold),
            label: label.into(),
        }
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    /// Category, `None` only for the zero value.
    pub fn threshold(&self) -> Option<Threshold> {
        self.threshold
    }

    /// Category name, empty for the zero value.
    pub fn threshold_name(&self) -> &'static str {
        self.threshold.map_or("", |threshold| threshold.as_str())
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
