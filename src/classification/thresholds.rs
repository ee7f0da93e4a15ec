//! Cut-point tables: fixed score bounds mapped to categories and labels.

use crate::core::Threshold;
use crate::errors::MetricError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// How a score is compared against a cut point's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `score >= bound`
    AtLeast,
    /// `score > bound`
    Above,
}

impl Comparison {
    pub fn admits(&self, score: f64, bound: f64) -> bool {
        match self {
            Comparison::AtLeast => score >= bound,
            Comparison::Above => score > bound,
        }
    }
}

/// One row of a cut-point table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    pub bound: f64,
    pub comparison: Comparison,
    pub category: Threshold,
}

impl CutPoint {
    pub const fn at_least(bound: f64, category: Threshold) -> Self {
        Self {
            bound,
            comparison: Comparison::AtLeast,
            category,
        }
    }

    pub const fn above(bound: f64, category: Threshold) -> Self {
        Self {
            bound,
            comparison: Comparison::Above,
            category,
        }
    }

    pub fn admits(&self, score: f64) -> bool {
        self.comparison.admits(score, self.bound)
    }
}

/// Metric-specific display label for each category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet(BTreeMap<Threshold, String>);

impl LabelSet {
    pub fn new<'a>(labels: impl IntoIterator<Item = (Threshold, &'a str)>) -> Self {
        Self(
            labels
                .into_iter()
                .map(|(category, label)| (category, label.to_string()))
                .collect(),
        )
    }

    /// Labels for the positive, neutral and negative buckets.
    pub fn three(positive: &str, neutral: &str, negative: &str) -> Self {
        Self::new([
            (Threshold::Positive, positive),
            (Threshold::Neutral, neutral),
            (Threshold::Negative, negative),
        ])
    }

    /// Labels for all five buckets, best first.
    pub fn five(labels: [&str; 5]) -> Self {
        let [very_positive, positive, neutral, negative, very_negative] = labels;
        Self::new([
            (Threshold::VeryPositive, very_positive),
            (Threshold::Positive, positive),
            (Threshold::Neutral, neutral),
            (Threshold::Negative, negative),
            (Threshold::VeryNegative, very_negative),
        ])
    }

    /// Every category labelled with its own name.
    pub fn category_names() -> Self {
        Self::new(
            [
                Threshold::VeryPositive,
                Threshold::Positive,
                Threshold::Neutral,
                Threshold::Negative,
                Threshold::VeryNegative,
            ]
            .map(|category| (category, category.as_str())),
        )
    }

    pub fn get(&self, category: Threshold) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }
}

/// Ordered cut points evaluated from the highest bound down; the first
/// bound the score clears wins, otherwise the floor category applies.
///
/// Construction enforces strictly descending bounds and categories, which
/// makes classification monotone: a higher score never lands in a lower
/// category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutPointTable {
    points: Vec<CutPoint>,
    floor: Threshold,
    labels: LabelSet,
}

impl CutPointTable {
    pub fn new(
        points: Vec<CutPoint>,
        floor: Threshold,
        labels: LabelSet,
    ) -> Result<Self, MetricError> {
        for pair in points.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if upper.bound.partial_cmp(&lower.bound) != Some(Ordering::Greater) {
                return Err(MetricError::InvalidCutPoints(format!(
                    "bounds must be strictly descending, found {} before {}",
                    upper.bound, lower.bound
                )));
            }
            if upper.category >= lower.category {
                return Err(MetricError::InvalidCutPoints(format!(
                    "category '{}' must rank above '{}'",
                    upper.category, lower.category
                )));
            }
        }
        if let Some(last) = points.last() {
            if last.category >= floor {
                let message = format!("floor '{floor}' must rank below '{}'", last.category);
                return Err(MetricError::InvalidCutPoints(message));
            }
        }
        let unlabelled = points
            .iter()
            .map(|point| point.category)
            .chain(std::iter::once(floor))
            .find(|category| labels.get(*category).is_none());
        if let Some(category) = unlabelled {
            let message = format!("no label for category '{category}'");
            return Err(MetricError::InvalidCutPoints(message));
        }
        Ok(Self {
            points,
            floor,
            labels,
        })
    }

    /// Positive and neutral cut points over a negative floor.
    pub fn three_bucket(
        positive: CutPoint,
        neutral: CutPoint,
        labels: LabelSet,
    ) -> Result<Self, MetricError> {
        Self::new(vec![positive, neutral], Threshold::Negative, labels)
    }

    /// Four cut points over a very-negative floor.
    pub fn five_bucket(
        bounds: [(f64, Comparison); 4],
        labels: LabelSet,
    ) -> Result<Self, MetricError> {
        let categories = [
            Threshold::VeryPositive,
            Threshold::Positive,
            Threshold::Neutral,
            Threshold::Negative,
        ];
        let points = bounds
            .into_iter()
            .zip(categories)
            .map(|((bound, comparison), category)| CutPoint {
                bound,
                comparison,
                category,
            })
            .collect();
        Self::new(points, Threshold::VeryNegative, labels)
    }

    pub fn category(&self, score: f64) -> Threshold {
        self.points
            .iter()
            .find(|point| point.admits(score))
            .map_or(self.floor, |point| point.category)
    }

    pub fn classify(&self, score: f64) -> (Threshold, &str) {
        let category = self.category(score);
        // Every category reachable here was checked for a label in `new`.
        (category, self.labels.get(category).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn satisfaction() -> CutPointTable {
        CutPointTable::three_bucket(
            CutPoint::above(0.8, Threshold::Positive),
            CutPoint::above(0.6, Threshold::Neutral),
            LabelSet::three("High", "Avg", "Low"),
        )
        .unwrap()
    }

    #[test]
    fn strict_bounds_exclude_equal_scores() {
        let table = satisfaction();
        assert_eq!(table.classify(0.81), (Threshold::Positive, "High"));
        assert_eq!(table.classify(0.8), (Threshold::Neutral, "Avg"));
        assert_eq!(table.classify(0.6), (Threshold::Negative, "Low"));
    }

    #[test]
    fn mixed_comparisons_in_one_table() {
        let table = CutPointTable::three_bucket(
            CutPoint::at_least(0.7, Threshold::Positive),
            CutPoint::above(0.5, Threshold::Neutral),
            LabelSet::three(
                "High Satisfaction",
                "Average Satisfaction",
                "Low Satisfaction",
            ),
        )
        .unwrap();
        assert_eq!(table.category(0.7), Threshold::Positive);
        assert_eq!(table.category(0.5), Threshold::Negative);
        assert_eq!(table.category(0.50001), Threshold::Neutral);
    }

    #[test]
    fn five_bucket_table_uses_all_categories() {
        let table = CutPointTable::five_bucket(
            [
                (0.9, Comparison::AtLeast),
                (0.7, Comparison::AtLeast),
                (0.5, Comparison::AtLeast),
                (0.3, Comparison::AtLeast),
            ],
            LabelSet::category_names(),
        )
        .unwrap();
        assert_eq!(
            table.classify(0.95),
            (Threshold::VeryPositive, "very positive")
        );
        assert_eq!(
            table.classify(0.1),
            (Threshold::VeryNegative, "very negative")
        );
        assert_eq!(table.classify(f64::NEG_INFINITY).0, Threshold::VeryNegative);
    }

    #[test]
    fn rejects_non_descending_bounds() {
        let err = CutPointTable::three_bucket(
            CutPoint::at_least(0.5, Threshold::Positive),
            CutPoint::at_least(0.5, Threshold::Neutral),
            LabelSet::three("a", "b", "c"),
        )
        .unwrap_err();
        assert!(matches!(err, MetricError::InvalidCutPoints(_)));
    }

    #[test]
    fn rejects_unordered_categories_and_missing_labels() {
        let unordered = CutPointTable::three_bucket(
            CutPoint::at_least(0.8, Threshold::Neutral),
            CutPoint::at_least(0.5, Threshold::Positive),
            LabelSet::three("a", "b", "c"),
        );
        assert!(unordered.is_err());
        let unlabelled = CutPointTable::three_bucket(
            CutPoint::at_least(0.8, Threshold::Positive),
            CutPoint::at_least(0.5, Threshold::Neutral),
            LabelSet::new([(Threshold::Positive, "a"), (Threshold::Neutral, "b")]),
        );
        assert!(unlabelled.is_err());
    }

    #[test]
    fn nan_falls_to_floor() {
        assert_eq!(satisfaction().category(f64::NAN), Threshold::Negative);
    }

    proptest! {
        /// A higher score never lands in a lower category.
        #[test]
        fn classification_is_monotone(a in -5.0f64..5.0, b in -5.0f64..5.0) {
            let table = satisfaction();
            let (high, low) = if a >= b { (a, b) } else { (b, a) };
            prop_assert!(table.category(high).rank() >= table.category(low).rank());
        }
    }
}
