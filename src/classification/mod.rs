//! Turning scores into categories and labels.

pub mod thresholds;

pub use thresholds::{Comparison, CutPoint, CutPointTable, LabelSet};

use crate::core::MetricResult;
use crate::engine::ParseArgs;
use crate::errors::MetricError;
use crate::scoring::{RankClassifier, Scored};

/// How a metric version derives `(category, label)` from its score.
#[derive(Debug, Clone, PartialEq)]
pub enum Classifier {
    /// Fixed cut points over the scalar score.
    CutPoints(CutPointTable),
    /// Each named component is classified against its own table and the
    /// best category wins; the reported result stays the overall score.
    BestComponent(Vec<(&'static str, CutPointTable)>),
    /// Relative position within a batch.
    Rank(RankClassifier),
}

impl Classifier {
    pub fn classify(
        &self,
        metric: &str,
        scored: &Scored,
        args: &ParseArgs,
    ) -> Result<MetricResult, MetricError> {
        match (self, scored) {
            (Classifier::CutPoints(table), Scored::Scalar { score, .. }) => {
                let (category, label) = table.classify(*score);
                Ok(MetricResult::new(*score, category, label))
            }
            (Classifier::BestComponent(tables), Scored::Scalar { score, components }) => {
                let mut best = None;
                for (name, table) in tables {
                    let value = components
                        .get(*name)
                        .ok_or_else(|| MetricError::MissingComponent((*name).to_string()))?;
                    let (category, label) = table.classify(*value);
                    if best.map_or(true, |(current, _)| category < current) {
                        best = Some((category, label));
                    }
                }
                let Some((category, label)) = best else {
                    let message = "no component tables".to_string();
                    return Err(MetricError::InvalidCutPoints(message));
                };
                Ok(MetricResult::new(*score, category, label))
            }
            (Classifier::Rank(ranker), Scored::Batch(scores)) => {
                let Some(index) = args.selected_index else {
                    return Err(MetricError::MissingArgument {
                        metric: metric.to_string(),
                        argument: "selected_index",
                    });
                };
                ranker.classify(scores, index)
            }
            (Classifier::Rank(_), other) => Err(MetricError::payload_mismatch(
                "a batch of scores",
                other.kind(),
            )),
            (_, other) => Err(MetricError::payload_mismatch(
                "a scalar score",
                other.kind(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Threshold;

    fn table(positive: f64, neutral: f64) -> CutPointTable {
        CutPointTable::three_bucket(
            CutPoint::at_least(positive, Threshold::Positive),
            CutPoint::at_least(neutral, Threshold::Neutral),
            LabelSet::three("High", "Avg", "Low"),
        )
        .unwrap()
    }

    fn components() -> Classifier {
        Classifier::BestComponent(vec![
            ("primary", table(0.9, 0.8)),
            ("secondary", table(0.8, 0.7)),
        ])
    }

    #[test]
    fn best_component_wins() {
        let scored = Scored::with_components(0.5, [("primary", 0.1), ("secondary", 0.75)]);
        let result = components()
            .classify("success", &scored, &ParseArgs::default())
            .unwrap();
        assert_eq!(result.threshold(), Some(Threshold::Neutral));
        assert_eq!(result.label(), "Avg");
        assert_eq!(result.result(), 0.5);
    }

    #[test]
    fn missing_component_is_reported() {
        let scored = Scored::with_components(0.5, [("primary", 0.1)]);
        let err = components()
            .classify("success", &scored, &ParseArgs::default())
            .unwrap_err();
        assert_eq!(err, MetricError::MissingComponent("secondary".to_string()));
    }

    #[test]
    fn rank_requires_selected_index() {
        let ranked = Classifier::Rank(RankClassifier::default());
        let batch = Scored::Batch(vec![0.1]);
        let err = ranked
            .classify("desirability", &batch, &ParseArgs::default())
            .unwrap_err();
        assert!(matches!(err, MetricError::MissingArgument { .. }));
        let args = ParseArgs::selected(0);
        assert!(ranked.classify("desirability", &batch, &args).is_ok());
    }

    #[test]
    fn mismatched_score_kind_is_rejected() {
        let cut = Classifier::CutPoints(table(0.8, 0.6));
        let batch = Scored::Batch(vec![0.1]);
        let err = cut
            .classify("sentiment", &batch, &ParseArgs::default())
            .unwrap_err();
        assert!(err.is_programmer_error());
    }
}
