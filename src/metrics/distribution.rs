//! Metrics over numeric lists: loyalty (NPS distribution) and effort
//! (raw 1-5 ratings).

use super::{at_least, three_bucket};
use crate::classification::LabelSet;
use crate::core::{Coercion, Payload, Threshold};
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{bucket_sum, mean, promoter_detractor, Scored};
use crate::validation::{MetricSpec, Shape};
use serde_json::json;
use std::ops::Range;

/// Loyalty buckets, best to worst.
const LOYALTY_BUCKETS: usize = 11;
const PROMOTERS: Range<usize> = 0..2;
const PASSIVES: Range<usize> = 2..4;
const DETRACTORS: Range<usize> = 4..LOYALTY_BUCKETS;

/// Highest rating on the effort scale.
const EFFORT_SCALE: f64 = 5.0;

fn loyalty(payload: &Payload) -> Result<Scored, MetricError> {
    let buckets = payload.values()?;
    Ok(Scored::with_components(
        promoter_detractor(buckets, PROMOTERS, DETRACTORS),
        [
            ("promoters", bucket_sum(buckets, PROMOTERS)),
            ("passives", bucket_sum(buckets, PASSIVES)),
            ("detractors", bucket_sum(buckets, DETRACTORS)),
        ],
    ))
}

fn effort(payload: &Payload) -> Result<Scored, MetricError> {
    let ratings = payload.section("choices")?.values()?;
    Ok(Scored::scalar(mean(ratings) / EFFORT_SCALE))
}

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    registry.register(
        "loyalty",
        VersionedFormula::new(
            "v1",
            MetricSpec::new(
                Shape::Distribution {
                    len: LOYALTY_BUCKETS,
                },
                Coercion::Lexical,
                json!([0.1, 0.2, 0.1, 0.05, 0.09, 0.05, 0.1, 0.01, 0.02, 0.01, 0.02]),
            ),
            loyalty,
            three_bucket(
                at_least(0.3, Threshold::Positive),
                at_least(0.0, Threshold::Neutral),
                LabelSet::three("High", "Average", "Low"),
            )?,
        ),
    )?;

    registry.register(
        "effort",
        VersionedFormula::new(
            "v1",
            MetricSpec::new(
                Shape::Sections(vec![("choices", Shape::Samples)]),
                Coercion::Lexical,
                json!({"choices": [5, 5, 5, 4, 3, 4, 2, 1]}),
            ),
            effort,
            three_bucket(
                at_least(0.8571, Threshold::Positive),
                at_least(0.5714, Threshold::Neutral),
                LabelSet::three("Excellent", "Average", "Low"),
            )?,
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loyalty_splits_promoters_passives_detractors() {
        let buckets = vec![0.3, 0.2, 0.1, 0.1, 0.1, 0.05, 0.05, 0.05, 0.05, 0.0, 0.0];
        let scored = loyalty(&Payload::Values(buckets)).unwrap();
        let breakdown = scored.breakdown();
        assert!((breakdown["promoters"] - 0.5).abs() < 1e-9);
        assert!((breakdown["passives"] - 0.2).abs() < 1e-9);
        assert!((breakdown["detractors"] - 0.3).abs() < 1e-9);
        let Scored::Scalar { score, .. } = scored else {
            panic!("loyalty yields a scalar");
        };
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn effort_is_mean_rating_over_scale() {
        let ratings = Payload::Values(vec![5.0, 4.0, 3.0]);
        let payload = Payload::Sections([("choices".to_string(), ratings)].into_iter().collect());
        assert_eq!(effort(&payload).unwrap(), Scored::scalar(0.8));
    }
}
