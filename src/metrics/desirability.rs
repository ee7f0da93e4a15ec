//! Desirability, the one metric with two incompatible formulas.
//!
//! - `v1` ranks a batch of questions against each other and reports the
//!   selected question's `k/5` position.
//! - `v2` blends a sentiment ratio with a likelihood score on fixed cut
//!   points. It is the default.

use super::{at_least, example_choices, three_bucket};
use crate::classification::{Classifier, LabelSet};
use crate::core::{Coercion, Payload, Threshold};
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{
    ordinal_weighted_sum, polarity_ratio, promoter_detractor, signed_sum, RankClassifier, Scored,
};
use crate::validation::{MetricSpec, Shape};
use serde_json::json;

const INTEREST_POSITIVE: &[&str] = &["very_interested", "moderately_interested"];
const INTEREST_NEGATIVE: &[&str] = &["slightly_interested", "not_interested"];
const INTEREST_KEYS: &[&str] = &[
    "very_interested",
    "moderately_interested",
    "slightly_interested",
    "not_interested",
];
const INTEREST_BUCKETS: usize = 10;

const SENTIMENT_POSITIVE: &[&str] = &["helpful", "innovative", "simple", "joyful"];
const SENTIMENT_NEGATIVE: &[&str] = &["complicated", "confusing", "unnecessary", "uninteresting"];
const SENTIMENT_KEYS: &[&str] = &[
    "helpful",
    "innovative",
    "simple",
    "joyful",
    "complicated",
    "confusing",
    "unnecessary",
    "uninteresting",
];

/// Least to most likely.
const LIKERT_KEYS: &[&str] = &[
    "very_unlikely",
    "somewhat_unlikely",
    "neutral",
    "somewhat_likely",
    "very_likely",
];

fn question_score(question: &Payload) -> Result<f64, MetricError> {
    match question {
        Payload::Choices(choices) => Ok(signed_sum(choices, INTEREST_POSITIVE, INTEREST_NEGATIVE)),
        Payload::Values(buckets) => Ok(promoter_detractor(buckets, 0..2, 4..INTEREST_BUCKETS)),
        other => Err(MetricError::payload_mismatch(
            "choices or values",
            other.kind(),
        )),
    }
}

fn ranked(payload: &Payload) -> Result<Scored, MetricError> {
    payload
        .list()?
        .iter()
        .map(question_score)
        .collect::<Result<Vec<_>, _>>()
        .map(Scored::Batch)
}

fn blended(payload: &Payload) -> Result<Scored, MetricError> {
    let [sentiment, likert] = payload.list()? else {
        return Err(MetricError::payload_mismatch(
            "two questions",
            "a different count",
        ));
    };
    let words = sentiment.choices()?;
    let scale = likert.choices()?;
    let sentiment_score = polarity_ratio(words, SENTIMENT_POSITIVE, SENTIMENT_NEGATIVE);
    let likert_score = ordinal_weighted_sum(scale, LIKERT_KEYS) / LIKERT_KEYS.len() as f64;
    Ok(Scored::with_components(
        (sentiment_score + likert_score) / 2.0,
        [
            ("sentiment_score", sentiment_score),
            ("likert_score", likert_score),
        ],
    ))
}

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    let question = Shape::OneOf(vec![
        Shape::choices(INTEREST_KEYS),
        Shape::Distribution {
            len: INTEREST_BUCKETS,
        },
    ]);
    let interest = json!({
        "very_interested": 0.3,
        "moderately_interested": 0.4,
        "slightly_interested": 0.2,
        "not_interested": 0.1
    });
    let example = json!([interest, [0.2, 0.3, 0.3, 0.5, 0.05, 0, 0, 0, 0.1, 0.05]]);
    let spec = MetricSpec::new(Shape::batch(question), Coercion::Lexical, example);
    registry.register(
        "desirability",
        VersionedFormula::new(
            "v1",
            spec,
            ranked,
            Classifier::Rank(RankClassifier::default()),
        ),
    )?;

    let questions = vec![Shape::choices(SENTIMENT_KEYS), Shape::choices(LIKERT_KEYS)];
    let example = json!([
        example_choices(SENTIMENT_KEYS, 0.1),
        example_choices(LIKERT_KEYS, 0.2),
    ]);
    let spec = MetricSpec::new(Shape::Sequence(questions), Coercion::Lexical, example);
    registry.register(
        "desirability",
        VersionedFormula::new(
            "v2",
            spec,
            blended,
            three_bucket(
                at_least(0.8, Threshold::Positive),
                at_least(0.6, Threshold::Neutral),
                LabelSet::three("Good", "Neutral", "Bad"),
            )?,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Choices;

    fn choices(pairs: &[(&str, f64)]) -> Payload {
        let choices: Choices = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect();
        Payload::Choices(choices)
    }

    #[test]
    fn question_score_handles_both_forms() {
        let map = choices(&[
            ("very_interested", 0.3),
            ("moderately_interested", 0.4),
            ("slightly_interested", 0.2),
            ("not_interested", 0.1),
        ]);
        assert!((question_score(&map).unwrap() - 0.4).abs() < 1e-9);

        let buckets = Payload::Values(vec![0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(question_score(&buckets).unwrap(), 1.0);
    }

    #[test]
    fn blended_averages_sentiment_ratio_and_likert() {
        let payload = Payload::List(vec![
            choices(&[("helpful", 0.6), ("complicated", 0.2)]),
            choices(&[("very_likely", 1.0)]),
        ]);
        let scored = blended(&payload).unwrap();
        let breakdown = scored.breakdown();
        assert!((breakdown["sentiment_score"] - 0.75).abs() < 1e-9);
        assert!((breakdown["likert_score"] - 1.0).abs() < 1e-9);
        let Scored::Scalar { score, .. } = scored else {
            panic!("v2 yields a scalar");
        };
        assert!((score - 0.875).abs() < 1e-9);
    }

    #[test]
    fn blended_rejects_wrong_question_count() {
        let err = blended(&Payload::List(vec![choices(&[])])).unwrap_err();
        assert!(err.is_programmer_error());
    }
}
