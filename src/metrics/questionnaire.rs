//! Metrics averaged over a batch of questions: usefulness, usability and
//! success.

use super::{at_least, example_choices, three_bucket};
use crate::classification::{Classifier, CutPointTable, LabelSet};
use crate::core::{Choices, Coercion, Payload, Threshold};
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{hundred_point_scale, mean, ordinal_mean, Scored};
use crate::validation::{MetricSpec, Shape};
use serde_json::Value;

const LIKERT_KEYS: &[&str] = &[
    "strongly_disagree",
    "disagree",
    "neutral",
    "agree",
    "strongly_agree",
];

const TASK_KEYS: &[&str] = &[
    "average_primary_percentage",
    "average_secondary_percentage",
    "average_tertiary_percentage",
];

const COMPONENTS: [&str; 3] = ["average_primary", "average_secondary", "average_tertiary"];

/// Upper end of the usefulness rating scale.
#[derive(Debug, Clone, Copy)]
enum ScaleMax {
    /// Number of keys the question carries.
    KeyCount,
    Fixed(f64),
}

fn usefulness_formula(scale_max: ScaleMax) -> impl Fn(&Payload) -> Result<Scored, MetricError> {
    move |payload| {
        let scores = payload
            .list()?
            .iter()
            .map(|question| {
                let choices = question.choices()?;
                if choices.sum(LIKERT_KEYS) == 0.0 {
                    return Ok(0.0);
                }
                let max = match scale_max {
                    ScaleMax::KeyCount => choices.len() as f64,
                    ScaleMax::Fixed(max) => max,
                };
                let rating = ordinal_mean(choices, LIKERT_KEYS);
                Ok(hundred_point_scale(rating, 1.0, max))
            })
            .collect::<Result<Vec<_>, MetricError>>()?;
        Ok(Scored::scalar(mean(&scores)))
    }
}

fn usefulness_spec() -> MetricSpec {
    MetricSpec::new(
        Shape::batch(Shape::choices(LIKERT_KEYS)),
        Coercion::Lexical,
        Value::Array(vec![example_choices(LIKERT_KEYS, 0.1)]),
    )
}

fn usefulness_labels() -> LabelSet {
    LabelSet::three("High", "Average", "Low")
}

/// Per-key means over the batch, then their mean.
fn task_components(payload: &Payload) -> Result<Scored, MetricError> {
    let questions = payload
        .list()?
        .iter()
        .map(Payload::choices)
        .collect::<Result<Vec<&Choices>, _>>()?;
    let averages: Vec<f64> = TASK_KEYS
        .iter()
        .map(|key| {
            let answers: Vec<f64> = questions.iter().map(|question| question.get(key)).collect();
            mean(&answers)
        })
        .collect();
    Ok(Scored::with_components(
        mean(&averages),
        COMPONENTS.iter().copied().zip(averages.iter().copied()),
    ))
}

fn task_spec() -> MetricSpec {
    MetricSpec::new(
        Shape::batch(Shape::choices(TASK_KEYS)),
        Coercion::Lexical,
        Value::Array(vec![example_choices(TASK_KEYS, 0.8)]),
    )
}

fn component_table(positive: f64, neutral: f64) -> Result<CutPointTable, MetricError> {
    CutPointTable::three_bucket(
        at_least(positive, Threshold::Positive),
        at_least(neutral, Threshold::Neutral),
        LabelSet::three("High", "Avg", "Low"),
    )
}

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    registry.register(
        "usefulness",
        VersionedFormula::new(
            "v1",
            usefulness_spec(),
            usefulness_formula(ScaleMax::KeyCount),
            three_bucket(
                at_least(0.8, Threshold::Positive),
                at_least(0.6, Threshold::Neutral),
                usefulness_labels(),
            )?,
        ),
    )?;
    registry.register(
        "usefulness",
        VersionedFormula::new(
            "v2",
            usefulness_spec(),
            usefulness_formula(ScaleMax::Fixed(LIKERT_KEYS.len() as f64)),
            three_bucket(
                at_least(80.0, Threshold::Positive),
                at_least(60.0, Threshold::Neutral),
                usefulness_labels(),
            )?,
        ),
    )?;

    registry.register(
        "usability",
        VersionedFormula::new(
            "v1",
            task_spec(),
            task_components,
            three_bucket(
                at_least(0.8, Threshold::Positive),
                at_least(0.6, Threshold::Neutral),
                LabelSet::three("Good", "Avg", "Low"),
            )?,
        ),
    )?;

    registry.register(
        "success",
        VersionedFormula::new(
            "v1",
            task_spec(),
            task_components,
            Classifier::BestComponent(vec![
                (COMPONENTS[0], component_table(0.90, 0.80)?),
                (COMPONENTS[1], component_table(0.80, 0.70)?),
                (COMPONENTS[2], component_table(0.65, 0.55)?),
            ]),
        ),
    )?;
    Ok(())
}
