//! Single-question metrics scored as a weighted sum of named choices.

use super::{above, at_least, example_choices, three_bucket};
use crate::classification::{Classifier, Comparison, CutPointTable, LabelSet};
use crate::core::Coercion;
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{weighted_sum, Scored};
use crate::validation::{MetricSpec, Shape};

use crate::core::Threshold::{Neutral, Positive};

const SATISFACTION_KEYS: &[&str] = &[
    "very_dissatisfied",
    "somewhat_dissatisfied",
    "neutral",
    "somewhat_satisfied",
    "very_satisfied",
];

struct ChoiceMetric {
    name: &'static str,
    fields: &'static [&'static str],
    /// Applied in order, then divided by `divisor`.
    weights: &'static [(&'static str, f64)],
    divisor: f64,
    classifier: fn() -> Result<Classifier, MetricError>,
}

const CATALOG: &[ChoiceMetric] = &[
    ChoiceMetric {
        name: "sentiment",
        fields: &[
            "helpful",
            "innovative",
            "simple",
            "joyful",
            "complicated",
            "confusing",
            "overwhelming",
            "annoying",
        ],
        weights: &[
            ("helpful", 1.0),
            ("innovative", 1.0),
            ("simple", 1.0),
            ("joyful", 1.0),
            ("complicated", -1.0),
            ("confusing", -1.0),
            ("overwhelming", -1.0),
            ("annoying", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                at_least(1.5, Positive),
                at_least(1.0, Neutral),
                LabelSet::three("positive", "neutral", "negative"),
            )
        },
    },
    ChoiceMetric {
        name: "feeling",
        fields: &[
            "anticipation",
            "surprise",
            "joy",
            "trust",
            "anger",
            "disgust",
            "sadness",
            "fear",
        ],
        weights: &[
            ("joy", 1.0),
            ("trust", 1.0),
            ("anger", -1.0),
            ("disgust", -1.0),
            ("sadness", -1.0),
            ("fear", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                above(0.3, Positive),
                above(0.1, Neutral),
                LabelSet::three("High Sentiment", "Avg Sentiment", "Low Sentiment"),
            )
        },
    },
    ChoiceMetric {
        name: "expectations",
        fields: &[
            "failed_expectations",
            "fell_short_of_expectations",
            "neutral",
            "met_expectations",
            "exceeded_expectations",
        ],
        weights: &[
            ("exceeded_expectations", 1.0),
            ("met_expectations", 1.0),
            ("neutral", -1.0),
            ("failed_expectations", -1.0),
            ("fell_short_of_expectations", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                above(0.3, Positive),
                above(0.1, Neutral),
                LabelSet::three("High", "Met", "Failed"),
            )
        },
    },
    ChoiceMetric {
        name: "satisfaction",
        fields: SATISFACTION_KEYS,
        weights: &[("very_satisfied", 1.0), ("somewhat_satisfied", 1.0)],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                above(0.8, Positive),
                above(0.6, Neutral),
                LabelSet::three("High", "Avg", "Low"),
            )
        },
    },
    ChoiceMetric {
        name: "post_task_satisfaction",
        fields: SATISFACTION_KEYS,
        weights: &[
            ("very_satisfied", 1.0),
            ("somewhat_satisfied", 1.0),
            ("neutral", -1.0),
            ("somewhat_dissatisfied", -1.0),
            ("very_dissatisfied", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                at_least(0.7, Positive),
                above(0.5, Neutral),
                LabelSet::three(
                    "High Satisfaction",
                    "Average Satisfaction",
                    "Low Satisfaction",
                ),
            )
        },
    },
    ChoiceMetric {
        name: "comprehension",
        fields: &[
            "did_not_understand",
            "understood_a_little",
            "understood_most_of_it",
            "understood_very_well",
        ],
        weights: &[
            ("understood_very_well", 1.0),
            ("understood_most_of_it", 1.0),
            ("did_not_understand", -1.0),
            ("understood_a_little", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                above(0.7, Positive),
                above(0.4, Neutral),
                LabelSet::three("High", "Average", "Low"),
            )
        },
    },
    ChoiceMetric {
        name: "frequency",
        fields: &["very_frequently", "frequently", "occasionally", "rarely"],
        weights: &[
            ("very_frequently", 1.0),
            ("frequently", 1.0),
            ("occasionally", -1.0),
            ("rarely", -1.0),
        ],
        divisor: 1.0,
        classifier: || {
            three_bucket(
                above(0.3, Positive),
                at_least(0.1, Neutral),
                LabelSet::three("High", "Avg", "Low"),
            )
        },
    },
    ChoiceMetric {
        name: "intent",
        fields: &["primary", "secondary", "tertiary"],
        weights: &[("primary", 3.0), ("secondary", 2.0), ("tertiary", 1.0)],
        divisor: 3.0,
        classifier: || {
            three_bucket(
                above(0.6, Positive),
                at_least(0.4, Neutral),
                LabelSet::three("High Intent", "Avg Intent", "Low Intent"),
            )
        },
    },
    ChoiceMetric {
        name: "appeal",
        fields: SATISFACTION_KEYS,
        weights: &[
            ("very_satisfied", 5.0),
            ("somewhat_satisfied", 4.0),
            ("neutral", 3.0),
            ("somewhat_dissatisfied", 2.0),
            ("very_dissatisfied", 1.0),
        ],
        divisor: 5.0,
        classifier: || {
            CutPointTable::five_bucket(
                [
                    (0.9, Comparison::AtLeast),
                    (0.7, Comparison::AtLeast),
                    (0.5, Comparison::AtLeast),
                    (0.3, Comparison::AtLeast),
                ],
                LabelSet::category_names(),
            )
            .map(Classifier::CutPoints)
        },
    },
];

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    for metric in CATALOG {
        let weights = metric.weights;
        let divisor = metric.divisor;
        let spec = MetricSpec::new(
            Shape::choices(metric.fields),
            Coercion::Lexical,
            example_choices(metric.fields, 0.1),
        );
        let formula = VersionedFormula::new(
            "v1",
            spec,
            move |payload| {
                let score = weighted_sum(payload.choices()?, weights) / divisor;
                Ok(Scored::scalar(score))
            },
            (metric.classifier)()?,
        );
        registry.register(metric.name, formula)?;
    }
    Ok(())
}
