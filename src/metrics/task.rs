//! Task-based metrics: completion rates and first-click engagement.

use super::{above, at_least, three_bucket};
use crate::classification::{Classifier, Comparison, CutPointTable, LabelSet};
use crate::core::{Coercion, EngagementCounts, Payload, Threshold};
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{safe_divide, Scored};
use crate::validation::{MetricSpec, Shape};
use serde_json::json;

const COMPLETION_KEYS: &[&str] = &["direct_success", "indirect_success"];

const ENGAGEMENT_KEYS: &[&str] = &[
    "primary_clicks_count",
    "secondary_clicks_count",
    "tertiary_clicks_count",
    "total_clicks_count",
];

/// Click weights for primary, secondary and tertiary hotspots.
const ENGAGEMENT_WEIGHTS: [(&str, f64); 3] = [
    ("primary_clicks_count", 1.0),
    ("secondary_clicks_count", 1.0),
    ("tertiary_clicks_count", 1.0),
];

fn completion(payload: &Payload) -> Result<Scored, MetricError> {
    let choices = payload.choices()?;
    let direct = choices.get("direct_success");
    let indirect = choices.get("indirect_success");
    Ok(Scored::with_components(
        direct + indirect,
        [("direct_success", direct), ("indirect_success", indirect)],
    ))
}

fn engagement(payload: &Payload) -> Result<Scored, MetricError> {
    let counts = payload.choices()?;
    let total = counts.get("total_clicks_count");
    let score: f64 = ENGAGEMENT_WEIGHTS
        .iter()
        .map(|(key, weight)| safe_divide(counts.get(key), total) * weight)
        .sum();
    Ok(Scored::scalar(score))
}

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    let spec = MetricSpec::new(
        Shape::choices(COMPLETION_KEYS),
        Coercion::NumbersOnly,
        json!({"direct_success": 0.5, "indirect_success": 0.3}),
    );
    let labels = LabelSet::five([
        "Very Successful",
        "Successful",
        "Avg",
        "Somewhat Failed",
        "Failed",
    ]);
    let table = CutPointTable::five_bucket(
        [
            (0.9, Comparison::AtLeast),
            (0.7, Comparison::AtLeast),
            (0.5, Comparison::AtLeast),
            (0.3, Comparison::AtLeast),
        ],
        labels,
    )?;
    registry.register(
        "completion",
        VersionedFormula::new("v1", spec, completion, Classifier::CutPoints(table)),
    )?;

    let example = EngagementCounts {
        primary_clicks_count: 6,
        secondary_clicks_count: 2,
        tertiary_clicks_count: 1,
        total_clicks_count: 10,
    }
    .to_payload();
    let spec = MetricSpec::new(
        Shape::choices(ENGAGEMENT_KEYS),
        Coercion::IntegersOnly,
        example,
    );
    registry.register(
        "engagement",
        VersionedFormula::new(
            "v1",
            spec,
            engagement,
            three_bucket(
                above(0.7, Threshold::Positive),
                at_least(0.5, Threshold::Neutral),
                LabelSet::three("High", "Avg", "Low"),
            )?,
        ),
    )?;
    Ok(())
}
