//! Brand score: promoter share, market recognition and net positive
//! alignment blended into one sum.

use super::{at_least, example_choices, three_bucket};
use crate::classification::LabelSet;
use crate::core::{Coercion, Payload, Threshold};
use crate::errors::MetricError;
use crate::registry::{VersionRegistry, VersionedFormula};
use crate::scoring::{bucket_sum, signed_sum, Scored};
use crate::validation::{MetricSpec, Shape};
use serde_json::json;

const NPA_POSITIVE: &[&str] = &["helpful", "innovative", "simple", "joyful"];
const NPA_NEGATIVE: &[&str] = &["complicated", "confusing", "overwhelming", "annoying"];
const NPA_KEYS: &[&str] = &[
    "helpful",
    "innovative",
    "simple",
    "joyful",
    "complicated",
    "confusing",
    "overwhelming",
    "annoying",
];

const NPS_BUCKETS: usize = 10;

fn brand_score(payload: &Payload) -> Result<Scored, MetricError> {
    let nps = bucket_sum(payload.section("nps_question")?.values()?, 0..2);
    let market_recognition = payload
        .section("market_recognition_question")?
        .selection()?
        .iter()
        .find(|option| option.selected)
        .map_or(0.0, |option| option.percent);
    let npa_choices = payload.section("npa_question")?.choices()?;
    let npa = signed_sum(npa_choices, NPA_POSITIVE, NPA_NEGATIVE);

    Ok(Scored::with_components(
        nps + market_recognition + npa,
        [
            ("nps", nps),
            ("market_recognition", market_recognition),
            ("npa", npa),
        ],
    ))
}

fn spec() -> MetricSpec {
    MetricSpec::new(
        Shape::Sections(vec![
            ("nps_question", Shape::Distribution { len: NPS_BUCKETS }),
            ("market_recognition_question", Shape::Selection),
            ("npa_question", Shape::exact_choices(NPA_KEYS)),
        ]),
        Coercion::Lexical,
        json!({
            "nps_question": [0.1, 0.2, 0.1, 0.05, 0.09, 0.05, 0.1, 0.01, 0.02, 0.02],
            "npa_question": example_choices(NPA_KEYS, 0.1),
            "market_recognition_question": [
                {"selected": false, "percent": 0.5},
                {"selected": true, "percent": 0.2},
                {"selected": false, "percent": 0.1},
                {"selected": false, "percent": 0.05},
                {"selected": false, "percent": 0.2},
                {"selected": false, "percent": 0.05},
                {"selected": false, "percent": 0.05}
            ]
        }),
    )
}

pub(super) fn register(registry: &mut VersionRegistry) -> Result<(), MetricError> {
    registry.register(
        "brand_score",
        VersionedFormula::new(
            "v1",
            spec(),
            brand_score,
            three_bucket(
                at_least(3.0, Threshold::Positive),
                at_least(2.0, Threshold::Neutral),
                LabelSet::three("High", "Mid", "Low"),
            )?,
        ),
    )
}
