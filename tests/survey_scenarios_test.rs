//! End-to-end scoring of representative survey payloads.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use ux_metrics::{Engine, MetricError, MetricResult, ParseArgs, Threshold, ValidationErrorKind};

fn engine() -> Engine {
    Engine::new().unwrap()
}

fn parse(metric: &str, payload: &Value) -> MetricResult {
    engine()
        .parse(metric, payload, &ParseArgs::default())
        .unwrap()
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn balanced_sentiment_is_negative() {
    let payload = json!({
        "helpful": 0.1, "innovative": 0.1, "simple": 0.1, "joyful": 0.1,
        "complicated": 0.1, "confusing": 0.1, "overwhelming": 0.1, "annoying": 0.1
    });
    let result = parse("sentiment", &payload);
    approx(result.result(), 0.0);
    assert_eq!(result.threshold(), Some(Threshold::Negative));
}

#[test]
fn interest_distribution_uses_two_promoter_buckets_and_six_detractors() {
    let payload = json!([[0.1, 0.2, 0.1, 0.05, 0.09, 0.05, 0.1, 0.01, 0.02, 0.02]]);
    let ranked = engine()
        .rank_version("desirability", "v1", &payload)
        .unwrap();
    assert_eq!(ranked.len(), 1);
    approx(ranked[0].raw_score, 0.01);
    assert_eq!(ranked[0].fraction.to_string(), "5/5");
}

#[test]
fn uniform_usefulness_scores_fifty() {
    let payload = json!([{
        "strongly_disagree": 0.1, "disagree": 0.1, "neutral": 0.1,
        "agree": 0.1, "strongly_agree": 0.1
    }]);
    let result = parse("usefulness", &payload);
    approx(result.result(), 50.0);
    assert_eq!(result.label(), "Low");
}

#[test]
fn completion_sums_direct_and_indirect_success() {
    let payload = json!({"direct_success": 0.5, "indirect_success": 0.3});
    let result = parse("completion", &payload);
    approx(result.result(), 0.8);
    assert_eq!(result.threshold(), Some(Threshold::Positive));
    assert_eq!(result.label(), "Successful");
}

#[test]
fn identical_questions_share_fraction_whatever_is_selected() {
    let question = json!({
        "very_interested": 0.3, "moderately_interested": 0.2,
        "slightly_interested": 0.3, "not_interested": 0.2
    });
    let payload = json!([question, question, question, question]);
    let engine = engine();

    let results: Vec<_> = (0..4)
        .map(|index| {
            engine
                .parse_version("desirability", "v1", &payload, &ParseArgs::selected(index))
                .unwrap()
        })
        .collect();

    for result in &results {
        assert_eq!(result.label(), "1/5");
        assert_eq!(result.threshold(), Some(Threshold::Negative));
        approx(result.result(), 0.0);
    }
}

#[test]
fn ranked_batch_orders_questions_and_marks_selection() {
    let payload = json!([
        [0.5, 0.5, 0, 0, 0, 0, 0, 0, 0, 0],
        [0.1, 0.1, 0.3, 0.3, 0.2, 0, 0, 0, 0, 0],
        {
            "very_interested": 0.4, "moderately_interested": 0.3,
            "slightly_interested": 0.2, "not_interested": 0.1
        }
    ]);
    let ranked = engine()
        .rank_version("desirability", "v1", &payload)
        .unwrap();
    let order: Vec<usize> = ranked.iter().map(|q| q.index).collect();
    assert_eq!(order, vec![1, 2, 0]);
    assert!(ranked.iter().all(|q| !q.selected));

    let labels: Vec<String> = ranked.iter().map(|q| q.fraction.to_string()).collect();
    assert_eq!(labels, vec!["2/5", "3/5", "5/5"]);
}

#[test]
fn rank_metric_without_selection_is_a_programmer_error() {
    let payload = json!([[0.5, 0.5, 0, 0, 0, 0, 0, 0, 0, 0]]);
    let err = engine()
        .parse_version("desirability", "v1", &payload, &ParseArgs::default())
        .unwrap_err();
    assert!(err.is_programmer_error());

    let err = engine()
        .parse_version("desirability", "v1", &payload, &ParseArgs::selected(3))
        .unwrap_err();
    assert!(matches!(err, MetricError::SelectedIndexOutOfRange { .. }));
}

#[test]
fn brand_score_breakdown_exposes_components() {
    let payload = json!({
        "nps_question": [0.3, 0.3, 0.1, 0.1, 0.1, 0.05, 0.05, 0, 0, 0],
        "market_recognition_question": [
            {"selected": false, "percent": 0.7},
            {"selected": true, "percent": 0.4}
        ],
        "npa_question": {
            "helpful": 0.5, "innovative": 0.4, "simple": 0.3, "joyful": 0.2,
            "complicated": 0.1, "confusing": 0.0, "overwhelming": 0.0, "annoying": 0.0
        }
    });
    let engine = engine();
    let breakdown = engine.breakdown("brand_score", &payload).unwrap();
    let names: Vec<&str> = breakdown.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["market_recognition", "npa", "nps"]);
    approx(breakdown["nps"], 0.6);
    approx(breakdown["market_recognition"], 0.4);
    approx(breakdown["npa"], 1.3);

    let result = parse("brand_score", &payload);
    approx(result.result(), 2.3);
    assert_eq!(result.label(), "Mid");
}

#[test]
fn invalid_payload_error_carries_payload_and_example() {
    let payload = json!({"direct_success": 0.5});
    let err = engine()
        .parse("completion", &payload, &ParseArgs::default())
        .unwrap_err();
    let validation = match err {
        MetricError::Validation(validation) => validation,
        other => panic!("expected a validation error, got {other:?}"),
    };
    let fields = vec!["indirect_success".to_string()];
    let missing = ValidationErrorKind::MissingField { fields };
    assert_eq!(validation.kind, missing);
    assert_eq!(validation.payload, payload);
    assert!(engine().validate("completion", &validation.expected));
}

#[test]
fn lexical_numbers_are_accepted_where_allowed() {
    let engine = engine();
    let lexical = json!({"primary": "1", "secondary": "0x1", "tertiary": "0b0"});
    assert!(engine.validate("intent", &lexical));

    let completion = json!({"direct_success": "1", "indirect_success": 0});
    assert!(!engine.validate("completion", &completion));
}
