//! Closed arithmetic formula families shared by the metric catalog.
//!
//! All functions are pure. Division goes through [`safe_divide`], so an
//! empty opinion mass scores zero instead of producing NaN.

use crate::core::Choices;
use std::ops::Range;

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `Σ positive − Σ negative`.
pub fn signed_sum(choices: &Choices, positive: &[&str], negative: &[&str]) -> f64 {
    choices.sum(positive) - choices.sum(negative)
}

/// `Σ weight·value` over weighted keys.
pub fn weighted_sum(choices: &Choices, weights: &[(&str, f64)]) -> f64 {
    weights
        .iter()
        .map(|(key, weight)| choices.get(key) * weight)
        .sum()
}

/// Bucket values multiplied by their 1-based rank on an ordinal scale,
/// lowest bucket first.
pub fn ordinal_weighted_sum(choices: &Choices, scale: &[&str]) -> f64 {
    scale
        .iter()
        .zip(1u32..)
        .map(|(key, rank)| choices.get(key) * f64::from(rank))
        .sum()
}

/// Mean rank on an ordinal scale: weighted sum over total responses.
pub fn ordinal_mean(choices: &Choices, scale: &[&str]) -> f64 {
    safe_divide(ordinal_weighted_sum(choices, scale), choices.sum(scale))
}

/// `positive / (positive + negative)`.
pub fn polarity_ratio(choices: &Choices, positive: &[&str], negative: &[&str]) -> f64 {
    let positive_mass = choices.sum(positive);
    safe_divide(positive_mass, positive_mass + choices.sum(negative))
}

/// Sum of the buckets in `range`, ignoring any part past the end.
pub fn bucket_sum(values: &[f64], range: Range<usize>) -> f64 {
    let end = range.end.min(values.len());
    let start = range.start.min(end);
    values[start..end].iter().sum()
}

/// Net promoter score of a best-to-worst distribution.
pub fn promoter_detractor(
    values: &[f64],
    promoters: Range<usize>,
    detractors: Range<usize>,
) -> f64 {
    bucket_sum(values, promoters) - bucket_sum(values, detractors)
}

/// Rescale `value` from `[min, max]` onto `[0, 100]`.
pub fn hundred_point_scale(value: f64, min: f64, max: f64) -> f64 {
    safe_divide(value - min, max - min) * 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    safe_divide(values.iter().sum(), values.len() as f64)
}
