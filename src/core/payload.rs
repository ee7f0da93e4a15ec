//! Typed survey payloads and numeric coercion.
//!
//! Callers hand the engine untyped JSON. Validation turns it into a
//! [`Payload`] tree once, so formulas never look at raw values again.

use crate::errors::MetricError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// Tried in order; the first match decides the radix.
static DECIMAL_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[1-9]([0-9]*)?$").unwrap());
static OCTAL_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[0-7]+$").unwrap());
static HEX_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9A-Fa-f]+$").unwrap());
static BINARY_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0b[01]+$").unwrap());

/// Which raw values count as numbers for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    /// JSON numbers, plus strings spelling an integer in decimal, octal,
    /// hexadecimal or binary notation.
    #[default]
    Lexical,
    /// JSON numbers only.
    NumbersOnly,
    /// JSON integers only.
    IntegersOnly,
}

impl Coercion {
    /// Numeric value of `value` under this policy, `None` if it is not numeric.
    pub fn coerce(&self, value: &Value) -> Option<f64> {
        match (self, value) {
            (_, Value::Number(number)) if *self != Coercion::IntegersOnly => number.as_f64(),
            (Coercion::IntegersOnly, Value::Number(number)) => {
                if number.is_i64() || number.is_u64() {
                    number.as_f64()
                } else {
                    None
                }
            }
            (Coercion::Lexical, Value::String(text)) => lexical_integer(text),
            _ => None,
        }
    }
}

/// Parse a string that lexically spells an integer.
///
/// Accepts signed decimal without leading zeros, `0`-prefixed octal,
/// `0x` hexadecimal and `0b` binary. Anything else (including `"0"` and
/// decimal fractions) is rejected.
pub fn lexical_integer(text: &str) -> Option<f64> {
    if DECIMAL_INTEGER.is_match(text) {
        return text.parse::<f64>().ok();
    }
    if OCTAL_INTEGER.is_match(text) {
        return Some(radix_value(&text[1..], 8));
    }
    if HEX_INTEGER.is_match(text) {
        return Some(radix_value(&text[2..], 16));
    }
    if BINARY_INTEGER.is_match(text) {
        return Some(radix_value(&text[2..], 2));
    }
    None
}

fn radix_value(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
}

/// Named numeric choices of one question, e.g. `{helpful: 0.3, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choices(BTreeMap<String, f64>);

impl Choices {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self(values)
    }

    /// Value of `key`, zero when the key is absent.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn sum(&self, keys: &[&str]) -> f64 {
        keys.iter().map(|key| self.get(key)).sum()
    }

    /// Number of keys present, including keys no formula reads.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for Choices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One option of a single-select question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub selected: bool,
    pub percent: f64,
}

/// Validated payload tree handed to formulas.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Choices(Choices),
    /// Ordered numbers: a bucket distribution or raw samples.
    Values(Vec<f64>),
    Selection(Vec<SelectionOption>),
    /// Questions of a batch, or positional sub-payloads.
    List(Vec<Payload>),
    Sections(BTreeMap<String, Payload>),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Choices(_) => "choices",
            Payload::Values(_) => "values",
            Payload::Selection(_) => "selection",
            Payload::List(_) => "list",
            Payload::Sections(_) => "sections",
        }
    }

    pub fn choices(&self) -> Result<&Choices, MetricError> {
        match self {
            Payload::Choices(choices) => Ok(choices),
            other => Err(MetricError::payload_mismatch("choices", other.kind())),
        }
    }

    pub fn values(&self) -> Result<&[f64], MetricError> {
        match self {
            Payload::Values(values) => Ok(values),
            other => Err(MetricError::payload_mismatch("values", other.kind())),
        }
    }

    pub fn selection(&self) -> Result<&[SelectionOption], MetricError> {
        match self {
            Payload::Selection(options) => Ok(options),
            other => Err(MetricError::payload_mismatch("selection", other.kind())),
        }
    }

    pub fn list(&self) -> Result<&[Payload], MetricError> {
        match self {
            Payload::List(items) => Ok(items),
            other => Err(MetricError::payload_mismatch("list", other.kind())),
        }
    }

    /// Named section of a sectioned payload.
    pub fn section(&self, name: &str) -> Result<&Payload, MetricError> {
        match self {
            Payload::Sections(sections) => sections
                .get(name)
                .ok_or_else(|| MetricError::payload_mismatch("section", "missing section")),
            other => Err(MetricError::payload_mismatch("sections", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lexical_integer_accepts_each_notation() {
        assert_eq!(lexical_integer("42"), Some(42.0));
        assert_eq!(lexical_integer("-7"), Some(-7.0));
        assert_eq!(lexical_integer("+3"), Some(3.0));
        assert_eq!(lexical_integer("017"), Some(15.0));
        assert_eq!(lexical_integer("0x1A"), Some(26.0));
        assert_eq!(lexical_integer("0b101"), Some(5.0));
    }

    #[test]
    fn lexical_integer_rejects_other_strings() {
        for text in ["", "0", "0.5", "abc", "08", "0xZ", "0b2", " 1", "1e3"] {
            assert_eq!(lexical_integer(text), None, "{text:?} should be rejected");
        }
    }

    #[test]
    fn coercion_policies_differ_on_strings_and_floats() {
        assert_eq!(Coercion::Lexical.coerce(&json!("12")), Some(12.0));
        assert_eq!(Coercion::Lexical.coerce(&json!(0.25)), Some(0.25));
        assert_eq!(Coercion::NumbersOnly.coerce(&json!("12")), None);
        assert_eq!(Coercion::NumbersOnly.coerce(&json!(0.25)), Some(0.25));
        assert_eq!(Coercion::IntegersOnly.coerce(&json!(4)), Some(4.0));
        assert_eq!(Coercion::IntegersOnly.coerce(&json!(4.5)), None);
        assert_eq!(Coercion::IntegersOnly.coerce(&json!("4")), None);
    }

    #[test]
    fn non_numeric_json_is_never_coerced() {
        for value in [json!(null), json!(true), json!([1]), json!({"a": 1})] {
            assert_eq!(Coercion::Lexical.coerce(&value), None);
        }
    }

    #[test]
    fn choices_treat_absent_keys_as_zero() {
        let choices: Choices = [("helpful".to_string(), 0.4), ("simple".to_string(), 0.1)]
            .into_iter()
            .collect();
        assert_eq!(choices.get("joyful"), 0.0);
        assert!((choices.sum(&["helpful", "simple", "joyful"]) - 0.5).abs() < 1e-12);
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn accessors_report_mismatched_kind() {
        let payload = Payload::Values(vec![1.0]);
        assert!(payload.values().is_ok());
        let err = payload.choices().unwrap_err();
        assert!(err.is_programmer_error());
    }
}
