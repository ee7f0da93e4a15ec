//! Payload validation.
//!
//! A [`MetricSpec`] declares the shape a metric accepts. Checking a raw
//! JSON value against it either yields the typed [`Payload`] tree or a
//! [`ValidationError`] naming the first offending location.
//!
//! Within one map, every missing required field is reported together,
//! and missing fields always take precedence over non-numeric values, so
//! a payload lacking a required key is rejected no matter what the other
//! keys hold.

mod error;
mod field_path;

pub use error::{ValidationError, ValidationErrorKind};
pub use field_path::FieldPath;

use crate::core::{Choices, Coercion, Payload, SelectionOption};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How many keys a choices map may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Any non-empty map containing the required keys.
    AnyPositive,
    /// Exactly this many keys.
    Exact(usize),
}

/// Declared structure of a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Map of named numeric choices.
    Choices {
        fields: &'static [&'static str],
        cardinality: Cardinality,
    },
    /// Numeric list of exactly `len` buckets.
    Distribution { len: usize },
    /// Non-empty numeric list.
    Samples,
    /// Non-empty list of `{selected, percent}` options, at least one selected.
    Selection,
    /// Non-empty list whose items all match the inner shape.
    Batch(Box<Shape>),
    /// Fixed-length list, one shape per position.
    Sequence(Vec<Shape>),
    /// The first alternative whose container type matches.
    OneOf(Vec<Shape>),
    /// Map of named sub-payloads; extra sections are ignored.
    Sections(Vec<(&'static str, Shape)>),
}

impl Shape {
    pub fn choices(fields: &'static [&'static str]) -> Self {
        Shape::Choices {
            fields,
            cardinality: Cardinality::AnyPositive,
        }
    }

    pub fn exact_choices(fields: &'static [&'static str]) -> Self {
        Shape::Choices {
            fields,
            cardinality: Cardinality::Exact(fields.len()),
        }
    }

    pub fn batch(item: Shape) -> Self {
        Shape::Batch(Box::new(item))
    }

    fn expects_map(&self) -> Option<bool> {
        match self {
            Shape::Choices { .. } | Shape::Sections(_) => Some(true),
            Shape::OneOf(_) => None,
            _ => Some(false),
        }
    }

    fn describe(&self) -> String {
        match self {
            Shape::Choices { .. } => "a map of choices".to_string(),
            Shape::Sections(_) => "a map of sections".to_string(),
            Shape::Distribution { len } => format!("a list of {len} numbers"),
            Shape::Samples => "a non-empty list of numbers".to_string(),
            Shape::Selection => "a list of selectable options".to_string(),
            Shape::Batch(_) => "a non-empty list of questions".to_string(),
            Shape::Sequence(items) => format!("a list of {} questions", items.len()),
            Shape::OneOf(alternatives) => alternatives
                .iter()
                .map(Shape::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// Immutable description of what one metric version accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    shape: Shape,
    coercion: Coercion,
    example: Value,
}

impl MetricSpec {
    pub fn new(shape: Shape, coercion: Coercion, example: Value) -> Self {
        Self {
            shape,
            coercion,
            example,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    /// Canonical example of a valid payload.
    pub fn example(&self) -> &Value {
        &self.example
    }

    /// Required keys of a top-level choices map, in declaration order.
    /// Empty for list-shaped payloads.
    pub fn required_fields(&self) -> Vec<&'static str> {
        match &self.shape {
            Shape::Choices { fields, .. } => fields.to_vec(),
            Shape::Sections(sections) => sections.iter().map(|(name, _)| *name).collect(),
            _ => Vec::new(),
        }
    }

    pub fn accepts(&self, payload: &Value) -> bool {
        self.extract("", payload).is_ok()
    }

    /// Validate `payload` and convert it into a typed tree.
    pub fn extract(&self, metric: &str, payload: &Value) -> Result<Payload, ValidationError> {
        Extractor {
            coercion: self.coercion,
        }
        .extract(&self.shape, payload, &FieldPath::root())
        .map_err(|rejection| ValidationError {
            metric: metric.to_string(),
            kind: rejection.kind,
            path: rejection.path,
            payload: payload.clone(),
            expected: self.example.clone(),
        })
    }
}

struct Rejection {
    kind: ValidationErrorKind,
    path: FieldPath,
}

impl Rejection {
    fn shape(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: ValidationErrorKind::Shape {
                detail: detail.into(),
            },
            path: path.clone(),
        }
    }

    fn missing(path: &FieldPath, fields: Vec<String>) -> Self {
        Self {
            kind: ValidationErrorKind::MissingField { fields },
            path: path.clone(),
        }
    }

    fn non_numeric(path: FieldPath, value: &Value) -> Self {
        Self {
            kind: ValidationErrorKind::NonNumericValue {
                value: value.clone(),
            },
            path,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

struct Extractor {
    coercion: Coercion,
}

impl Extractor {
    fn extract(
        &self,
        shape: &Shape,
        value: &Value,
        path: &FieldPath,
    ) -> Result<Payload, Rejection> {
        match shape {
            Shape::Choices {
                fields,
                cardinality,
            } => self.choices(fields, *cardinality, value, path),
            Shape::Distribution { len } => {
                let items = expect_list(shape, value, path)?;
                if items.len() != *len {
                    return Err(Rejection::shape(
                        path,
                        format!("expected {len} values, found {}", items.len()),
                    ));
                }
                self.numbers(items, path).map(Payload::Values)
            }
            Shape::Samples => {
                let items = expect_non_empty(shape, value, path)?;
                self.numbers(items, path).map(Payload::Values)
            }
            Shape::Selection => self.selection(shape, value, path),
            Shape::Batch(item) => {
                let items = expect_non_empty(shape, value, path)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, question)| self.extract(item, question, &path.index(index)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Payload::List)
            }
            Shape::Sequence(shapes) => {
                let items = expect_list(shape, value, path)?;
                let (expected, found) = (shapes.len(), items.len());
                if expected != found {
                    let message = format!("expected {expected} questions, found {found}");
                    return Err(Rejection::shape(path, message));
                }
                shapes
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(index, (item_shape, item))| {
                        self.extract(item_shape, item, &path.index(index))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Payload::List)
            }
            Shape::OneOf(alternatives) => self.one_of(shape, alternatives, value, path),
            Shape::Sections(sections) => self.sections(shape, sections, value, path),
        }
    }

    fn choices(
        &self,
        fields: &[&str],
        cardinality: Cardinality,
        value: &Value,
        path: &FieldPath,
    ) -> Result<Payload, Rejection> {
        let Some(map) = value.as_object() else {
            let found = type_name(value);
            let message = format!("expected a map of choices, found {found}");
            return Err(Rejection::shape(path, message));
        };

        let missing = missing_keys(fields, map);
        if !missing.is_empty() {
            return Err(Rejection::missing(path, missing));
        }

        if let Cardinality::Exact(expected) = cardinality {
            if map.len() != expected {
                return Err(Rejection::shape(
                    path,
                    format!("expected exactly {expected} fields, found {}", map.len()),
                ));
            }
        }

        map.iter()
            .map(|(key, raw)| {
                self.coercion
                    .coerce(raw)
                    .map(|number| (key.clone(), number))
                    .ok_or_else(|| Rejection::non_numeric(path.key(key), raw))
            })
            .collect::<Result<Choices, _>>()
            .map(Payload::Choices)
    }

    fn numbers(&self, items: &[Value], path: &FieldPath) -> Result<Vec<f64>, Rejection> {
        items
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                self.coercion
                    .coerce(raw)
                    .ok_or_else(|| Rejection::non_numeric(path.index(index), raw))
            })
            .collect()
    }

    fn selection(
        &self,
        shape: &Shape,
        value: &Value,
        path: &FieldPath,
    ) -> Result<Payload, Rejection> {
        let items = expect_non_empty(shape, value, path)?;
        let mut options = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = path.index(index);
            let Some(map) = item.as_object() else {
                let found = type_name(item);
                let message = format!("expected an option map, found {found}");
                return Err(Rejection::shape(&item_path, message));
            };
            let Some(raw_percent) = map.get("percent") else {
                let missing = vec!["percent".to_string()];
                return Err(Rejection::missing(&item_path, missing));
            };
            let selected = match map.get("selected") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(flag)) => *flag,
                Some(other) => {
                    let message = format!("expected a boolean, found {}", type_name(other));
                    return Err(Rejection::shape(&item_path.key("selected"), message));
                }
            };
            let percent = self
                .coercion
                .coerce(raw_percent)
                .ok_or_else(|| Rejection::non_numeric(item_path.key("percent"), raw_percent))?;
            options.push(SelectionOption { selected, percent });
        }
        if !options.iter().any(|option| option.selected) {
            let message = "expected at least one selected option";
            return Err(Rejection::shape(path, message));
        }
        Ok(Payload::Selection(options))
    }

    fn one_of(
        &self,
        shape: &Shape,
        alternatives: &[Shape],
        value: &Value,
        path: &FieldPath,
    ) -> Result<Payload, Rejection> {
        let is_map = value.is_object();
        let mut first_rejection = None;
        for alternative in alternatives {
            if alternative.expects_map().is_some_and(|map| map != is_map) {
                continue;
            }
            match self.extract(alternative, value, path) {
                Ok(payload) => return Ok(payload),
                Err(rejection) => {
                    first_rejection.get_or_insert(rejection);
                }
            }
        }
        Err(first_rejection.unwrap_or_else(|| unexpected(shape, value, path)))
    }

    fn sections(
        &self,
        shape: &Shape,
        sections: &[(&'static str, Shape)],
        value: &Value,
        path: &FieldPath,
    ) -> Result<Payload, Rejection> {
        let Some(map) = value.as_object() else {
            return Err(unexpected(shape, value, path));
        };

        let names: Vec<&str> = sections.iter().map(|(name, _)| *name).collect();
        let missing = missing_keys(&names, map);
        if !missing.is_empty() {
            return Err(Rejection::missing(path, missing));
        }

        let mut extracted = BTreeMap::new();
        for (name, section_shape) in sections {
            // Presence was checked above.
            if let Some(section) = map.get(*name) {
                let payload = self.extract(section_shape, section, &path.key(*name))?;
                extracted.insert((*name).to_string(), payload);
            }
        }
        Ok(Payload::Sections(extracted))
    }
}

fn missing_keys(fields: &[&str], map: &Map<String, Value>) -> Vec<String> {
    fields
        .iter()
        .filter(|field| !map.contains_key(**field))
        .map(|field| (*field).to_string())
        .collect()
}

fn unexpected(shape: &Shape, value: &Value, path: &FieldPath) -> Rejection {
    let message = format!("expected {}, found {}", shape.describe(), type_name(value));
    Rejection::shape(path, message)
}

fn expect_list<'a>(
    shape: &Shape,
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a [Value], Rejection> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| unexpected(shape, value, path))
}

fn expect_non_empty<'a>(
    shape: &Shape,
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a [Value], Rejection> {
    let items = expect_list(shape, value, path)?;
    if items.is_empty() {
        let message = format!("expected {}, found an empty list", shape.describe());
        return Err(Rejection::shape(path, message));
    }
    Ok(items)
}
