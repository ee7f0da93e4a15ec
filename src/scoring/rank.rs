//! Relative classification of a batch of questions.
//!
//! Instead of fixed cut points, each question is placed by its position
//! among the batch sorted by raw score. Position `p` (0-based) of `n`
//! receives the fraction `round((p + 1) / n * 5) / 5`; questions at or
//! above the ceiling always get `5/5`, and a question scoring exactly the
//! same as its sorted predecessor inherits the predecessor's fraction so
//! equal inputs never disagree.

use crate::core::{MetricResult, Threshold};
use crate::errors::MetricError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Bucket count used by every ranked metric.
pub const RANK_BUCKETS: u32 = 5;

/// Raw score at which a question is forced into the top bucket.
pub const RANK_CEILING: f64 = 0.95;

/// A `k/n` position label such as `4/5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankFraction {
    numerator: u32,
    denominator: u32,
}

impl RankFraction {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator: numerator.min(denominator),
            denominator,
        }
    }

    pub fn top(denominator: u32) -> Self {
        Self::new(denominator, denominator)
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// The top two buckets are positive, the middle one neutral.
    pub fn threshold(&self) -> Threshold {
        let from_top = self.denominator - self.numerator;
        match from_top {
            0 | 1 => Threshold::Positive,
            2 => Threshold::Neutral,
            _ => Threshold::Negative,
        }
    }
}

impl fmt::Display for RankFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl Serialize for RankFraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One question of a ranked batch, in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedQuestion {
    /// Position in the caller's batch.
    pub index: usize,
    pub raw_score: f64,
    pub fraction: RankFraction,
    pub selected: bool,
}

/// What the sorted position is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDenominator {
    /// Number of questions in the batch.
    BatchSize,
    /// A fixed count regardless of batch size.
    Fixed(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankClassifier {
    buckets: u32,
    ceiling: f64,
    denominator: RankDenominator,
}

impl Default for RankClassifier {
    fn default() -> Self {
        Self {
            buckets: RANK_BUCKETS,
            ceiling: RANK_CEILING,
            denominator: RankDenominator::BatchSize,
        }
    }
}

impl RankClassifier {
    pub fn new(buckets: u32, ceiling: f64, denominator: RankDenominator) -> Self {
        Self {
            buckets,
            ceiling,
            denominator,
        }
    }

    pub fn with_denominator(mut self, denominator: RankDenominator) -> Self {
        self.denominator = denominator;
        self
    }

    /// Rank every score, returning questions in ascending score order.
    pub fn rank(&self, scores: &[f64], selected_index: Option<usize>) -> Vec<RankedQuestion> {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable: equal scores keep batch order.
        order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

        let count = match self.denominator {
            RankDenominator::BatchSize => scores.len(),
            RankDenominator::Fixed(count) => count,
        };
        let divisor = count as f64;

        let mut ranked: Vec<RankedQuestion> = Vec::with_capacity(scores.len());
        for (position, &index) in order.iter().enumerate() {
            let raw_score = scores[index];
            let tied = ranked.last().filter(|last| last.raw_score == raw_score);
            let fraction = if raw_score >= self.ceiling {
                RankFraction::top(self.buckets)
            } else if let Some(previous) = tied {
                previous.fraction
            } else {
                self.positional_fraction(position, divisor)
            };
            ranked.push(RankedQuestion {
                index,
                raw_score,
                fraction,
                selected: selected_index == Some(index),
            });
        }
        ranked
    }

    fn positional_fraction(&self, position: usize, divisor: f64) -> RankFraction {
        let share = if divisor > 0.0 {
            (position + 1) as f64 / divisor
        } else {
            1.0
        };
        let buckets = f64::from(self.buckets);
        let numerator = (share * buckets).round().clamp(0.0, buckets);
        RankFraction::new(numerator as u32, self.buckets)
    }

    /// Classify the question at `selected_index` relative to the batch.
    pub fn classify(
        &self,
        scores: &[f64],
        selected_index: usize,
    ) -> Result<MetricResult, MetricError> {
        if selected_index >= scores.len() {
            return Err(MetricError::SelectedIndexOutOfRange {
                index: selected_index,
                len: scores.len(),
            });
        }
        self.rank(scores, Some(selected_index))
            .into_iter()
            .find(|question| question.selected)
            .map(|question| {
                MetricResult::new(
                    question.raw_score,
                    question.fraction.threshold(),
                    question.fraction.to_string(),
                )
            })
            .ok_or(MetricError::SelectedIndexOutOfRange {
                index: selected_index,
                len: scores.len(),
            })
    }
}
