pub mod formulas;
pub mod rank;

pub use formulas::{
    bucket_sum, hundred_point_scale, mean, ordinal_mean, ordinal_weighted_sum, polarity_ratio,
    promoter_detractor, safe_divide, signed_sum, weighted_sum,
};
pub use rank::{RankClassifier, RankDenominator, RankFraction, RankedQuestion};

use crate::core::Breakdown;

/// Output of a formula, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Scored {
    /// One score, optionally with the named components it was built from.
    Scalar { score: f64, components: Breakdown },
    /// One raw score per question of a batch, in batch order.
    Batch(Vec<f64>),
}

impl Scored {
    pub fn scalar(score: f64) -> Self {
        Scored::Scalar {
            score,
            components: Breakdown::new(),
        }
    }

    pub fn with_components<'a>(
        score: f64,
        components: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Scored::Scalar {
            score,
            components: components
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scored::Scalar { .. } => "a scalar score",
            Scored::Batch(_) => "a batch of scores",
        }
    }

    /// Named sub-scores; empty for batches and plain scalars.
    pub fn breakdown(&self) -> Breakdown {
        match self {
            Scored::Scalar { components, .. } => components.clone(),
            Scored::Batch(_) => Breakdown::new(),
        }
    }
}
