//! Value types shared by every metric.

mod clicks;
mod payload;
mod result;

pub use clicks::{ClickData, EngagementCounts};
pub use payload::{lexical_integer, Choices, Coercion, Payload, SelectionOption};
pub use result::{Breakdown, MetricResult, Threshold};
