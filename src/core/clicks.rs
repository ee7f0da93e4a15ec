use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single recorded click on a first-click test.
///
/// `hotspot` is the index of the target area hit, or `-1` when the
/// click landed outside every hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickData {
    pub x_pos: f64,
    pub y_pos: f64,
    pub hotspot: i32,
}

impl ClickData {
    pub fn new(x_pos: f64, y_pos: f64, hotspot: i32) -> Self {
        Self {
            x_pos,
            y_pos,
            hotspot,
        }
    }

    pub fn in_hotspot(&self) -> bool {
        self.hotspot > -1
    }
}

/// Click tallies consumed by the `engagement` metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub primary_clicks_count: u64,
    pub secondary_clicks_count: u64,
    pub tertiary_clicks_count: u64,
    pub total_clicks_count: u64,
}

impl EngagementCounts {
    /// Tally hotspots 0, 1 and 2 as primary, secondary and tertiary.
    /// Every click counts towards the total.
    pub fn from_clicks(clicks: &[ClickData]) -> Self {
        clicks.iter().fold(Self::default(), |mut counts, click| {
            match click.hotspot {
                0 => counts.primary_clicks_count += 1,
                1 => counts.secondary_clicks_count += 1,
                2 => counts.tertiary_clicks_count += 1,
                _ => {}
            }
            counts.total_clicks_count += 1;
            counts
        })
    }

    /// Render as an `engagement` payload.
    pub fn to_payload(&self) -> Value {
        json!({
            "primary_clicks_count": self.primary_clicks_count,
            "secondary_clicks_count": self.secondary_clicks_count,
            "tertiary_clicks_count": self.tertiary_clicks_count,
            "total_clicks_count": self.total_clicks_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotspot_membership() {
        assert!(ClickData::new(1.0, 2.0, 0).in_hotspot());
        assert!(!ClickData::new(1.0, 2.0, -1).in_hotspot());
    }

    #[test]
    fn counts_tally_first_three_hotspots() {
        let clicks = [
            ClickData::new(0.0, 0.0, 0),
            ClickData::new(0.0, 0.0, 0),
            ClickData::new(0.0, 0.0, 1),
            ClickData::new(0.0, 0.0, 2),
            ClickData::new(0.0, 0.0, 3),
            ClickData::new(0.0, 0.0, -1),
        ];
        let counts = EngagementCounts::from_clicks(&clicks);
        assert_eq!(
            counts,
            EngagementCounts {
                primary_clicks_count: 2,
                secondary_clicks_count: 1,
                tertiary_clicks_count: 1,
                total_clicks_count: 6,
            }
        );
        assert_eq!(counts.to_payload()["total_clicks_count"], 6);
    }
}
