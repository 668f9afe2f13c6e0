use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recorded analytics event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsRecord {
    pub timestamp: DateTime<Utc>,
    pub event_type: Option<String>,
    #[serde(default)]
    pub user_data: Map<String, Value>,
    #[serde(default)]
    pub recommendation_data: Map<String, Value>,
}

impl AnalyticsRecord {
    /// Category attached to the event, if it carries one
    pub fn category(&self) -> Option<&str> {
        self.recommendation_data.get("category").and_then(Value::as_str)
    }
}

/// Body accepted by the track endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TrackEventRequest {
    pub event_type: Option<String>,
    #[serde(default)]
    pub user_data: Map<String, Value>,
    #[serde(default)]
    pub recommendation_data: Map<String, Value>,
}

/// Event counts bucketed by hour of day (UTC)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeOfDayCounts {
    pub morning: usize,
    pub afternoon: usize,
    pub evening: usize,
    pub night: usize,
}

impl TimeOfDayCounts {
    pub fn record_hour(&mut self, hour: u32) {
        match hour {
            6..=11 => self.morning += 1,
            12..=16 => self.afternoon += 1,
            17..=21 => self.evening += 1,
            _ => self.night += 1,
        }
    }
}

/// A category and how often it was recommended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_recommendations: usize,
    pub popular_categories: Vec<CategoryCount>,
    pub time_based_analysis: TimeOfDayCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hour_buckets() {
        let mut counts = TimeOfDayCounts::default();
        for hour in [5, 6, 11, 12, 16, 17, 21, 22, 0] {
            counts.record_hour(hour);
        }
        assert_eq!(
            counts,
            TimeOfDayCounts {
                morning: 2,
                afternoon: 2,
                evening: 2,
                night: 3,
            }
        );
    }

    #[test]
    fn test_category_requires_string() {
        let mut record = AnalyticsRecord {
            timestamp: Utc::now(),
            event_type: Some("click".to_string()),
            user_data: Map::new(),
            recommendation_data: Map::new(),
        };
        assert_eq!(record.category(), None);

        record
            .recommendation_data
            .insert("category".to_string(), json!(3));
        assert_eq!(record.category(), None);

        record
            .recommendation_data
            .insert("category".to_string(), json!("Math_Basic"));
        assert_eq!(record.category(), Some("Math_Basic"));
    }
}
