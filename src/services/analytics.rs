use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use tokio::sync::RwLock;

use crate::models::{
    AnalyticsRecord, AnalyticsSummary, CategoryCount, TimeOfDayCounts, TrackEventRequest,
};

/// Number of categories reported in a summary
const POPULAR_CATEGORY_LIMIT: usize = 5;

/// Sink for analytics events.
///
/// Only consumes what the engine produced; nothing here feeds back into
/// scoring.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Records an event stamped with the given time
    async fn track_at(&self, event: TrackEventRequest, at: DateTime<Utc>);

    async fn summary(&self) -> AnalyticsSummary;

    /// Records an event stamped with the current time
    async fn track(&self, event: TrackEventRequest) {
        self.track_at(event, Utc::now()).await
    }
}

/// Bounded in-memory store; the oldest record is evicted when full
pub struct InMemoryAnalytics {
    records: RwLock<VecDeque<AnalyticsRecord>>,
    capacity: usize,
}

impl InMemoryAnalytics {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl AnalyticsStore for InMemoryAnalytics {
    async fn track_at(&self, event: TrackEventRequest, at: DateTime<Utc>) {
        let record = AnalyticsRecord {
            timestamp: at,
            event_type: event.event_type,
            user_data: event.user_data,
            recommendation_data: event.recommendation_data,
        };

        let mut records = self.records.write().await;
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        tracing::debug!(stored = records.len(), "Analytics event tracked");
    }

    async fn summary(&self) -> AnalyticsSummary {
        let records = self.records.read().await;
        summarize(records.iter())
    }
}

/// Totals, top categories and time-of-day distribution for a set of records
pub fn summarize<'a>(records: impl Iterator<Item = &'a AnalyticsRecord>) -> AnalyticsSummary {
    let mut total = 0;
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut time_based_analysis = TimeOfDayCounts::default();

    for record in records {
        total += 1;
        time_based_analysis.record_hour(record.timestamp.hour());

        if let Some(category) = record.category() {
            match counts.iter_mut().find(|c| c.category == category) {
                Some(existing) => existing.count += 1,
                None => counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                }),
            }
        }
    }

    // stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(POPULAR_CATEGORY_LIMIT);

    AnalyticsSummary {
        total_recommendations: total,
        popular_categories: counts,
        time_based_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{Map, Value};

    fn event(category: Option<&str>) -> TrackEventRequest {
        let mut recommendation_data = Map::new();
        if let Some(category) = category {
            recommendation_data.insert("category".to_string(), Value::from(category));
        }
        TrackEventRequest {
            event_type: Some("recommendation_clicked".to_string()),
            user_data: Map::new(),
            recommendation_data,
        }
    }

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 15, 0).unwrap()
    }

    #[tokio::test]
    async fn test_summary_counts_and_buckets() {
        let store = InMemoryAnalytics::new(100);
        store.track_at(event(Some("Math_Basic")), at_hour(8)).await;
        store.track_at(event(Some("General_Studies")), at_hour(13)).await;
        store.track_at(event(Some("Math_Basic")), at_hour(18)).await;
        store.track_at(event(None), at_hour(23)).await;

        let summary = store.summary().await;
        assert_eq!(summary.total_recommendations, 4);
        assert_eq!(
            summary.popular_categories,
            vec![
                CategoryCount {
                    category: "Math_Basic".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "General_Studies".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            summary.time_based_analysis,
            TimeOfDayCounts {
                morning: 1,
                afternoon: 1,
                evening: 1,
                night: 1,
            }
        );
    }

    #[test]
    fn test_popular_categories_capped_at_five() {
        let store = InMemoryAnalytics::new(100);
        tokio_test::block_on(async {
            for name in ["A", "B", "C", "D", "E", "F", "F"] {
                store.track_at(event(Some(name)), at_hour(9)).await;
            }
        });

        let summary = tokio_test::block_on(store.summary());
        let names: Vec<&str> = summary
            .popular_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["F", "A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let store = InMemoryAnalytics::new(2);
        store.track_at(event(Some("Math_Basic")), at_hour(7)).await;
        store.track_at(event(Some("Science_Basic")), at_hour(7)).await;
        store.track_at(event(Some("General_Studies")), at_hour(7)).await;

        let summary = store.summary().await;
        assert_eq!(summary.total_recommendations, 2);
        assert!(summary
            .popular_categories
            .iter()
            .all(|c| c.category != "Math_Basic"));
    }
}
