pub mod analytics;
pub mod assembler;
pub mod catalog;
pub mod features;
pub mod recommendations;
pub mod scoring;
pub mod selector;
pub mod training;

pub use analytics::{AnalyticsStore, InMemoryAnalytics};
pub use catalog::Catalog;
pub use recommendations::RecommendationEngine;
