use chrono::{NaiveDateTime, Utc};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::aggregation::aggregator::{AggregatedResult, AggregationStats};
use crate::aggregation::filter::FilteredViews;

/// Identity of one cleanup run, stamped on every report it writes.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupRun {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub description: Option<String>,
}

pub fn create_cleanup_run(description: Option<&str>) -> CleanupRun {
    let run = CleanupRun {
        run_id: Uuid::new_v4().to_string(),
        run_timestamp: Utc::now().naive_utc(),
        description: description.map(|s| s.to_string()),
    };
    info!("Created cleanup run with ID: {}", run.run_id);
    run
}

/// Everything written for one input file when filtered views are requested.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub run: CleanupRun,
    pub file_name: String,
    pub stats: AggregationStats,
    pub cleaned_data: AggregatedResult,
    #[serde(flatten)]
    pub views: FilteredViews,
}

impl CleanupReport {
    pub fn new(
        run: &CleanupRun,
        file_name: &str,
        stats: AggregationStats,
        cleaned_data: AggregatedResult,
    ) -> Self {
        let views = FilteredViews::from_aggregated(&cleaned_data);
        Self {
            run: run.clone(),
            file_name: file_name.to_string(),
            stats,
            cleaned_data,
            views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_carries_views() {
        let run = create_cleanup_run(Some("test"));
        assert!(Uuid::parse_str(&run.run_id).is_ok());

        let report = CleanupReport::new(&run, "loan.json", AggregationStats::default(), AggregatedResult::new());
        let value = serde_json::to_value(&report).unwrap();
        for key in ["run", "file_name", "stats", "cleaned_data", "filtered_data", "filtered_data_with_bs", "only_bs"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
