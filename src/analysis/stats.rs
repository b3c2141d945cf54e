use crate::models::record::{RawIssueRecord, Severity};
use crate::models::view::DatasetStats;

/// Stat-card numbers for an issue-record dataset. An empty dataset produces
/// zeroed cards, not an error.
pub fn dataset_stats(records: &[RawIssueRecord]) -> DatasetStats {
    let total_issues: u64 = records.iter().map(|r| r.num_issues).sum();
    let total_impact: f64 = records.iter().map(|r| r.business_impact).sum();
    let avg_resolve_time = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.avg_resolve_time).sum::<f64>() / records.len() as f64
    };
    let high_severity_count = records.iter().filter(|r| r.severity == Severity::High).count();

    DatasetStats {
        total_issues,
        total_impact,
        avg_resolve_time,
        high_severity_count,
        group_count: records.len(),
    }
}
