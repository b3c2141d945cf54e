use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Severity tiers as they appear in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_label(label: &str) -> Option<Severity> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// One row of the issue-type reference table: nominal effort/impact constants
/// per (category, subcategory). Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTypeRecord {
    pub category: String,
    pub subcategory: String,
    pub effort_per_issue: f64,
    pub impact_per_day: f64,
}

/// One observation bucket of the time-series summary export
/// (date × category × subcategory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub date: NaiveDate,
    pub category: String,
    pub subcategory: String,
    pub count: u64,
    pub days_to_fix: f64,
}

/// One sampled issue or issue-group, as produced by the per-issue CSV loader,
/// the sheet-JSON loader, and the synthetic generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssueRecord {
    pub category: String,
    pub subcategory: Option<String>,
    pub num_issues: u64,
    pub business_impact: f64,
    pub avg_resolve_time: f64,
    pub severity: Severity,
    pub request_id: Option<String>,
    pub status: Option<String>,
}

/// A raw issue paired with the calendar date it was opened on. Only the
/// per-issue CSV carries dates; the date drives the range sliders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatedIssue {
    pub date: NaiveDate,
    pub record: RawIssueRecord,
}
