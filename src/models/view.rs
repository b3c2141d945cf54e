use crate::models::record::Severity;
use serde::{Deserialize, Serialize};

/// Immutable chart snapshot handed to the renderer. Rebuilt from scratch on
/// every state change; the renderer never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartView {
    pub title: String,
    pub date_range: String,
    pub width: f64,
    pub height: f64,
    pub x_axis: AxisView,
    pub y_axis: AxisView,
    pub bubbles: Vec<PlottedBubble>,
    pub legend: Vec<LegendEntry>,
    pub severity_legend: Vec<SeverityLegendEntry>,
    pub stats: Option<DatasetStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisView {
    pub label: String,
    pub domain: [f64; 2],
}

/// One marker, fully placed and styled in pixel space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlottedBubble {
    pub key: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill: String,
    pub stroke: Option<String>,
    pub opacity: f64,
    /// Category-summary bubbles expand into their subcategories on click.
    pub expandable: bool,
    pub tooltip: TooltipView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipView {
    pub heading: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityLegendEntry {
    pub severity: Severity,
    pub color: String,
    pub daily_impact: f64,
}

/// Numbers behind the stat cards above the chart. Absent for the aggregated
/// quadrant view, which has no stats panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_issues: u64,
    pub total_impact: f64,
    pub avg_resolve_time: f64,
    pub high_severity_count: usize,
    pub group_count: usize,
}
