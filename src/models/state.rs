use crate::models::bubble::CategoryBubble;
use crate::models::config::DashboardConfig;
use crate::models::record::{DatedIssue, IssueTypeRecord, RawIssueRecord, SummaryRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Sampled rows from the loaded per-issue export (or the sheet JSON).
    Real,
    /// Synthetic data, volume-proportional impact model.
    Baseline,
    /// Synthetic data, severity-anchored log-scaled model.
    Enhanced,
    /// Reference-table aggregation of the time-series summary, with drill-down.
    Aggregated,
}

/// The dataset currently on screen. Regenerated whole on every parameter
/// change and replaced, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Dataset {
    Bubbles(Vec<CategoryBubble>),
    Issues(Vec<RawIssueRecord>),
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        match self {
            Dataset::Bubbles(bubbles) => bubbles.is_empty(),
            Dataset::Issues(records) => records.is_empty(),
        }
    }

    /// Unique category names in the dataset, sorted.
    pub fn unique_categories(&self) -> Vec<String> {
        let names: BTreeSet<&str> = match self {
            Dataset::Bubbles(bubbles) => bubbles.iter().map(|b| b.category.as_str()).collect(),
            Dataset::Issues(records) => records.iter().map(|r| r.category.as_str()).collect(),
        };
        names.into_iter().map(|s| s.to_string()).collect()
    }
}

/// Active category filter. Empty means "no filter, show all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    active: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether a category should render at full strength.
    pub fn shows(&self, category: &str) -> bool {
        self.active.is_empty() || self.active.contains(category)
    }

    /// Add if absent, remove if present. Selecting every category is the same
    /// as selecting none, so a full set collapses back to empty.
    pub fn toggle(&mut self, category: &str, all_categories: &[String]) {
        if !self.active.remove(category) {
            self.active.insert(category.to_string());
        }

        if !all_categories.is_empty()
            && self.active.len() == all_categories.len()
            && all_categories.iter().all(|c| self.active.contains(c))
        {
            self.active.clear();
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Play/pause state for the date-window animation. The cadence belongs to the
/// external timer; each tick advances the window by `step` date indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playback {
    pub playing: bool,
    pub step: usize,
}

impl Default for Playback {
    fn default() -> Self {
        Playback {
            playing: false,
            step: 10,
        }
    }
}

/// The single explicit application-state object. Every interaction operation
/// takes `&mut DashboardState`; there are no module-level globals.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub config: DashboardConfig,
    pub types: Vec<IssueTypeRecord>,
    pub summary: Vec<SummaryRecord>,
    pub issues: Vec<DatedIssue>,
    pub sheet_rows: Vec<RawIssueRecord>,
    pub available_dates: Vec<NaiveDate>,
    pub start_index: usize,
    pub end_index: usize,
    pub mode: DataMode,
    pub sample_size: usize,
    pub dataset: Dataset,
    pub filter: CategoryFilter,
    pub expanded: Option<String>,
    pub playback: Playback,
}

impl DashboardState {
    pub fn with_config(config: DashboardConfig) -> Self {
        DashboardState {
            config,
            types: Vec::new(),
            summary: Vec::new(),
            issues: Vec::new(),
            sheet_rows: Vec::new(),
            available_dates: Vec::new(),
            start_index: 0,
            end_index: 0,
            mode: DataMode::Real,
            sample_size: 100,
            dataset: Dataset::Issues(Vec::new()),
            filter: CategoryFilter::default(),
            expanded: None,
            playback: Playback::default(),
        }
    }

    /// The date window currently selected by the sliders, if any dates exist.
    pub fn date_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.available_dates.get(self.start_index)?;
        let end = self.available_dates.get(self.end_index)?;
        Some((*start, *end))
    }

    pub fn max_date_index(&self) -> usize {
        self.available_dates.len().saturating_sub(1)
    }
}
