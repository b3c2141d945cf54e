use crate::analysis::synthetic::{self, SyntheticMode};
use crate::models::record::{DatedIssue, IssueTypeRecord, RawIssueRecord, Severity, SummaryRecord};
use crate::models::state::{DashboardState, DataMode, Dataset};
use chrono::{NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Header-row CSV split. Deliberately no quoting/escaping support: fields
/// containing commas are not supported by the upstream exports. Short rows
/// yield empty cells, surplus cells are dropped, every value is trimmed.
pub fn parse_csv(text: &str) -> Vec<HashMap<String, String>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => header_line.split(',').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let values: Vec<&str> = line.split(',').collect();
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = values.get(i).map(|v| v.trim()).unwrap_or("");
                    (header.clone(), value.to_string())
                })
                .collect()
        })
        .collect()
}

fn cell<'a>(row: &'a HashMap<String, String>, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

fn required_f64(row: &HashMap<String, String>, name: &str, line: usize) -> Result<f64, String> {
    let raw = cell(row, name);
    raw.parse::<f64>()
        .map_err(|_| format!("Row {line}: invalid {name} '{raw}'"))
}

fn required_u64(row: &HashMap<String, String>, name: &str, line: usize) -> Result<u64, String> {
    let raw = cell(row, name);
    raw.parse::<u64>()
        .map_err(|_| format!("Row {line}: invalid {name} '{raw}'"))
}

fn required_date(row: &HashMap<String, String>, name: &str, line: usize) -> Result<NaiveDate, String> {
    let raw = cell(row, name);
    let date_part = raw.split_whitespace().next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| format!("Row {line}: invalid {name} '{raw}'"))
}

/// Reference table: `Category,Subcategory,Effort_Per_Issue,Impact_Per_Day`.
pub fn parse_types_csv(text: &str) -> Result<Vec<IssueTypeRecord>, String> {
    parse_csv(text)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(IssueTypeRecord {
                category: cell(row, "Category").to_string(),
                subcategory: cell(row, "Subcategory").to_string(),
                effort_per_issue: required_f64(row, "Effort_Per_Issue", i + 2)?,
                impact_per_day: required_f64(row, "Impact_Per_Day", i + 2)?,
            })
        })
        .collect()
}

/// Time-series summary: `Date,Category,Subcategory,Count,Days_To_Fix`.
pub fn parse_summary_csv(text: &str) -> Result<Vec<SummaryRecord>, String> {
    parse_csv(text)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(SummaryRecord {
                date: required_date(row, "Date", i + 2)?,
                category: cell(row, "Category").to_string(),
                subcategory: cell(row, "Subcategory").to_string(),
                count: required_u64(row, "Count", i + 2)?,
                days_to_fix: required_f64(row, "Days_To_Fix", i + 2)?,
            })
        })
        .collect()
}

/// Per-issue ticket export. The open timestamp must parse; everything else
/// falls back the way the upstream export demands (unnamed categories become
/// "Unknown", missing impact defaults to 1000 USD/day, missing resolve time
/// to 24 hours).
pub fn parse_issues_csv(text: &str) -> Result<Vec<DatedIssue>, String> {
    parse_csv(text)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let date = required_date(row, "created_time", i + 2)?;

            let category = match cell(row, "category") {
                "" => "Unknown".to_string(),
                name => name.to_string(),
            };
            let subcategory = match cell(row, "sub_category") {
                "" => None,
                name => Some(name.to_string()),
            };
            let business_impact = cell(row, "est_per_day_cost_usd")
                .parse::<f64>()
                .unwrap_or(1000.0);
            let avg_resolve_time = resolve_hours(row);
            let severity =
                Severity::from_label(cell(row, "severity")).unwrap_or(Severity::Medium);
            let request_id = match cell(row, "RequestID") {
                "" => None,
                id => Some(id.to_string()),
            };
            let status = match cell(row, "request_status") {
                "" => None,
                status => Some(status.to_string()),
            };

            Ok(DatedIssue {
                date,
                record: RawIssueRecord {
                    category,
                    subcategory,
                    num_issues: 1,
                    business_impact,
                    avg_resolve_time,
                    severity,
                    request_id,
                    status,
                },
            })
        })
        .collect()
}

/// Resolve time in hours: the open→close timestamp delta when both parse,
/// then the exported `resolution_hours` column, then 24.
fn resolve_hours(row: &HashMap<String, String>) -> f64 {
    let fallback = cell(row, "resolution_hours").parse::<f64>().unwrap_or(24.0);

    let resolved = cell(row, "resolved_time");
    if resolved.is_empty() {
        return fallback;
    }

    match (parse_timestamp(cell(row, "created_time")), parse_timestamp(resolved)) {
        (Some(created), Some(resolved)) => {
            let minutes = (resolved - created).num_minutes().abs() as f64;
            minutes / 60.0
        }
        _ => fallback,
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S").ok()
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sub_category: Option<String>,
    #[serde(rename = "# of issues", default)]
    num_issues: Option<f64>,
    #[serde(rename = "est per-day business impact (USD)", default)]
    business_impact: Option<f64>,
    #[serde(rename = "avg time to resolve (hours)", default)]
    avg_resolve_time: Option<f64>,
    #[serde(default)]
    severity_mode: Option<String>,
}

/// Pre-extracted workbook JSON, keyed by sheet name. Nulls in the sheet rows
/// default to zero / Low, matching the extraction script's output.
pub fn parse_sheet_json(text: &str, sheet: &str) -> Result<Vec<RawIssueRecord>, String> {
    let mut sheets: HashMap<String, Vec<SheetRow>> =
        serde_json::from_str(text).map_err(|e| format!("Invalid workbook JSON: {e}"))?;

    let rows = sheets
        .remove(sheet)
        .ok_or_else(|| format!("Workbook JSON has no '{sheet}' sheet"))?;

    Ok(rows
        .into_iter()
        .map(|row| RawIssueRecord {
            category: row.category.filter(|c| !c.is_empty()).unwrap_or_else(|| "Unknown".to_string()),
            subcategory: row.sub_category.filter(|s| !s.is_empty()),
            num_issues: row.num_issues.unwrap_or(0.0).max(0.0).round() as u64,
            business_impact: row.business_impact.unwrap_or(0.0),
            avg_resolve_time: row.avg_resolve_time.unwrap_or(0.0),
            severity: row
                .severity_mode
                .as_deref()
                .and_then(Severity::from_label)
                .unwrap_or(Severity::Low),
            request_id: None,
            status: None,
        })
        .collect())
}

pub fn load_types_csv(path: &Path) -> Result<Vec<IssueTypeRecord>, String> {
    let text = read_input(path)?;
    parse_types_csv(&text).map_err(|e| format!("{}: {e}", path.display()))
}

pub fn load_summary_csv(path: &Path) -> Result<Vec<SummaryRecord>, String> {
    let text = read_input(path)?;
    parse_summary_csv(&text).map_err(|e| format!("{}: {e}", path.display()))
}

pub fn load_issues_csv(path: &Path) -> Result<Vec<DatedIssue>, String> {
    let text = read_input(path)?;
    parse_issues_csv(&text).map_err(|e| format!("{}: {e}", path.display()))
}

pub fn load_sheet_json(path: &Path, sheet: &str) -> Result<Vec<RawIssueRecord>, String> {
    let text = read_input(path)?;
    parse_sheet_json(&text, sheet).map_err(|e| format!("{}: {e}", path.display()))
}

fn read_input(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Load a data directory into a fresh state object: `config.json` is
/// required, the data files load when present. The caller surfaces any error
/// as a visible failure instead of a partially built chart.
pub fn open_data_dir(dir: &Path) -> Result<DashboardState, String> {
    let config = crate::commands::config::load_config(&dir.join("config.json"))?;
    let mut state = DashboardState::with_config(config);

    let types_path = dir.join("types.csv");
    let summary_path = dir.join("summary.csv");
    if types_path.exists() || summary_path.exists() {
        state.types = load_types_csv(&types_path)?;
        state.summary = load_summary_csv(&summary_path)?;
        log::info!(
            "Loaded {} type definitions and {} summary records",
            state.types.len(),
            state.summary.len()
        );
    }

    let issues_path = dir.join(&state.config.data_source.file_name);
    if issues_path.exists() {
        state.issues = load_issues_csv(&issues_path)?;
        log::info!("Loaded {} issue rows from {}", state.issues.len(), issues_path.display());
    }

    let sheet_path = dir.join("excel_data.json");
    if sheet_path.exists() {
        state.sheet_rows = load_sheet_json(&sheet_path, "Summary")?;
        log::info!("Loaded {} workbook summary rows", state.sheet_rows.len());
    }

    refresh_available_dates(&mut state);
    Ok(state)
}

/// Rebuild the slider date axis for the current mode and reset the window:
/// the aggregated view opens on the full range, the per-issue view on the
/// first 31 days.
pub fn refresh_available_dates(state: &mut DashboardState) {
    let mut dates: Vec<NaiveDate> = match state.mode {
        DataMode::Aggregated => state.summary.iter().map(|r| r.date).collect(),
        _ => state.issues.iter().map(|i| i.date).collect(),
    };
    dates.sort_unstable();
    dates.dedup();

    state.available_dates = dates;
    state.start_index = 0;
    state.end_index = match state.mode {
        DataMode::Aggregated => state.max_date_index(),
        _ => state.max_date_index().min(30),
    };
}

/// Slider input: indices swap when dragged past each other, then clamp.
pub fn set_date_range(state: &mut DashboardState, start_index: usize, end_index: usize) {
    let max = state.max_date_index();
    let (mut start, mut end) = (start_index, end_index);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    state.start_index = start.min(max);
    state.end_index = end.min(max);
}

pub fn set_mode(state: &mut DashboardState, mode: DataMode) {
    if state.mode != mode {
        state.mode = mode;
        state.expanded = None;
        refresh_available_dates(state);
    }
}

pub fn set_sample_size(state: &mut DashboardState, sample_size: usize) {
    state.sample_size = sample_size.max(1);
}

/// Shuffle-and-truncate sampling of the dated per-issue rows inside the
/// current window.
pub fn sample_real_data(
    issues: &[DatedIssue],
    start: NaiveDate,
    end: NaiveDate,
    sample_size: usize,
    rng: &mut impl Rng,
) -> Vec<RawIssueRecord> {
    let mut selected: Vec<RawIssueRecord> = issues
        .iter()
        .filter(|issue| issue.date >= start && issue.date <= end)
        .map(|issue| issue.record.clone())
        .collect();
    selected.shuffle(rng);
    selected.truncate(sample_size);
    selected
}

/// Rebuild the current dataset from the current parameters. Called after
/// every parameter change; the previous dataset is discarded wholesale.
pub fn regenerate(state: &mut DashboardState, rng: &mut impl Rng) -> Result<(), String> {
    state.dataset = match state.mode {
        DataMode::Aggregated => {
            let subcategories = match state.date_window() {
                Some((start, end)) => {
                    crate::analysis::aggregate::aggregate_period(
                        &state.summary,
                        &state.types,
                        start,
                        end,
                    )?
                }
                None => Vec::new(),
            };
            Dataset::Bubbles(crate::analysis::aggregate::rollup_by_category(&subcategories))
        }
        DataMode::Real => {
            if !state.issues.is_empty() {
                let (start, end) = state
                    .date_window()
                    .ok_or_else(|| "No dates available for the loaded issues".to_string())?;
                Dataset::Issues(sample_real_data(
                    &state.issues,
                    start,
                    end,
                    state.sample_size,
                    rng,
                ))
            } else if !state.sheet_rows.is_empty() {
                let mut rows = state.sheet_rows.clone();
                rows.shuffle(rng);
                rows.truncate(state.sample_size);
                Dataset::Issues(rows)
            } else {
                log::warn!("No real data loaded; falling back to baseline synthetic data");
                Dataset::Issues(generate_synthetic(state, SyntheticMode::Baseline, rng)?)
            }
        }
        DataMode::Baseline => Dataset::Issues(generate_synthetic(state, SyntheticMode::Baseline, rng)?),
        DataMode::Enhanced => Dataset::Issues(generate_synthetic(state, SyntheticMode::Enhanced, rng)?),
    };
    Ok(())
}

fn generate_synthetic(
    state: &DashboardState,
    mode: SyntheticMode,
    rng: &mut impl Rng,
) -> Result<Vec<RawIssueRecord>, String> {
    let pool = category_pool(state);
    synthetic::generate(
        mode,
        state.sample_size,
        &pool,
        &state.config.severity_tiers,
        rng,
    )
}

/// Category pool for the generator: categories seen in the loaded data when
/// any exists, otherwise the configured defaults.
fn category_pool(state: &DashboardState) -> Vec<String> {
    let mut pool: Vec<String> = Vec::new();
    let loaded = state
        .issues
        .iter()
        .map(|issue| issue.record.category.as_str())
        .chain(state.sheet_rows.iter().map(|row| row.category.as_str()));

    for category in loaded {
        if !category.is_empty() && !pool.iter().any(|c| c == category) {
            pool.push(category.to_string());
        }
    }

    if pool.is_empty() {
        pool = state.config.default_categories.clone();
    }
    pool
}
