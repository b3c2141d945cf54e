use crate::analysis::scale::{extent, LinearScale, OrdinalScale, SqrtScale};
use crate::analysis::stats::dataset_stats;
use crate::models::bubble::{Bubble, CategoryBubble, SubcategoryBubble};
use crate::models::record::RawIssueRecord;
use crate::models::state::{DashboardState, DataMode, Dataset};
use crate::models::view::{
    AxisView, ChartView, LegendEntry, PlottedBubble, SeverityLegendEntry, TooltipView,
};

const SCHEME_SET3: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

const SCHEME_CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Fill for categories dimmed out by the active filter.
const FILTERED_FILL: &str = "#cccccc";

fn palette(scheme: &str) -> &'static [&'static str] {
    match scheme {
        "category10" => &SCHEME_CATEGORY10,
        _ => &SCHEME_SET3,
    }
}

/// Pure `state → view` mapping. Every call produces a fresh snapshot; an
/// empty dataset produces an empty (not erroneous) view.
pub fn build_chart_view(state: &DashboardState) -> Result<ChartView, String> {
    let view = match &state.dataset {
        Dataset::Bubbles(rollups) => aggregated_view(state, rollups),
        Dataset::Issues(records) => issues_view(state, records),
    };
    log::debug!("Built chart view with {} bubbles", view.bubbles.len());
    Ok(view)
}

fn aggregated_view(state: &DashboardState, rollups: &[CategoryBubble]) -> ChartView {
    let chart = &state.config.chart;
    let x_scale = LinearScale::new(
        (chart.effort_domain[0], chart.effort_domain[1]),
        (0.0, chart.inner_width()),
    );
    let y_scale = LinearScale::new(
        (chart.impact_domain[0], chart.impact_domain[1]),
        (chart.inner_height(), 0.0),
    );
    let radius_scale = SqrtScale::new(
        (chart.count_domain[0], chart.count_domain[1]),
        (chart.min_radius, chart.max_radius),
    );

    // Drill-down swaps the visible set: one category expanded means its
    // subcategory breakdown replaces the category summaries.
    let visible: Vec<Bubble> = match state.expanded.as_deref() {
        Some(expanded) => rollups
            .iter()
            .find(|rollup| rollup.category == expanded)
            .map(|rollup| {
                rollup
                    .subcategories
                    .iter()
                    .cloned()
                    .map(Bubble::Subcategory)
                    .collect()
            })
            .unwrap_or_default(),
        None => rollups.iter().cloned().map(Bubble::Category).collect(),
    };

    let mut colors = OrdinalScale::new(palette(&chart.colors.scheme));
    let mut bubbles = Vec::with_capacity(visible.len());
    for item in &visible {
        let shown = state.filter.shows(item.category());
        let fill = bubble_fill(&mut colors, item.category(), shown);
        let radius = radius_scale.map(item.count() as f64);
        bubbles.push(match item {
            Bubble::Category(rollup) => {
                category_bubble(rollup, &x_scale, &y_scale, radius, fill, shown)
            }
            Bubble::Subcategory(sub) => {
                subcategory_bubble(sub, &x_scale, &y_scale, radius, fill, shown)
            }
        });
    }

    let date_range = match state.date_window() {
        Some((start, end)) => format!(
            "{} to {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        ),
        None => String::new(),
    };

    ChartView {
        title: title_for(state, &date_range),
        date_range,
        width: chart.inner_width(),
        height: chart.inner_height(),
        x_axis: AxisView {
            label: "Effort per Issue (USD)".to_string(),
            domain: [x_scale.domain.0, x_scale.domain.1],
        },
        y_axis: AxisView {
            label: "Impact per Day (USD)".to_string(),
            domain: [y_scale.domain.0, y_scale.domain.1],
        },
        legend: legend_for(state, &mut colors),
        severity_legend: severity_legend_for(state),
        stats: None,
        bubbles,
    }
}

fn category_bubble(
    rollup: &CategoryBubble,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    radius: f64,
    fill: String,
    shown: bool,
) -> PlottedBubble {
    let avg_effort = rollup.mean_effort_per_issue();
    let avg_impact = if rollup.count == 0 {
        0.0
    } else {
        rollup.total_impact / rollup.count as f64
    };

    PlottedBubble {
        key: rollup.category.clone(),
        category: rollup.category.clone(),
        subcategory: None,
        x: x_scale.map(avg_effort),
        y: y_scale.map(rollup.weighted_impact_per_day()),
        radius,
        fill,
        stroke: None,
        opacity: bubble_opacity(shown),
        expandable: true,
        tooltip: TooltipView {
            heading: rollup.category.clone(),
            fields: vec![
                ("Issues".to_string(), format_thousands(rollup.count)),
                ("Avg Effort".to_string(), format_usd(avg_effort)),
                ("Avg Impact".to_string(), format_usd(avg_impact)),
            ],
        },
    }
}

fn subcategory_bubble(
    sub: &SubcategoryBubble,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    radius: f64,
    fill: String,
    shown: bool,
) -> PlottedBubble {
    PlottedBubble {
        key: sub.subcategory.clone(),
        category: sub.category.clone(),
        subcategory: Some(sub.subcategory.clone()),
        x: x_scale.map(sub.effort_per_issue),
        y: y_scale.map(sub.impact_per_day),
        radius,
        fill,
        stroke: None,
        opacity: bubble_opacity(shown),
        expandable: false,
        tooltip: TooltipView {
            heading: sub.category.clone(),
            fields: vec![
                ("Subcategory".to_string(), sub.subcategory.clone()),
                ("Issues".to_string(), format_thousands(sub.count)),
                ("Effort per Issue".to_string(), format_usd(sub.effort_per_issue)),
                ("Impact per Day".to_string(), format_usd(sub.impact_per_day)),
            ],
        },
    }
}

fn issues_view(state: &DashboardState, records: &[RawIssueRecord]) -> ChartView {
    let chart = &state.config.chart;

    let x_domain = extent(records.iter().map(|r| r.avg_resolve_time)).unwrap_or((0.0, 0.0));
    let y_domain = extent(records.iter().map(|r| r.business_impact)).unwrap_or((0.0, 0.0));
    let r_domain = extent(records.iter().map(|r| r.num_issues as f64)).unwrap_or((0.0, 0.0));

    let x_scale = LinearScale::new(x_domain, (0.0, chart.inner_width())).nice();
    let y_scale = LinearScale::new(y_domain, (chart.inner_height(), 0.0)).nice();
    let radius_scale = SqrtScale::new(r_domain, (chart.min_radius, chart.max_radius));

    let mut colors = OrdinalScale::new(palette(&chart.colors.scheme));
    let bubbles = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            issue_bubble(state, record, index, &x_scale, &y_scale, &radius_scale, &mut colors)
        })
        .collect();

    let date_range = match state.mode {
        DataMode::Real => match state.date_window() {
            Some((start, end)) => format!("Real CSV data - {start} to {end}"),
            None => "Real CSV data".to_string(),
        },
        DataMode::Baseline => "baseline data".to_string(),
        DataMode::Enhanced => "enhanced data".to_string(),
        DataMode::Aggregated => String::new(),
    };

    ChartView {
        title: title_for(state, &date_range),
        date_range,
        width: chart.inner_width(),
        height: chart.inner_height(),
        x_axis: AxisView {
            label: "Average Time to Resolve (hours)".to_string(),
            domain: [x_scale.domain.0, x_scale.domain.1],
        },
        y_axis: AxisView {
            label: "Estimated Per-Day Business Impact (USD)".to_string(),
            domain: [y_scale.domain.0, y_scale.domain.1],
        },
        legend: legend_for(state, &mut colors),
        severity_legend: severity_legend_for(state),
        stats: Some(dataset_stats(records)),
        bubbles,
    }
}

fn issue_bubble(
    state: &DashboardState,
    record: &RawIssueRecord,
    index: usize,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    radius_scale: &SqrtScale,
    colors: &mut OrdinalScale,
) -> PlottedBubble {
    let shown = state.filter.shows(&record.category);
    let exposure = (record.business_impact * record.avg_resolve_time / 24.0).round();

    let mut fields = Vec::new();
    if let Some(subcategory) = &record.subcategory {
        fields.push(("Sub-category".to_string(), subcategory.clone()));
    }
    fields.push(("Severity".to_string(), record.severity.label().to_string()));
    if let Some(request_id) = &record.request_id {
        fields.push(("Request ID".to_string(), request_id.clone()));
    }
    if let Some(status) = &record.status {
        fields.push(("Status".to_string(), status.clone()));
    }
    fields.push(("Issues".to_string(), format_thousands(record.num_issues)));
    fields.push((
        "Business Impact".to_string(),
        format!("{}/day", format_usd(record.business_impact)),
    ));
    fields.push((
        "Avg Resolve Time".to_string(),
        format!("{} hours", record.avg_resolve_time),
    ));
    fields.push(("Total Exposure".to_string(), format_usd(exposure)));

    PlottedBubble {
        key: record
            .request_id
            .clone()
            .unwrap_or_else(|| index.to_string()),
        category: record.category.clone(),
        subcategory: record.subcategory.clone(),
        x: x_scale.map(record.avg_resolve_time),
        y: y_scale.map(record.business_impact),
        radius: radius_scale.map(record.num_issues as f64),
        fill: bubble_fill(colors, &record.category, shown),
        stroke: Some(
            state
                .config
                .chart
                .colors
                .severity
                .for_severity(record.severity)
                .to_string(),
        ),
        opacity: bubble_opacity(shown),
        expandable: false,
        tooltip: TooltipView {
            heading: record.category.clone(),
            fields,
        },
    }
}

fn bubble_fill(colors: &mut OrdinalScale, category: &str, shown: bool) -> String {
    // Color assignment happens even for dimmed categories so the palette
    // order is independent of the filter.
    let assigned = colors.map(category);
    if shown {
        assigned
    } else {
        FILTERED_FILL.to_string()
    }
}

fn bubble_opacity(shown: bool) -> f64 {
    if shown {
        0.7
    } else {
        0.2
    }
}

fn title_for(state: &DashboardState, date_range: &str) -> String {
    if date_range.is_empty() {
        state.config.ui.title.clone()
    } else {
        format!("{} ({date_range})", state.config.ui.title)
    }
}

fn legend_for(state: &DashboardState, colors: &mut OrdinalScale) -> Vec<LegendEntry> {
    let mut categories = state.dataset.unique_categories();
    categories.sort();
    categories
        .into_iter()
        .map(|category| {
            let active = state.filter.shows(&category);
            LegendEntry {
                color: colors.map(&category),
                active,
                category,
            }
        })
        .collect()
}

fn severity_legend_for(state: &DashboardState) -> Vec<SeverityLegendEntry> {
    state
        .config
        .severity_tiers
        .iter()
        .map(|tier| SeverityLegendEntry {
            severity: tier.severity,
            color: state
                .config
                .chart
                .colors
                .severity
                .for_severity(tier.severity)
                .to_string(),
            daily_impact: tier.daily_impact,
        })
        .collect()
}

/// Thousands separators, `toLocaleString`-style.
fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    if rounded < 0.0 {
        format!("-${}", format_thousands(rounded.abs() as u64))
    } else {
        format!("${}", format_thousands(rounded as u64))
    }
}
