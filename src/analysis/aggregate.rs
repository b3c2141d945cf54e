use crate::models::bubble::{CategoryBubble, SubcategoryBubble};
use crate::models::record::{IssueTypeRecord, SummaryRecord};
use chrono::NaiveDate;
use std::collections::HashMap;

struct GroupAccumulator {
    count: u64,
    total_days: f64,
    effort_per_issue: f64,
    impact_per_day: f64,
}

/// Aggregate the time-series summary over `[start, end]` inclusive, one group
/// per (category, subcategory), joined to the issue-type reference table.
///
/// A summary row with no matching reference row is a hard error: defaulting
/// the effort/impact constants would silently corrupt bubble sizing.
/// Zero-count groups are excluded from the output rather than producing a
/// division by zero.
pub fn aggregate_period(
    summary: &[SummaryRecord],
    types: &[IssueTypeRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SubcategoryBubble>, String> {
    let mut reference: HashMap<(&str, &str), &IssueTypeRecord> = HashMap::new();
    for row in types {
        reference.insert((row.category.as_str(), row.subcategory.as_str()), row);
    }

    // First-seen key order is the output order.
    let mut order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), GroupAccumulator> = HashMap::new();

    for record in summary.iter().filter(|r| r.date >= start && r.date <= end) {
        let key = (record.category.clone(), record.subcategory.clone());
        let contributed_days = record.days_to_fix * record.count as f64;

        if let Some(group) = groups.get_mut(&key) {
            group.count += record.count;
            group.total_days += contributed_days;
            continue;
        }

        let reference_row = reference
            .get(&(record.category.as_str(), record.subcategory.as_str()))
            .ok_or_else(|| {
                format!(
                    "No issue type reference for {}/{}",
                    record.category, record.subcategory
                )
            })?;
        order.push(key.clone());
        groups.insert(
            key,
            GroupAccumulator {
                count: record.count,
                total_days: contributed_days,
                effort_per_issue: reference_row.effort_per_issue,
                impact_per_day: reference_row.impact_per_day,
            },
        );
    }

    let mut bubbles = Vec::with_capacity(order.len());
    for key in order {
        let group = &groups[&key];
        if group.count == 0 {
            continue;
        }

        let avg_days_to_fix = group.total_days / group.count as f64;
        bubbles.push(SubcategoryBubble {
            category: key.0,
            subcategory: key.1,
            count: group.count,
            effort_per_issue: group.effort_per_issue,
            impact_per_day: group.impact_per_day,
            avg_days_to_fix,
            total_effort: group.count as f64 * group.effort_per_issue,
            total_impact: group.count as f64 * group.impact_per_day * avg_days_to_fix,
        });
    }

    Ok(bubbles)
}

/// Roll subcategory groups up to one bubble per category, retaining the
/// constituents for drill-down. Output keeps first-seen category order.
pub fn rollup_by_category(subcategories: &[SubcategoryBubble]) -> Vec<CategoryBubble> {
    let mut order: Vec<String> = Vec::new();
    let mut rollups: HashMap<String, CategoryBubble> = HashMap::new();

    for sub in subcategories {
        let rollup = rollups
            .entry(sub.category.clone())
            .or_insert_with(|| {
                order.push(sub.category.clone());
                CategoryBubble {
                    category: sub.category.clone(),
                    count: 0,
                    total_effort: 0.0,
                    total_impact: 0.0,
                    subcategories: Vec::new(),
                }
            });

        rollup.count += sub.count;
        rollup.total_effort += sub.total_effort;
        rollup.total_impact += sub.total_impact;
        rollup.subcategories.push(sub.clone());
    }

    order
        .into_iter()
        .filter_map(|category| rollups.remove(&category))
        .collect()
}
