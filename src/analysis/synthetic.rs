use crate::models::config::SeverityTier;
use crate::models::record::{RawIssueRecord, Severity};
use rand::Rng;

/// Which impact/resolve-time model the generator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticMode {
    /// Impact proportional to issue volume, noisy.
    Baseline,
    /// Impact anchored on the severity tier, log-scaled by volume.
    Enhanced,
}

/// Empirical issue-count distribution: cumulative threshold, base, range.
/// Fitted to the observed volume histogram of the source ticket data.
const ISSUE_BUCKETS: [(f64, f64, f64); 6] = [
    (0.25, 1.0, 9.0),
    (0.5, 10.0, 52.0),
    (0.75, 62.0, 268.0),
    (0.9, 330.0, 1282.0),
    (0.95, 1612.0, 1123.0),
    (1.0, 2735.0, 5364.0),
];

/// Per-tier base resolve hours for the enhanced model.
fn base_resolve_hours(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 24.0,
        Severity::Medium => 48.0,
        Severity::High => 96.0,
    }
}

/// Pick the issue count for two uniform draws in [0, 1): `bucket_draw`
/// selects the bucket, `spread_draw` the position inside it. Never below 1.
pub fn issue_count_from(bucket_draw: f64, spread_draw: f64) -> u64 {
    for (threshold, base, range) in ISSUE_BUCKETS {
        if bucket_draw < threshold {
            let count = (base + spread_draw * range).round();
            return count.max(1.0) as u64;
        }
    }
    // bucket_draw ∈ [0, 1) always lands in a bucket; the last threshold is 1.0
    1
}

pub fn sample_issue_count(rng: &mut impl Rng) -> u64 {
    issue_count_from(rng.random(), rng.random())
}

/// Tier selection for a uniform draw: High wins below P(High), Medium below
/// P(High) + P(Medium), Low otherwise.
pub fn tier_for_draw(tiers: &[SeverityTier], draw: f64) -> Result<&SeverityTier, String> {
    let high = tier_for(tiers, Severity::High)?;
    let medium = tier_for(tiers, Severity::Medium)?;
    let low = tier_for(tiers, Severity::Low)?;

    if draw < high.probability {
        Ok(high)
    } else if draw < high.probability + medium.probability {
        Ok(medium)
    } else {
        Ok(low)
    }
}

fn tier_for(tiers: &[SeverityTier], severity: Severity) -> Result<&SeverityTier, String> {
    tiers
        .iter()
        .find(|t| t.severity == severity)
        .ok_or_else(|| format!("Severity tier config is missing {}", severity.label()))
}

fn business_impact(
    mode: SyntheticMode,
    num_issues: u64,
    tier: &SeverityTier,
    rng: &mut impl Rng,
) -> f64 {
    match mode {
        SyntheticMode::Enhanced => {
            let issue_multiplier = ((num_issues + 1) as f64).log10();
            (tier.daily_impact * issue_multiplier * rng.random_range(0.8..1.2)).round()
        }
        SyntheticMode::Baseline => {
            let base = num_issues as f64 * rng.random_range(15.0..50.0);
            (base + rng.random_range(-0.3..0.3) * base).round().max(500.0)
        }
    }
}

fn resolve_time(
    mode: SyntheticMode,
    num_issues: u64,
    severity: Severity,
    rng: &mut impl Rng,
) -> f64 {
    match mode {
        SyntheticMode::Enhanced => {
            let complexity = ((num_issues + 1) as f64).log10();
            round_tenths(base_resolve_hours(severity) * complexity * rng.random_range(0.5..1.5))
        }
        SyntheticMode::Baseline => {
            let urgency = (num_issues as f64 * 50.0).log10();
            round_tenths((100.0 - urgency * 10.0 + rng.random_range(0.0..80.0)).max(1.0))
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generate `sample_size` randomized issue records from the configured
/// distributions. Every draw goes through the injected `rng`, so callers that
/// need reproducibility pass a seeded one.
pub fn generate(
    mode: SyntheticMode,
    sample_size: usize,
    categories: &[String],
    tiers: &[SeverityTier],
    rng: &mut impl Rng,
) -> Result<Vec<RawIssueRecord>, String> {
    if categories.is_empty() {
        return Err("Cannot generate synthetic data: category pool is empty".to_string());
    }

    let mut records = Vec::with_capacity(sample_size);
    for _ in 0..sample_size {
        let category = categories[rng.random_range(0..categories.len())].clone();
        let num_issues = sample_issue_count(rng);
        let tier = tier_for_draw(tiers, rng.random())?;

        records.push(RawIssueRecord {
            category,
            subcategory: None,
            num_issues,
            business_impact: business_impact(mode, num_issues, tier, rng),
            avg_resolve_time: resolve_time(mode, num_issues, tier.severity, rng),
            severity: tier.severity,
            request_id: None,
            status: None,
        });
    }

    Ok(records)
}
