use crate::models::config::{default_severity_tiers, DashboardConfig};
use crate::models::record::Severity;
use std::fs;
use std::path::Path;

const ALLOWED_SCHEMES: [&str; 3] = ["default", "set3", "category10"];

/// Load and sanitize `config.json`. A missing or unparseable file is a hard
/// load failure; the UI shows an error state instead of guessing.
pub fn load_config(path: &Path) -> Result<DashboardConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let mut config: DashboardConfig =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid {}: {e}", path.display()))?;

    sanitize_config(&mut config)?;
    Ok(config)
}

/// Clamp numerics, validate enums, and normalize tier probabilities so the
/// rest of the pipeline never re-checks them.
pub fn sanitize_config(config: &mut DashboardConfig) -> Result<(), String> {
    let chart = &mut config.chart;
    chart.width = chart.width.clamp(320.0, 4096.0);
    chart.height = chart.height.clamp(240.0, 2160.0);
    chart.margin.top = chart.margin.top.clamp(0.0, 300.0);
    chart.margin.right = chart.margin.right.clamp(0.0, 400.0);
    chart.margin.bottom = chart.margin.bottom.clamp(0.0, 300.0);
    chart.margin.left = chart.margin.left.clamp(0.0, 400.0);

    chart.min_radius = chart.min_radius.clamp(1.0, 200.0);
    chart.max_radius = chart.max_radius.clamp(1.0, 200.0);
    if chart.min_radius > chart.max_radius {
        std::mem::swap(&mut chart.min_radius, &mut chart.max_radius);
    }

    for domain in [
        &mut chart.effort_domain,
        &mut chart.impact_domain,
        &mut chart.count_domain,
    ] {
        domain[0] = domain[0].max(0.0);
        domain[1] = domain[1].max(0.0);
        if domain[0] > domain[1] {
            domain.swap(0, 1);
        }
    }

    if !ALLOWED_SCHEMES.contains(&chart.colors.scheme.as_str()) {
        log::warn!("Unknown color scheme '{}', using default", chart.colors.scheme);
        chart.colors.scheme = "default".to_string();
    }

    sanitize_tiers(config)?;

    config.default_categories.retain(|c| !c.trim().is_empty());
    if config.default_categories.is_empty() {
        config.default_categories = DashboardConfig::default().default_categories;
    }

    Ok(())
}

/// The tier list must name Low, Medium and High exactly once each; the draw
/// logic depends on all three existing. Probabilities are clamped to [0, 1]
/// and renormalized to sum 1.0.
fn sanitize_tiers(config: &mut DashboardConfig) -> Result<(), String> {
    for severity in [Severity::Low, Severity::Medium, Severity::High] {
        let occurrences = config
            .severity_tiers
            .iter()
            .filter(|t| t.severity == severity)
            .count();
        if occurrences != 1 {
            return Err(format!(
                "severityTiers must contain exactly one {} entry, found {occurrences}",
                severity.label()
            ));
        }
    }

    for tier in &mut config.severity_tiers {
        tier.daily_impact = tier.daily_impact.max(0.0);
        tier.probability = tier.probability.clamp(0.0, 1.0);
    }

    let sum: f64 = config.severity_tiers.iter().map(|t| t.probability).sum();
    if sum > f64::EPSILON {
        for tier in &mut config.severity_tiers {
            tier.probability /= sum;
        }
    } else {
        let defaults = default_severity_tiers();
        for tier in &mut config.severity_tiers {
            tier.probability = defaults
                .iter()
                .find(|d| d.severity == tier.severity)
                .map(|d| d.probability)
                .unwrap_or(0.0);
        }
    }

    Ok(())
}
