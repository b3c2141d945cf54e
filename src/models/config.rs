use crate::models::record::Severity;
use serde::{Deserialize, Serialize};

/// Dashboard configuration, loaded from `config.json`. Missing keys fall back
/// to the defaults below; value sanitization happens in `commands::config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub chart: ChartConfig,
    pub severity_tiers: Vec<SeverityTier>,
    pub default_categories: Vec<String>,
    pub data_source: DataSourceConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Fixed plot domains for the aggregated (quadrant) view.
    pub effort_domain: [f64; 2],
    pub impact_domain: [f64; 2],
    pub count_domain: [f64; 2],
    pub colors: ColorConfig,
}

impl ChartConfig {
    /// Plot-area width after margins.
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Ordinal palette name: "set3" | "category10" | "default".
    pub scheme: String,
    pub severity: SeverityColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SeverityColors {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl SeverityColors {
    pub fn for_severity(&self, severity: Severity) -> &str {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityTier {
    pub severity: Severity,
    pub daily_impact: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSourceConfig {
    pub file_name: String,
    pub description: String,
    pub total_categories: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub methodology: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            chart: ChartConfig::default(),
            severity_tiers: default_severity_tiers(),
            default_categories: default_categories(),
            data_source: DataSourceConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 1160.0,
            height: 540.0,
            margin: Margin::default(),
            min_radius: 4.0,
            max_radius: 60.0,
            effort_domain: [0.0, 700_000.0],
            impact_domain: [0.0, 2_500_000.0],
            count_domain: [0.0, 500.0],
            colors: ColorConfig::default(),
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 60.0,
            right: 200.0,
            bottom: 60.0,
            left: 60.0,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            scheme: "set3".to_string(),
            severity: SeverityColors::default(),
        }
    }
}

impl Default for SeverityColors {
    fn default() -> Self {
        SeverityColors {
            high: "#dc3545".to_string(),
            medium: "#ffc107".to_string(),
            low: "#28a745".to_string(),
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig {
            file_name: "service_desk_issues.csv".to_string(),
            description: "Service desk ticket export".to_string(),
            total_categories: 0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            title: "Service Desk Issues: Business Impact vs Resolution Time".to_string(),
            methodology: "Bubble area is proportional to issue volume; position shows \
                          resolution time against estimated per-day business impact."
                .to_string(),
        }
    }
}

pub fn default_severity_tiers() -> Vec<SeverityTier> {
    vec![
        SeverityTier {
            severity: Severity::Low,
            daily_impact: 200.0,
            probability: 0.6,
        },
        SeverityTier {
            severity: Severity::Medium,
            daily_impact: 1000.0,
            probability: 0.3,
        },
        SeverityTier {
            severity: Severity::High,
            daily_impact: 5000.0,
            probability: 0.1,
        },
    ]
}

fn default_categories() -> Vec<String> {
    [
        "Software Service",
        "Hardware",
        "Network Services",
        "Security Services",
        "Email Services",
        "Server Services",
        "Login Issue",
        "SAP",
        "Data Services",
        "Mobile Services",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
