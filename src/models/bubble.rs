use serde::{Deserialize, Serialize};

/// Aggregated totals for one (category, subcategory) group over the current
/// date window. Recomputed on every aggregation call, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryBubble {
    pub category: String,
    pub subcategory: String,
    pub count: u64,
    pub effort_per_issue: f64,
    pub impact_per_day: f64,
    pub avg_days_to_fix: f64,
    pub total_effort: f64,
    pub total_impact: f64,
}

/// Category roll-up: sums across the constituent subcategory groups, which
/// are retained for drill-down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBubble {
    pub category: String,
    pub count: u64,
    pub total_effort: f64,
    pub total_impact: f64,
    pub subcategories: Vec<SubcategoryBubble>,
}

impl CategoryBubble {
    /// Mean effort per issue across the rolled-up window.
    pub fn mean_effort_per_issue(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_effort / self.count as f64
        }
    }

    /// Count-weighted mean of the constituent per-day impacts.
    pub fn weighted_impact_per_day(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .subcategories
            .iter()
            .map(|sub| sub.impact_per_day * sub.count as f64)
            .sum();
        weighted / self.count as f64
    }
}

/// One plotted marker. The two variants place and describe themselves
/// differently, so the distinction is explicit rather than inferred from
/// field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bubble {
    Category(CategoryBubble),
    Subcategory(SubcategoryBubble),
}

impl Bubble {
    pub fn category(&self) -> &str {
        match self {
            Bubble::Category(b) => &b.category,
            Bubble::Subcategory(b) => &b.category,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Bubble::Category(b) => b.count,
            Bubble::Subcategory(b) => b.count,
        }
    }

    /// Stable join key for the renderer: subcategory name when present,
    /// otherwise the category name.
    pub fn key(&self) -> &str {
        match self {
            Bubble::Category(b) => &b.category,
            Bubble::Subcategory(b) => &b.subcategory,
        }
    }
}
