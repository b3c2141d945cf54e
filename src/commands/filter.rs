use crate::models::bubble::Bubble;
use crate::models::state::DashboardState;

/// Legend click: toggle a category in the active-filter set. Selecting every
/// category is the same as clearing the filter.
pub fn toggle_category(state: &mut DashboardState, category: &str) {
    let all = state.dataset.unique_categories();
    state.filter.toggle(category, &all);
}

/// Bubble click. A category-summary bubble expands into its subcategories;
/// clicking any subcategory bubble, or the expanded category again,
/// collapses back to category level. Only one category expands at a time.
pub fn select_bubble(state: &mut DashboardState, bubble: &Bubble) {
    state.expanded = match bubble {
        Bubble::Subcategory(_) => None,
        Bubble::Category(rollup) => {
            if state.expanded.as_deref() == Some(rollup.category.as_str()) {
                None
            } else {
                Some(rollup.category.clone())
            }
        }
    };
}
