use crate::layout::LayoutPlan;
use crate::types::*;

/// Summarize a layout for display
pub fn summarize(plan: &LayoutPlan) -> StencilStatistics {
    let coverage_cm = (
        plan.cols as f64 * plan.page_cm.0,
        plan.rows as f64 * plan.page_cm.1,
    );
    let overhang_cm = (
        (coverage_cm.0 - plan.target_cm.0).max(0.0),
        (coverage_cm.1 - plan.target_cm.1).max(0.0),
    );

    StencilStatistics {
        pages: plan.page_count(),
        rows: plan.rows,
        cols: plan.cols,
        target_cm: plan.target_cm,
        page_cm: plan.page_cm,
        coverage_cm,
        overhang_cm,
        canvas_px: plan.canvas_px,
        page_px: plan.page_px,
        dpi: plan.dpi,
    }
}
