use std::collections::BTreeSet;

use crate::context::{chart_panels, ChartPanel, DashboardContext};

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// The mutable UI state. The computed reports live in [`DashboardContext`]
/// and are never touched after startup.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Sources whose charts are shown.
    pub selected: BTreeSet<String>,

    /// Panels for the current selection (cached).
    pub panels: Vec<ChartPanel>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewState {
    /// Start with every source selected.
    pub fn new(ctx: &DashboardContext) -> Self {
        let mut state = Self {
            selected: ctx.source_names().into_iter().collect(),
            ..Self::default()
        };
        state.refresh(ctx);
        state
    }

    /// Recompute `panels` after a selection change.
    pub fn refresh(&mut self, ctx: &DashboardContext) {
        self.panels = chart_panels(ctx, &self.selected);
    }

    /// Toggle a single source in the checklist.
    pub fn toggle_source(&mut self, ctx: &DashboardContext, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
        self.refresh(ctx);
    }

    pub fn select_all(&mut self, ctx: &DashboardContext) {
        self.selected = ctx.source_names().into_iter().collect();
        self.refresh(ctx);
    }

    pub fn select_none(&mut self, ctx: &DashboardContext) {
        self.selected.clear();
        self.refresh(ctx);
    }
}
