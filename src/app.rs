use eframe::egui;

use crate::color::SourceColors;
use crate::context::DashboardContext;
use crate::state::ViewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MysqladminViewerApp {
    pub context: DashboardContext,
    pub view: ViewState,
    pub colors: SourceColors,
}

impl MysqladminViewerApp {
    pub fn new(context: DashboardContext) -> Self {
        let view = ViewState::new(&context);
        let colors = SourceColors::new(&context.source_names());
        Self {
            context,
            view,
            colors,
        }
    }
}

impl eframe::App for MysqladminViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.context, &mut self.view);
        });

        // ---- Left side panel: source checklist (multi-source only) ----
        if self.context.is_multi_source() {
            egui::SidePanel::left("source_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &self.context, &mut self.view, &self.colors);
                });
        }

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_grid(ui, &self.context, &self.view, &self.colors);
        });
    }
}
