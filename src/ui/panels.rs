use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::SourceColors;
use crate::context::DashboardContext;
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Left side panel – source checklist
// ---------------------------------------------------------------------------

/// Render the checklist that toggles which sources are charted.
pub fn side_panel(
    ui: &mut Ui,
    context: &DashboardContext,
    view: &mut ViewState,
    colors: &SourceColors,
) {
    ui.heading("Servers");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            view.select_all(context);
        }
        if ui.small_button("None").clicked() {
            view.select_none(context);
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for report in &context.reports {
                let mut checked = view.selected.contains(&report.name);
                let text = RichText::new(&report.name).color(colors.color_for(&report.name));
                let response = ui
                    .checkbox(&mut checked, text)
                    .on_hover_text(format!(
                        "{}\n{} samples, {} variables",
                        report.origin.display(),
                        report.snapshot_count,
                        report.variable_count()
                    ));
                if response.changed() {
                    view.toggle_source(context, &report.name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, context: &DashboardContext, view: &mut ViewState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export…").clicked() {
                export_dialog(context, view);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} source(s), {} selected, {} chart(s)",
            context.reports.len(),
            view.selected.len(),
            view.panels.len()
        ));

        if let Some(msg) = &view.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(context: &DashboardContext, view: &mut ViewState) {
    let file = rfd::FileDialog::new()
        .set_title("Export series")
        .set_file_name("mysqladmin.json")
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::export(&context.reports, &path) {
            Ok(()) => {
                log::info!("Exported {} source(s) to {}", context.reports.len(), path.display());
                view.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                view.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
