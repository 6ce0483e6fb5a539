use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::{generate_palette, SourceColors};
use crate::context::{ChartPanel, DashboardContext};
use crate::data::model::format_avg;
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render every selected panel, two per row.
pub fn chart_grid(ui: &mut Ui, context: &DashboardContext, view: &ViewState, colors: &SourceColors) {
    if context.reports.is_empty() || view.panels.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing to chart: no varying status variables in the selected sources");
        });
        return;
    }

    let multi_source = context.is_multi_source();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for row in view.panels.chunks(2) {
                ui.columns(2, |cols| {
                    for (col, panel) in cols.iter_mut().zip(row) {
                        egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                            chart_card(ui, panel, multi_source, colors);
                        });
                    }
                });
                ui.add_space(20.0);
            }
        });
}

// ---------------------------------------------------------------------------
// One card: title, line chart, stats table
// ---------------------------------------------------------------------------

fn chart_card(ui: &mut Ui, panel: &ChartPanel, multi_source: bool, colors: &SourceColors) {
    let mut title = RichText::new(panel.title(multi_source)).strong();
    if multi_source {
        title = title.color(colors.color_for(&panel.source));
    }
    ui.label(title.size(16.0));

    let palette = generate_palette(panel.lines.len());
    let id = format!("{}/{}", panel.source, panel.group);

    Plot::new(format!("plot_{id}"))
        .height(220.0)
        .legend(Legend::default())
        .x_axis_label("Sample")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (line, &color) in panel.lines.iter().zip(palette.iter()) {
                // Segments of one variable share a name so the legend
                // toggles them together.
                for segment in &line.segments {
                    let points: PlotPoints = segment.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(&line.name).color(color).width(1.5));
                }
            }
        });

    ui.push_id(format!("stats_{id}"), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::remainder().at_least(160.0))
            .columns(Column::auto().at_least(60.0), 3)
            .header(20.0, |mut header| {
                for heading in ["Name", "Max", "Min", "Avg"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(heading);
                    });
                }
            })
            .body(|mut body| {
                for (line, &color) in panel.lines.iter().zip(palette.iter()) {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(&line.name).color(color));
                        });
                        let cells = match line.stats {
                            Some(s) => [s.max.to_string(), s.min.to_string(), format_avg(s.avg)],
                            None => ["–".to_string(), "–".to_string(), "–".to_string()],
                        };
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
