//! Panels around the chart

use std::sync::Arc;
use egui::{Color32, Rounding, Sense, Ui, Vec2};

use pc_core::{ChartSummary, ColorTable, Hsl};
use pc_render::colors::hsla;
use pc_render::RenderStatus;
use crate::{hint_button, Theme};

/// A toolbar button that was clicked this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    ClearBrushes,
    ResetAxes,
    Rescale,
}

/// Chart actions above the plot
pub fn toolbar(ui: &mut Ui, summary: &ChartSummary) -> Option<ToolbarAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if hint_button(ui, summary.brushed_axes > 0, "Clear Brushes", "Remove every range selection").clicked() {
            action = Some(ToolbarAction::ClearBrushes);
        }
        if hint_button(ui, true, "Reset Axes", "Bring back removed axes in their starting order").clicked() {
            action = Some(ToolbarAction::ResetAxes);
        }
        if hint_button(ui, summary.records > 0, "Rescale", "Fit every axis to the full dataset").clicked() {
            action = Some(ToolbarAction::Rescale);
        }
    });
    action
}

/// Short description of foreground progress
pub fn progress_text(status: RenderStatus) -> String {
    match status {
        RenderStatus::Idle => "Idle".to_string(),
        RenderStatus::Drawing { drawn, total } => {
            let percent = if total == 0 { 100 } else { drawn * 100 / total };
            format!("Drawing {drawn}/{total} ({percent}%)")
        }
        RenderStatus::Complete { total } => format!("Drew {total} lines"),
        RenderStatus::Cancelled { drawn, total } => format!("Interrupted at {drawn}/{total}"),
    }
}

/// Counts and render progress along the bottom of the window
pub fn status_bar(ui: &mut Ui, summary: &ChartSummary, status: RenderStatus, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.label(format!("Dimensions: {}", summary.dimensions));
        ui.label(format!("Records: {}", summary.records));
        ui.label(format!("Selected: {}", summary.selected));

        if summary.brushed_axes > 0 {
            ui.colored_label(theme.accent, format!("Brushed axes: {}", summary.brushed_axes));
        }

        ui.separator();
        let color = if status.is_drawing() { theme.warning } else { theme.text_secondary };
        ui.colored_label(color, progress_text(status));

        ui.separator();
        ui.colored_label(
            theme.text_secondary,
            "Drag labels to reorder • Click a label to invert • Drag along an axis to brush",
        );
    });
}

/// One legend entry
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub label: Arc<str>,
    pub color: Hsl,
    pub selected: usize,
}

/// Legend entries: every label in the color table, then one fallback row
/// for selected records whose label the table does not know
pub fn legend_rows(colors: &ColorTable, summary: &ChartSummary) -> Vec<LegendRow> {
    let mut rows: Vec<LegendRow> = colors
        .labels()
        .into_iter()
        .map(|label| LegendRow {
            label: Arc::from(label),
            color: colors.lookup(Some(label)),
            selected: summary.selected_with_label(label),
        })
        .collect();

    let other: usize = summary
        .selected_by_label
        .iter()
        .filter(|(label, _)| !colors.entries.contains_key(label.as_ref()))
        .map(|(_, n)| n)
        .sum();
    if other > 0 {
        rows.push(LegendRow {
            label: Arc::from("Other"),
            color: colors.fallback,
            selected: other,
        });
    }
    rows
}

/// Color swatches with selected counts
pub fn legend(ui: &mut Ui, colors: &ColorTable, summary: &ChartSummary, theme: &Theme) {
    ui.heading("Legend");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("legend_scroll")
        .show(ui, |ui| {
            egui::Grid::new("legend_grid")
                .num_columns(3)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    for row in legend_rows(colors, summary) {
                        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                        ui.painter().rect_filled(rect, Rounding::same(2.0), hsla(row.color, 1.0));

                        let text_color = if row.selected > 0 { theme.text } else { theme.text_secondary };
                        ui.colored_label(text_color, &*row.label);
                        ui.colored_label(text_color, row.selected.to_string());
                        ui.end_row();
                    }
                });
        });
}

/// Message shown in place of the chart
pub fn notice(ui: &mut Ui, color: Color32, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.colored_label(color, text);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ChartSummary {
        ChartSummary {
            dimensions: 3,
            records: 10,
            selected: 6,
            brushed_axes: 1,
            selected_by_label: vec![
                (Arc::from(""), 1),
                (Arc::from("Load"), 4),
                (Arc::from("Mystery"), 1),
            ],
        }
    }

    #[test]
    fn test_progress_text() {
        assert_eq!(progress_text(RenderStatus::Idle), "Idle");
        assert_eq!(
            progress_text(RenderStatus::Drawing { drawn: 50, total: 200 }),
            "Drawing 50/200 (25%)"
        );
        assert_eq!(progress_text(RenderStatus::Drawing { drawn: 0, total: 0 }), "Drawing 0/0 (100%)");
        assert_eq!(progress_text(RenderStatus::Complete { total: 7 }), "Drew 7 lines");
        assert_eq!(
            progress_text(RenderStatus::Cancelled { drawn: 3, total: 9 }),
            "Interrupted at 3/9"
        );
    }

    #[test]
    fn test_legend_rows() {
        let colors = ColorTable::default();
        let rows = legend_rows(&colors, &summary());

        assert_eq!(rows.len(), colors.entries.len() + 1);
        let load = rows.iter().find(|r| r.label.as_ref() == "Load").unwrap();
        assert_eq!(load.selected, 4);
        assert_eq!(load.color, Hsl(185.0, 56.0, 73.0));

        let other = rows.last().unwrap();
        assert_eq!(other.label.as_ref(), "Other");
        assert_eq!(other.selected, 2);
        assert_eq!(other.color, colors.fallback);
    }

    #[test]
    fn test_legend_without_strays() {
        let mut summary = summary();
        summary.selected_by_label.retain(|(l, _)| l.as_ref() == "Load");
        let rows = legend_rows(&ColorTable::empty(), &summary);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].selected, 4);
    }
}
