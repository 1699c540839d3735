//! User interface components for the parallel-coordinates chart
//!
//! Theme, toolbar, status bar and legend. The chart itself lives in
//! `pc-views`; these panels only read its summary and report the
//! buttons that were clicked.

pub mod panels;
pub mod theme;

pub use panels::{legend, legend_rows, notice, progress_text, status_bar, toolbar, LegendRow, ToolbarAction};
pub use theme::{apply_theme, Theme};

/// Button with a hover hint
pub fn hint_button(ui: &mut egui::Ui, enabled: bool, text: &str, hint: &str) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(text))
        .on_hover_text(hint)
}
