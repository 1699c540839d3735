//! Application window: loads the dataset in the background, then shows
//! the chart with its toolbar, legend and status bar

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context as _;
use eframe::egui::{self, Context};
use parking_lot::RwLock;
use tracing::{error, info};

use pc_core::Dataset;
use pc_data::{ChartConfig, CsvRecordSource, RecordSource};
use pc_ui::{Theme, ToolbarAction};
use pc_views::ParallelCoordinatesView;

/// Finished load handed back from the runtime; errors are already
/// rendered to text
pub type LoadSlot = Arc<RwLock<Option<Result<Dataset, String>>>>;

/// What the central panel shows
pub enum LoadState {
    Loading,
    Ready(Box<ParallelCoordinatesView>),
    Failed(String),
}

impl LoadState {
    pub fn from_result(result: Result<Dataset, String>, config: &ChartConfig) -> Self {
        match result {
            Ok(dataset) => {
                info!(records = dataset.len(), "chart ready");
                LoadState::Ready(Box::new(ParallelCoordinatesView::new(
                    "parallel_coordinates",
                    Arc::new(dataset),
                    config.chart.clone(),
                    config.colors.clone(),
                )))
            }
            Err(message) => LoadState::Failed(message),
        }
    }
}

pub struct ParcoordsApp {
    /// Keeps the loader's worker threads alive
    _runtime: tokio::runtime::Runtime,
    slot: LoadSlot,
    state: LoadState,
    config: ChartConfig,
    theme: Theme,
    source_name: String,
}

impl ParcoordsApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        path: PathBuf,
        config: ChartConfig,
    ) -> Self {
        let theme = Theme::default();
        pc_ui::apply_theme(&cc.egui_ctx, &theme);

        let source = CsvRecordSource::new(path, config.clone());
        let source_name = source.source_name().to_string();
        let slot: LoadSlot = Arc::new(RwLock::new(None));

        let ctx = cc.egui_ctx.clone();
        let loaded = slot.clone();
        runtime.spawn(async move {
            let result = source
                .load()
                .await
                .with_context(|| format!("Failed to load {}", source.path().display()))
                .map_err(|e| {
                    error!("{:#}", e);
                    format!("{:#}", e)
                });
            *loaded.write() = Some(result);
            ctx.request_repaint();
        });

        Self {
            _runtime: runtime,
            slot,
            state: LoadState::Loading,
            config,
            theme,
            source_name,
        }
    }

    /// Pick up a finished load
    fn poll_load(&mut self) {
        if !matches!(self.state, LoadState::Loading) {
            return;
        }
        if let Some(result) = self.slot.write().take() {
            self.state = LoadState::from_result(result, &self.config);
        }
    }
}

impl eframe::App for ParcoordsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.source_name);
                ui.separator();
                if let LoadState::Ready(view) = &mut self.state {
                    match pc_ui::toolbar(ui, &view.summary()) {
                        Some(ToolbarAction::ClearBrushes) => view.clear_brushes(),
                        Some(ToolbarAction::ResetAxes) => view.reset_axes(),
                        Some(ToolbarAction::Rescale) => view.rescale(),
                        None => {}
                    }
                }
            });
        });

        if let LoadState::Ready(view) = &self.state {
            let summary = view.summary();
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                pc_ui::status_bar(ui, &summary, view.render_status(), &self.theme);
            });
            egui::SidePanel::right("legend")
                .default_width(220.0)
                .show(ctx, |ui| {
                    pc_ui::legend(ui, view.colors(), &summary, &self.theme);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.state {
            LoadState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            LoadState::Failed(message) => pc_ui::notice(ui, self.theme.error, message),
            LoadState::Ready(view) => {
                view.ui(ui);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::{FieldKind, Record, Value};

    #[test]
    fn test_failed_load_keeps_message() {
        let state = LoadState::from_result(Err("Failed to load x.csv: boom".to_string()), &ChartConfig::default());
        match state {
            LoadState::Failed(message) => assert!(message.contains("boom")),
            _ => panic!("expected a failed state"),
        }
    }

    #[test]
    fn test_loaded_dataset_becomes_chart() {
        let dataset = Dataset::new(
            vec![("numberOfFfes".to_string(), FieldKind::Qualitative)],
            vec![Record::new(vec![Value::Number(2.0)])],
        );
        match LoadState::from_result(Ok(dataset), &ChartConfig::default()) {
            LoadState::Ready(view) => assert_eq!(view.summary().records, 1),
            _ => panic!("expected a chart"),
        }
    }
}
