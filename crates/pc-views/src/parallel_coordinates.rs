//! Interactive parallel-coordinates view

use std::hash::Hash;
use std::sync::Arc;
use egui::{Align2, Color32, CursorIcon, FontId, Id, Painter, Pos2, Rect, Response, Rounding, Sense, Stroke, Ui, Vec2};
use tracing::{debug, warn};

use pc_core::{
    ChartSettings, ChartState, ChartSummary, ColorTable, Dataset, DimensionId, InteractionController,
    RenderRequest, Value, Viewport,
};
use pc_render::{ChartLayers, RenderStatus};
use crate::hit::{brush_strip, hit_test, ChartMargins, HitTarget};

/// Seconds an axis takes to glide into a new slot
const SETTLE_SECONDS: f32 = 0.15;
/// Background of an axis that would be removed on release
const REMOVAL_TINT: Color32 = Color32::from_rgba_premultiplied(120, 0, 0, 120);

/// Parallel coordinates chart over one dataset
pub struct ParallelCoordinatesView {
    id: Id,
    controller: InteractionController,
    layers: ChartLayers,
    /// The request the foreground was last submitted with
    request: RenderRequest,
    margins: ChartMargins,
    colors: ColorTable,
    /// What the current press started on
    press: Option<HitTarget>,
    last_hover: Option<Pos2>,
}

impl ParallelCoordinatesView {
    pub fn new(id_source: impl Hash, dataset: Arc<Dataset>, settings: ChartSettings, colors: ColorTable) -> Self {
        let render = settings.render.clone();
        let controller = InteractionController::new(dataset, Viewport::new(800.0, 530.0), settings);
        let mut layers = ChartLayers::new(controller.state().generation().clone(), colors.clone(), render);

        let request = controller.state().full_request();
        layers.redraw_background(&request);
        layers.submit(request.clone());

        Self {
            id: Id::new(id_source),
            controller,
            layers,
            request,
            margins: ChartMargins::default(),
            colors,
            press: None,
            last_hover: None,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn summary(&self) -> ChartSummary {
        self.controller.state().summary()
    }

    pub fn render_status(&self) -> RenderStatus {
        self.layers.status()
    }

    pub fn clear_brushes(&mut self) {
        let request = self.controller.clear_brushes();
        self.apply(request, false);
    }

    pub fn reset_axes(&mut self) {
        self.press = None;
        let request = self.controller.reset_axes();
        self.apply(request, true);
    }

    pub fn rescale(&mut self) {
        let request = self.controller.rescale();
        self.apply(request, true);
    }

    /// Start drawing `request`; `geometry` means axes moved or flipped
    /// and the context layer must follow
    fn apply(&mut self, request: RenderRequest, geometry: bool) {
        if geometry {
            self.layers.redraw_background(&self.controller.state().full_request());
        }
        self.layers.set_highlight(None, &request);
        self.layers.submit(request.clone());
        self.request = request;
        self.last_hover = None;
    }

    /// Resize the chart when the space egui gives us changed
    fn fit(&mut self, rect: Rect) {
        let viewport = Viewport::new(rect.width().max(1.0), rect.height().max(1.0));
        let current = self.controller.state().viewport();
        if (viewport.width - current.width).abs() > 0.5 || (viewport.height - current.height).abs() > 0.5 {
            let request = self.controller.resize(viewport);
            self.apply(request, true);
        }
    }

    /// Chart-local x of every visible axis as drawn this frame
    fn axis_positions(&self, ui: &Ui) -> Vec<(DimensionId, f32)> {
        let layout = self.controller.state().layout();
        let dragging = layout.dragging();
        layout
            .order()
            .iter()
            .filter_map(|&dimension| {
                let target = layout.position(dimension)?;
                let time = if dragging == Some(dimension) { 0.0 } else { SETTLE_SECONDS };
                let x = ui
                    .ctx()
                    .animate_value_with_time(self.id.with(dimension.index()), target, time);
                Some((dimension, x))
            })
            .collect()
    }

    pub fn ui(&mut self, ui: &mut Ui) -> Response {
        let outer = ui.available_rect_before_wrap();
        let rect = self.margins.chart_rect(outer);
        self.fit(rect);

        let response = ui.allocate_rect(outer, Sense::click_and_drag());
        let axes = self.axis_positions(ui);
        self.handle_interaction(ui, &response, rect, &axes);

        if self.layers.tick().is_drawing() {
            ui.ctx().request_repaint();
        }

        let painter = ui.painter_at(outer);
        self.layers
            .paint(&painter, rect.min, self.controller.dragging().is_some());
        self.draw_axes(&painter, rect, &axes);

        let response = match self.layers.highlighted().filter(|_| self.press.is_none()) {
            Some(index) => match describe_record(self.controller.state(), index) {
                Some(text) => response.on_hover_text(text),
                None => response,
            },
            None => response,
        };
        self.context_menu(response)
    }

    fn handle_interaction(&mut self, ui: &Ui, response: &Response, rect: Rect, axes: &[(DimensionId, f32)]) {
        let offset = rect.min.to_vec2();
        let height = rect.height();
        let band = self.margins.top;
        let target_at = |p: Pos2| hit_test(axes, p - offset, height, band);

        if let Some(hover) = response.hover_pos() {
            match target_at(hover) {
                Some(HitTarget::Axis(_)) => ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal),
                Some(HitTarget::Brush(_)) => ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical),
                _ => {}
            }
        }

        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                self.begin(target_at(origin), origin - offset);
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            match self.press {
                // any travel counts as a drag, so only a still release inverts
                Some(HitTarget::Axis(_)) if delta != Vec2::ZERO => match self.controller.drag_axis(delta.x) {
                    Ok(feedback) => debug!(x = feedback.x, armed = feedback.removal_armed, "axis dragged"),
                    Err(err) => warn!(%err, "axis drag lost"),
                },
                Some(HitTarget::Brush(_)) if delta.y != 0.0 => {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        match self.controller.brush_to((pointer - offset).y) {
                            Ok(request) => self.apply(request, false),
                            Err(err) => warn!(%err, "brush lost"),
                        }
                    }
                }
                _ => {}
            }
        }

        let mut finished = false;
        if response.drag_released() {
            finished = self.finish();
        }

        // a press that egui never reported as a drag
        if response.clicked() && !finished {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.begin(target_at(pointer), pointer - offset);
                self.finish();
            }
        }

        if self.press.is_none() {
            let pointer = response
                .hover_pos()
                .filter(|p| target_at(*p) == Some(HitTarget::Lines))
                .map(|p| p - offset);
            if pointer != self.last_hover {
                self.last_hover = pointer;
                self.layers.hover(pointer, &self.request);
            }
        }
    }

    fn begin(&mut self, target: Option<HitTarget>, local: Pos2) {
        let started = match target {
            Some(HitTarget::Axis(dimension)) => {
                self.layers.set_highlight(None, &self.request);
                self.controller.begin_axis_drag(dimension)
            }
            Some(HitTarget::Brush(dimension)) => self.controller.begin_brush(dimension, local.y),
            _ => return,
        };
        match started {
            Ok(()) => self.press = target,
            Err(err) => warn!(%err, "gesture refused"),
        }
    }

    /// End the current gesture; false when there was none
    fn finish(&mut self) -> bool {
        match self.press.take() {
            Some(HitTarget::Axis(_)) => match self.controller.end_axis_drag() {
                Ok((outcome, request)) => {
                    debug!(?outcome, "axis released");
                    self.apply(request, true);
                }
                Err(err) => warn!(%err, "axis release ignored"),
            },
            Some(HitTarget::Brush(_)) => match self.controller.end_brush() {
                Ok(Some(request)) => self.apply(request, false),
                Ok(None) => {}
                Err(err) => warn!(%err, "brush release ignored"),
            },
            _ => return false,
        }
        true
    }

    fn draw_axes(&self, painter: &Painter, rect: Rect, axes: &[(DimensionId, f32)]) {
        let state = self.controller.state();
        if state.presentation().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "All axes removed. Reset axes to bring them back.",
                FontId::proportional(14.0),
                Color32::from_gray(160),
            );
            return;
        }

        let armed = self
            .controller
            .dragging()
            .filter(|_| self.controller.removal_armed());

        for (index, axis) in state.presentation().iter().enumerate() {
            let Some(&(_, local_x)) = axes.iter().find(|(d, _)| *d == axis.dimension) else {
                continue;
            };
            let x = rect.left() + local_x;
            let (strip_left, strip_right) = brush_strip(x);

            if armed == Some(axis.dimension) {
                painter.rect_filled(
                    Rect::from_min_max(Pos2::new(strip_left, rect.top()), Pos2::new(strip_right, rect.bottom())),
                    Rounding::ZERO,
                    REMOVAL_TINT,
                );
            }

            // Draw axis line
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, Color32::from_gray(200)),
            );

            for tick in axis.ticks.iter().filter(|t| t.visible) {
                let y = rect.top() + tick.position;
                painter.line_segment(
                    [Pos2::new(x - 6.0, y), Pos2::new(x, y)],
                    Stroke::new(1.0, Color32::from_gray(180)),
                );
                painter.text(
                    Pos2::new(x - 9.0, y),
                    Align2::RIGHT_CENTER,
                    &tick.label,
                    FontId::proportional(9.0),
                    Color32::from_gray(150),
                );
            }

            if let Some(entry) = state.registry().get(axis.dimension) {
                if let Some((top, bottom)) = entry.brush().pixel_span(entry.space(), entry.scale()) {
                    let brush_rect = Rect::from_min_max(
                        Pos2::new(strip_left, rect.top() + top),
                        Pos2::new(strip_right, rect.top() + bottom),
                    );
                    painter.rect_filled(brush_rect, Rounding::ZERO, Color32::from_rgba_unmultiplied(255, 200, 0, 50));
                    painter.rect_stroke(brush_rect, Rounding::ZERO, Stroke::new(2.0, Color32::from_rgb(255, 200, 0)));
                }
            }

            // Neighbouring labels alternate height so long names don't collide
            let lift = if index % 2 == 0 { 14.0 } else { 30.0 };
            let (font, color) = if axis.bold {
                (FontId::proportional(13.0), Color32::WHITE)
            } else {
                (FontId::proportional(12.0), Color32::from_gray(200))
            };
            let label = painter.text(
                Pos2::new(x, rect.top() - lift),
                Align2::CENTER_BOTTOM,
                &*axis.name,
                font,
                color,
            );
            if axis.inverted {
                painter.line_segment([label.left_bottom(), label.right_bottom()], Stroke::new(1.0, color));
            }
        }
    }

    fn context_menu(&mut self, response: Response) -> Response {
        response.context_menu(|ui| {
            if ui.button("Clear Brushes").clicked() {
                self.clear_brushes();
                ui.close_menu();
            }

            if ui.button("Reset Axes").clicked() {
                self.reset_axes();
                ui.close_menu();
            }

            if ui.button("Rescale").clicked() {
                self.rescale();
                ui.close_menu();
            }

            let axes: Vec<(DimensionId, String)> = self
                .controller
                .state()
                .presentation()
                .iter()
                .map(|a| (a.dimension, a.name.to_string()))
                .collect();
            if axes.is_empty() {
                return;
            }
            ui.separator();

            ui.menu_button("Invert Axis", |ui| {
                for (dimension, name) in &axes {
                    if ui.button(name).clicked() {
                        match self.controller.invert_axis(*dimension) {
                            Ok(request) => self.apply(request, true),
                            Err(err) => warn!(%err, "invert refused"),
                        }
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Remove Axis", |ui| {
                for (dimension, name) in &axes {
                    if ui.button(name).clicked() {
                        self.press = None;
                        match self.controller.remove_axis(*dimension) {
                            Ok(request) => self.apply(request, true),
                            Err(err) => warn!(%err, "remove refused"),
                        }
                        ui.close_menu();
                    }
                }
            });
        })
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Value::Number(v) => format!("{v:.2}"),
        Value::Category(token) => token.to_string(),
    }
}

/// Tooltip text for one record: its value on every visible axis, in axis
/// order, then its color label
pub fn describe_record(state: &ChartState, index: usize) -> Option<String> {
    let record = state.dataset().records().get(index)?;
    let mut lines: Vec<String> = state
        .presentation()
        .iter()
        .filter_map(|axis| {
            let value = record.value(axis.dimension)?;
            Some(format!("{}: {}", axis.name, format_value(value)))
        })
        .collect();
    if let Some(label) = record.label.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("Group: {label}"));
    }
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::{FieldKind, Record};

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::new(
            vec![
                ("Route".to_string(), FieldKind::Quantitative),
                ("Delay".to_string(), FieldKind::Qualitative),
            ],
            vec![
                Record::new(vec![Value::Category("A".into()), Value::Number(-2.0)]).with_label("Load"),
                Record::new(vec![Value::Category("B".into()), Value::Number(0.25)]),
            ],
        ))
    }

    #[test]
    fn test_describe_record_follows_axis_order() {
        let controller = InteractionController::new(dataset(), Viewport::new(800.0, 600.0), ChartSettings::default());

        // axes sorted by name: Delay, Route
        let text = describe_record(controller.state(), 0).unwrap();
        assert_eq!(text, "Delay: -2\nRoute: A\nGroup: Load");

        let text = describe_record(controller.state(), 1).unwrap();
        assert_eq!(text, "Delay: 0.25\nRoute: B");

        assert!(describe_record(controller.state(), 5).is_none());
    }

    #[test]
    fn test_removed_axis_left_out_of_tooltip() {
        let mut controller = InteractionController::new(dataset(), Viewport::new(800.0, 600.0), ChartSettings::default());
        controller.remove_axis(DimensionId(0)).unwrap();

        let text = describe_record(controller.state(), 1).unwrap();
        assert_eq!(text, "Delay: 0.25");
    }

    #[test]
    fn test_new_view_starts_full_pass() {
        let view = ParallelCoordinatesView::new("chart", dataset(), ChartSettings::default(), ColorTable::default());
        assert_eq!(view.render_status(), RenderStatus::Drawing { drawn: 0, total: 2 });
        assert_eq!(view.summary().selected, 2);
        assert_eq!(view.summary().dimensions, 2);
    }

    #[test]
    fn test_toolbar_actions_restart_rendering() {
        let mut view = ParallelCoordinatesView::new("chart", dataset(), ChartSettings::default(), ColorTable::default());
        let before = view.controller().state().generation().current();

        view.clear_brushes();
        view.rescale();
        view.reset_axes();

        assert_eq!(view.controller().state().generation().current(), before + 3);
        assert!(view.render_status().is_drawing());
    }
}
