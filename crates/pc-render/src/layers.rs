//! The chart's three drawing layers

use egui::{Painter, Pos2, Vec2};
use tracing::debug;

use pc_core::{ColorTable, Generation, RenderRequest, RenderSettings};
use crate::adaptive::{AdaptiveRenderer, RenderStatus};
use crate::colors::{context_color, label_color};
use crate::curve::{nearest_record, CurvePath};
use crate::surface::ShapeSurface;
use crate::{LineStyle, Surface};

/// Foreground alpha while an axis is being dragged
pub const DRAG_DIM: f32 = 0.35;
/// Foreground alpha while a record is highlighted
pub const HIGHLIGHT_DIM: f32 = 0.25;
/// How close the pointer must come to a line to highlight it
pub const HOVER_DISTANCE: f32 = 10.0;

/// Background context, batched foreground and a single highlighted line
pub struct ChartLayers {
    foreground: AdaptiveRenderer<ShapeSurface>,
    background: ShapeSurface,
    highlight: ShapeSurface,
    highlighted: Option<usize>,
    colors: ColorTable,
    settings: RenderSettings,
    status: RenderStatus,
}

impl ChartLayers {
    pub fn new(generation: Generation, colors: ColorTable, settings: RenderSettings) -> Self {
        Self {
            foreground: AdaptiveRenderer::new(ShapeSurface::new(), generation, colors.clone(), &settings),
            background: ShapeSurface::new(),
            highlight: ShapeSurface::new(),
            highlighted: None,
            colors,
            settings,
            status: RenderStatus::Idle,
        }
    }

    /// Start a foreground pass for `request`
    pub fn submit(&mut self, request: RenderRequest) {
        self.status = RenderStatus::Drawing {
            drawn: 0,
            total: request.selection.len(),
        };
        self.foreground.submit(request);
    }

    /// Redraw every record faintly in one go; call when axis geometry
    /// changes
    pub fn redraw_background(&mut self, request: &RenderRequest) {
        self.background.clear();
        let style = LineStyle {
            color: context_color(self.settings.background_alpha),
            width: self.settings.line_width,
        };
        let projection = &request.projection;
        for (index, record) in request.dataset.records().iter().enumerate() {
            if let Some(path) = CurvePath::through(&projection.points(record), projection.overshoot()) {
                self.background.stroke(index, &path, style);
            }
        }
        debug!(lines = self.background.len(), "background redrawn");
    }

    /// Advance the foreground by one batch
    pub fn tick(&mut self) -> RenderStatus {
        let status = self.foreground.tick();
        if status != RenderStatus::Idle {
            self.status = status;
        }
        status
    }

    /// Whether another frame is needed to finish the foreground
    pub fn is_drawing(&self) -> bool {
        self.foreground.is_drawing()
    }

    /// Last reported foreground progress
    pub fn status(&self) -> RenderStatus {
        self.status
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Highlight the record under `pointer` (chart-local), or clear the
    /// highlight when nothing is close enough. Returns the highlighted
    /// record.
    pub fn hover(&mut self, pointer: Option<Pos2>, request: &RenderRequest) -> Option<usize> {
        let hit = pointer.and_then(|p| {
            nearest_record(
                &request.projection,
                &request.dataset,
                &request.selection,
                p,
                HOVER_DISTANCE,
            )
        });
        if hit != self.highlighted {
            self.set_highlight(hit, request);
        }
        hit
    }

    /// Draw one record at full emphasis, or clear the highlight
    pub fn set_highlight(&mut self, record: Option<usize>, request: &RenderRequest) {
        self.highlight.clear();
        self.highlighted = record;

        let Some(index) = record else {
            return;
        };
        let Some(path) = CurvePath::for_record(&request.projection, &request.dataset, index) else {
            return;
        };
        let label = request.dataset.records().get(index).and_then(|r| r.label.as_deref());
        let style = LineStyle {
            color: label_color(&self.colors, label, 1.0),
            width: self.settings.highlight_width,
        };
        self.highlight.stroke(index, &path, style);
    }

    pub fn foreground(&self) -> &ShapeSurface {
        self.foreground.surface()
    }

    pub fn background(&self) -> &ShapeSurface {
        &self.background
    }

    /// Foreground alpha given the current interaction
    pub fn foreground_opacity(&self, dragging: bool) -> f32 {
        if self.highlighted.is_some() {
            HIGHLIGHT_DIM
        } else if dragging {
            DRAG_DIM
        } else {
            1.0
        }
    }

    /// Paint background, foreground and highlight, bottom to top
    pub fn paint(&self, painter: &Painter, origin: Pos2, dragging: bool) {
        let offset: Vec2 = origin.to_vec2();
        self.background.paint(painter, offset, 1.0);
        self.foreground().paint(painter, offset, self.foreground_opacity(dragging));
        self.highlight.paint(painter, offset, 1.0);
    }
}
