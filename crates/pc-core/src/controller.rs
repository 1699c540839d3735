//! Pointer gestures turned into chart mutations
//!
//! Every mutation bumps the generation before it produces a
//! [`RenderRequest`], so any batched draw still running for an older
//! state stops at its next yield point.

use std::sync::Arc;
use tracing::{debug, info};

use crate::brush::Brush;
use crate::model::{Dataset, DimensionId};
use crate::settings::ChartSettings;
use crate::state::{ChartState, RenderRequest, Viewport};
use crate::ChartError;

/// Pixels from a brush edge that still grab the edge
const EDGE_GRAB: f32 = 4.0;

/// How an axis drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDragOutcome {
    /// Released without moving; the axis flipped
    Inverted,
    /// Settled at its sorted slot
    Reordered,
    /// Dropped inside the edge margin and removed
    Removed,
}

/// Live state reported back on every drag frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    /// Clamped live position of the dragged axis
    pub x: f32,
    /// Releasing now would remove the axis
    pub removal_armed: bool,
}

#[derive(Debug, Clone, Copy)]
struct AxisDrag {
    dimension: DimensionId,
    x: f32,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
enum BrushMode {
    Create { anchor: f32 },
    Move { grab: f32, top: f32, bottom: f32 },
    Resize { fixed: f32 },
}

#[derive(Debug, Clone, Copy)]
struct BrushGesture {
    dimension: DimensionId,
    mode: BrushMode,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Axis(AxisDrag),
    Brush(BrushGesture),
}

/// Owns the chart state and applies gestures to it
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: ChartState,
    gesture: Option<Gesture>,
}

impl InteractionController {
    pub fn new(dataset: Arc<Dataset>, viewport: Viewport, settings: ChartSettings) -> Self {
        Self {
            state: ChartState::new(dataset, viewport, settings),
            gesture: None,
        }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Dimension of the axis being dragged, if any
    pub fn dragging(&self) -> Option<DimensionId> {
        match self.gesture {
            Some(Gesture::Axis(drag)) => Some(drag.dimension),
            _ => None,
        }
    }

    /// Whether the axis being dragged would be removed on release
    pub fn removal_armed(&self) -> bool {
        match self.gesture {
            Some(Gesture::Axis(drag)) => drag.moved && self.in_removal_zone(drag.x),
            _ => false,
        }
    }

    /// Dimension of the axis being brushed, if any
    pub fn brushing(&self) -> Option<DimensionId> {
        match self.gesture {
            Some(Gesture::Brush(gesture)) => Some(gesture.dimension),
            _ => None,
        }
    }

    fn in_removal_zone(&self, x: f32) -> bool {
        self.state
            .layout()
            .in_removal_zone(x, self.state.settings().edge_margin)
    }

    fn check_visible(&self, dimension: DimensionId) -> Result<(), ChartError> {
        let Some(dim) = self.state.dataset().dimension(dimension) else {
            return Err(ChartError::UnknownDimension(format!("#{}", dimension.index())));
        };
        if !self.state.layout().contains(dimension) {
            return Err(ChartError::HiddenDimension(dim.name.to_string()));
        }
        Ok(())
    }

    /// Re-run the filter under a fresh generation
    pub fn refresh(&mut self) -> RenderRequest {
        self.state.refresh()
    }

    pub fn begin_axis_drag(&mut self, dimension: DimensionId) -> Result<(), ChartError> {
        self.check_visible(dimension)?;
        let x = self
            .state
            .layout()
            .position(dimension)
            .ok_or_else(|| ChartError::HiddenDimension(format!("#{}", dimension.index())))?;

        debug!(dimension = dimension.index(), x, "axis drag started");
        self.gesture = Some(Gesture::Axis(AxisDrag {
            dimension,
            x,
            moved: false,
        }));
        Ok(())
    }

    /// Move the dragged axis by `dx` pixels and re-sort the layout
    pub fn drag_axis(&mut self, dx: f32) -> Result<DragFeedback, ChartError> {
        let Some(Gesture::Axis(mut drag)) = self.gesture else {
            return Err(ChartError::NoGesture);
        };

        let x = self
            .state
            .layout_mut()
            .reorder(drag.dimension, drag.x + dx)
            .ok_or(ChartError::NoGesture)?;
        drag.x = x;
        drag.moved = true;
        self.gesture = Some(Gesture::Axis(drag));
        self.state.generation().bump();

        Ok(DragFeedback {
            x,
            removal_armed: self.in_removal_zone(x),
        })
    }

    /// Release the dragged axis
    ///
    /// A release without movement inverts the axis. Otherwise the axis is
    /// removed if it was dropped within the edge margin, or settles at its
    /// sorted slot. Brushes on the other axes are kept either way.
    pub fn end_axis_drag(&mut self) -> Result<(AxisDragOutcome, RenderRequest), ChartError> {
        let Some(Gesture::Axis(drag)) = self.gesture else {
            return Err(ChartError::NoGesture);
        };
        self.gesture = None;

        let outcome = if !drag.moved {
            self.state.layout_mut().commit(drag.dimension);
            self.state.registry_mut().invert(drag.dimension);
            AxisDragOutcome::Inverted
        } else if self.in_removal_zone(drag.x) {
            self.state.remove_dimension(drag.dimension);
            info!(
                dimension = drag.dimension.index(),
                remaining = self.state.layout().len(),
                "axis removed"
            );
            AxisDragOutcome::Removed
        } else {
            self.state.layout_mut().commit(drag.dimension);
            AxisDragOutcome::Reordered
        };

        debug!(dimension = drag.dimension.index(), ?outcome, "axis drag ended");
        Ok((outcome, self.state.refresh()))
    }

    /// Flip an axis outside of a drag
    pub fn invert_axis(&mut self, dimension: DimensionId) -> Result<RenderRequest, ChartError> {
        self.check_visible(dimension)?;
        self.state.registry_mut().invert(dimension);
        Ok(self.state.refresh())
    }

    /// Drop an axis outside of a drag
    pub fn remove_axis(&mut self, dimension: DimensionId) -> Result<RenderRequest, ChartError> {
        self.check_visible(dimension)?;
        if self.dragging() == Some(dimension) || self.brushing() == Some(dimension) {
            self.gesture = None;
        }
        self.state.remove_dimension(dimension);
        info!(dimension = dimension.index(), remaining = self.state.layout().len(), "axis removed");
        Ok(self.state.refresh())
    }

    /// Replace the brush of a visible axis
    pub fn set_brush(&mut self, dimension: DimensionId, brush: Brush) -> Result<RenderRequest, ChartError> {
        self.check_visible(dimension)?;
        self.state.registry_mut().set_brush(dimension, brush);
        Ok(self.state.refresh())
    }

    /// Press on an axis's brush strip at chart-local `y`
    ///
    /// Pressing near an edge of the current extent resizes it, inside it
    /// moves it, anywhere else starts a new one.
    pub fn begin_brush(&mut self, dimension: DimensionId, y: f32) -> Result<(), ChartError> {
        self.check_visible(dimension)?;
        let entry = self
            .state
            .registry()
            .get(dimension)
            .ok_or_else(|| ChartError::HiddenDimension(format!("#{}", dimension.index())))?;

        // an extent reaching past the domain is grabbed by its visible part
        let height = self.state.viewport().height.max(0.0);
        let span = entry
            .brush()
            .pixel_span(entry.space(), entry.scale())
            .map(|(top, bottom)| (top.clamp(0.0, height), bottom.clamp(0.0, height)));
        let mode = match span {
            Some((top, bottom)) if (y - top).abs() <= EDGE_GRAB => BrushMode::Resize { fixed: bottom },
            Some((top, bottom)) if (y - bottom).abs() <= EDGE_GRAB => BrushMode::Resize { fixed: top },
            Some((top, bottom)) if top <= y && y <= bottom => BrushMode::Move { grab: y, top, bottom },
            _ => BrushMode::Create { anchor: y },
        };

        debug!(dimension = dimension.index(), y, ?mode, "brush started");
        self.gesture = Some(Gesture::Brush(BrushGesture {
            dimension,
            mode,
            moved: false,
        }));
        Ok(())
    }

    /// Continue the brush gesture to chart-local `y`, filtering live
    pub fn brush_to(&mut self, y: f32) -> Result<RenderRequest, ChartError> {
        let Some(Gesture::Brush(mut gesture)) = self.gesture else {
            return Err(ChartError::NoGesture);
        };
        let height = self.state.viewport().height.max(0.0);
        let y = y.clamp(0.0, height);

        let (a, b) = match gesture.mode {
            BrushMode::Create { anchor } => (anchor.clamp(0.0, height), y),
            BrushMode::Resize { fixed } => (fixed, y),
            BrushMode::Move { grab, top, bottom } => {
                let dy = (y - grab).max(-top).min(height - bottom);
                (top + dy, bottom + dy)
            }
        };

        let entry = self
            .state
            .registry()
            .get(gesture.dimension)
            .ok_or(ChartError::NoGesture)?;
        let brush = if a == b {
            Brush::Empty
        } else {
            Brush::from_pixels(a.min(b), a.max(b), entry.space(), entry.scale())
        };

        self.state.registry_mut().set_brush(gesture.dimension, brush);
        gesture.moved = true;
        self.gesture = Some(Gesture::Brush(gesture));
        Ok(self.state.refresh())
    }

    /// Release the brush. A click that never moved on empty strip area
    /// clears the axis's brush.
    pub fn end_brush(&mut self) -> Result<Option<RenderRequest>, ChartError> {
        let Some(Gesture::Brush(gesture)) = self.gesture else {
            return Err(ChartError::NoGesture);
        };
        self.gesture = None;

        match gesture.mode {
            BrushMode::Create { .. } if !gesture.moved => {
                self.state.registry_mut().set_brush(gesture.dimension, Brush::Empty);
                debug!(dimension = gesture.dimension.index(), "brush cleared");
                Ok(Some(self.state.refresh()))
            }
            _ => Ok(None),
        }
    }

    /// Empty every brush
    pub fn clear_brushes(&mut self) -> RenderRequest {
        self.state.registry_mut().clear_brushes();
        self.state.refresh()
    }

    /// Fit the chart to a new viewport; brushes do not survive
    pub fn resize(&mut self, viewport: Viewport) -> RenderRequest {
        info!(width = viewport.width, height = viewport.height, "chart resized");
        if matches!(self.gesture, Some(Gesture::Brush(_))) {
            self.gesture = None;
        }
        self.state.resize(viewport);
        self.state.refresh()
    }

    /// Rebuild every scale's domain from the full dataset
    pub fn rescale(&mut self) -> RenderRequest {
        info!(records = self.state.dataset().len(), "scales rebuilt");
        self.state.rescale();
        self.state.refresh()
    }

    /// Restore every loaded dimension in its initial order
    pub fn reset_axes(&mut self) -> RenderRequest {
        info!(dimensions = self.state.dataset().dimensions().len(), "axes reset");
        self.gesture = None;
        self.state.reset_axes();
        self.state.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, Record, Value};

    fn controller() -> InteractionController {
        let data = Dataset::new(
            vec![
                ("Route".to_string(), FieldKind::Quantitative),
                ("Delay".to_string(), FieldKind::Qualitative),
                ("Ffes".to_string(), FieldKind::Qualitative),
            ],
            vec![
                Record::new(vec![Value::Category("A".into()), Value::Number(-2.0), Value::Number(1.0)]),
                Record::new(vec![Value::Category("B".into()), Value::Number(0.0), Value::Number(2.0)]),
                Record::new(vec![Value::Category("C".into()), Value::Number(5.0), Value::Number(3.0)]),
            ],
        );
        let settings = ChartSettings {
            sort_axes: false,
            ..ChartSettings::default()
        };
        InteractionController::new(Arc::new(data), Viewport::new(600.0, 500.0), settings)
    }

    const ROUTE: DimensionId = DimensionId(0);
    const DELAY: DimensionId = DimensionId(1);
    const FFES: DimensionId = DimensionId(2);

    #[test]
    fn test_scenario_delay_brush() {
        let mut controller = controller();
        let request = controller.set_brush(DELAY, Brush::range(-1.0, 6.0)).unwrap();
        assert_eq!(&request.selection[..], &[1, 2]);
        assert!(controller.state().presentation()[1].bold);
        assert!(!controller.state().presentation()[0].bold);
    }

    #[test]
    fn test_click_without_movement_inverts() {
        let mut controller = controller();
        controller.set_brush(DELAY, Brush::range(-1.0, 6.0)).unwrap();
        let before = controller.state().registry().scale(DELAY).unwrap().range();

        controller.begin_axis_drag(DELAY).unwrap();
        let (outcome, request) = controller.end_axis_drag().unwrap();

        assert_eq!(outcome, AxisDragOutcome::Inverted);
        let scale = controller.state().registry().scale(DELAY).unwrap();
        assert!(scale.is_inverted());
        assert_eq!(scale.range(), (before.1, before.0));
        // the extent carries over verbatim
        assert_eq!(controller.state().registry().brush(DELAY), Brush::range(-1.0, 6.0));
        assert_eq!(&request.selection[..], &[1, 2]);
    }

    #[test]
    fn test_drag_reorders_and_bumps_generation() {
        let mut controller = controller();
        let start = controller.state().generation().current();

        controller.begin_axis_drag(ROUTE).unwrap();
        // slots at 100, 300, 500
        let feedback = controller.drag_axis(250.0).unwrap();
        assert_eq!(feedback.x, 350.0);
        assert!(!feedback.removal_armed);
        assert_eq!(controller.dragging(), Some(ROUTE));
        assert_eq!(controller.state().layout().order(), &[DELAY, ROUTE, FFES]);
        assert!(controller.state().generation().current() > start);

        let (outcome, request) = controller.end_axis_drag().unwrap();
        assert_eq!(outcome, AxisDragOutcome::Reordered);
        assert_eq!(controller.dragging(), None);
        assert_eq!(request.projection.axes()[1].dimension, ROUTE);
        assert_eq!(request.projection.axes()[1].x, 300.0);
    }

    #[test]
    fn test_drag_to_edge_removes_axis_and_keeps_other_brushes() {
        let mut controller = controller();
        controller.set_brush(DELAY, Brush::range(-1.0, 6.0)).unwrap();

        controller.begin_axis_drag(FFES).unwrap();
        let feedback = controller.drag_axis(200.0).unwrap();
        assert_eq!(feedback.x, 600.0);
        assert!(feedback.removal_armed);
        assert!(controller.removal_armed());

        let (outcome, request) = controller.end_axis_drag().unwrap();
        assert_eq!(outcome, AxisDragOutcome::Removed);
        assert_eq!(controller.state().layout().order(), &[ROUTE, DELAY]);
        assert!(!controller.state().registry().contains(FFES));
        assert_eq!(controller.state().registry().brush(DELAY), Brush::range(-1.0, 6.0));
        assert_eq!(request.projection.axes().len(), 2);
        assert_eq!(&request.selection[..], &[1, 2]);

        assert!(matches!(
            controller.begin_axis_drag(FFES),
            Err(ChartError::HiddenDimension(_))
        ));
    }

    #[test]
    fn test_drag_back_out_of_margin_disarms_removal() {
        let mut controller = controller();
        controller.begin_axis_drag(ROUTE).unwrap();
        assert!(controller.drag_axis(-95.0).unwrap().removal_armed);
        assert!(!controller.drag_axis(50.0).unwrap().removal_armed);

        let (outcome, _) = controller.end_axis_drag().unwrap();
        assert_eq!(outcome, AxisDragOutcome::Reordered);
        assert_eq!(controller.state().layout().len(), 3);
    }

    #[test]
    fn test_unknown_dimension_leaves_state_untouched() {
        let mut controller = controller();
        let generation = controller.state().generation().current();
        assert!(matches!(
            controller.set_brush(DimensionId(42), Brush::range(0.0, 1.0)),
            Err(ChartError::UnknownDimension(_))
        ));
        assert_eq!(controller.state().generation().current(), generation);
        assert_eq!(controller.drag_axis(3.0), Err(ChartError::NoGesture));
        assert!(controller.end_brush().is_err());
    }

    #[test]
    fn test_live_brushing_filters_every_move() {
        let mut controller = controller();
        // Delay spans -2..5 over 500px, so 0 sits at 500 - 2/7*500
        controller.begin_brush(DELAY, 0.0).unwrap();

        let first = controller.brush_to(100.0).unwrap();
        assert_eq!(&first.selection[..], &[2]);

        let second = controller.brush_to(400.0).unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(&second.selection[..], &[1, 2]);

        assert!(controller.end_brush().unwrap().is_none());
        let extent = controller.state().registry().brush(DELAY).extent().unwrap();
        assert!((extent.hi() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_brush_move_and_clear() {
        let mut controller = controller();
        controller.begin_brush(DELAY, 0.0).unwrap();
        controller.brush_to(100.0).unwrap();
        controller.end_brush().unwrap();

        // grab the middle and slide the whole extent down by 300px
        controller.begin_brush(DELAY, 50.0).unwrap();
        let request = controller.brush_to(350.0).unwrap();
        controller.end_brush().unwrap();
        let extent = controller.state().registry().brush(DELAY).extent().unwrap();
        assert!((extent.lo() + 0.6).abs() < 1e-3);
        assert!((extent.hi() - 0.8).abs() < 1e-3);
        assert_eq!(&request.selection[..], &[1]);

        // a click outside the extent clears it
        controller.begin_brush(DELAY, 10.0).unwrap();
        let cleared = controller.end_brush().unwrap().unwrap();
        assert!(controller.state().registry().brush(DELAY).is_empty());
        assert_eq!(cleared.selection.len(), 3);
    }

    #[test]
    fn test_move_brush_wider_than_domain() {
        let mut controller = controller();
        controller.set_brush(DELAY, Brush::range(-3.0, 6.0)).unwrap();

        // spans the whole axis, so there is nowhere to slide it
        controller.begin_brush(DELAY, 250.0).unwrap();
        let request = controller.brush_to(260.0).unwrap();
        controller.end_brush().unwrap();
        let extent = controller.state().registry().brush(DELAY).extent().unwrap();
        assert!((extent.lo() + 2.0).abs() < 1e-3);
        assert!((extent.hi() - 5.0).abs() < 1e-3);
        assert_eq!(request.selection.len(), 3);
    }

    #[test]
    fn test_move_brush_past_one_end_follows_pointer() {
        let mut controller = controller();
        // top overshoots the chart, bottom sits at ~428.6px
        controller.set_brush(DELAY, Brush::range(-1.0, 6.0)).unwrap();

        controller.begin_brush(DELAY, 200.0).unwrap();
        controller.brush_to(225.0).unwrap();
        let request = controller.brush_to(250.0).unwrap();
        controller.end_brush().unwrap();

        // visible part 0..428.6 slid down 50px
        let extent = controller.state().registry().brush(DELAY).extent().unwrap();
        assert!((extent.hi() - 4.3).abs() < 1e-3);
        assert!((extent.lo() + 1.7).abs() < 1e-3);
        assert_eq!(&request.selection[..], &[1]);
    }

    #[test]
    fn test_drag_without_horizontal_travel_does_not_invert() {
        let mut controller = controller();
        let before = controller.state().registry().scale(DELAY).unwrap().range();

        controller.begin_axis_drag(DELAY).unwrap();
        let feedback = controller.drag_axis(0.0).unwrap();
        assert_eq!(feedback.x, 300.0);
        let (outcome, _) = controller.end_axis_drag().unwrap();

        assert_eq!(outcome, AxisDragOutcome::Reordered);
        assert_eq!(controller.state().registry().scale(DELAY).unwrap().range(), before);
        assert_eq!(controller.state().layout().order(), &[ROUTE, DELAY, FFES]);
    }

    #[test]
    fn test_brush_resize_from_edge() {
        let mut controller = controller();
        controller.begin_brush(DELAY, 0.0).unwrap();
        controller.brush_to(100.0).unwrap();
        controller.end_brush().unwrap();

        controller.begin_brush(DELAY, 102.0).unwrap();
        let request = controller.brush_to(450.0).unwrap();
        controller.end_brush().unwrap();

        let (top, bottom) = {
            let entry = controller.state().registry().get(DELAY).unwrap();
            entry.brush().pixel_span(entry.space(), entry.scale()).unwrap()
        };
        assert!(top.abs() < 1e-3);
        assert!((bottom - 450.0).abs() < 1e-3);
        assert_eq!(&request.selection[..], &[1, 2]);
    }

    #[test]
    fn test_resize_resets_brushes_and_moves_axes() {
        let data = controller().state().dataset().clone();
        let settings = ChartSettings {
            sort_axes: false,
            ..ChartSettings::default()
        };
        let mut controller = InteractionController::new(data, Viewport::new(800.0, 600.0), settings);
        controller.set_brush(DELAY, Brush::range(-1.0, 6.0)).unwrap();
        let before = controller.state().generation().current();

        let request = controller.resize(Viewport::new(1200.0, 800.0));

        assert!(controller.state().registry().brush(DELAY).is_empty());
        assert!(request.generation > before);
        assert_eq!(request.selection.len(), 3);
        let xs: Vec<f32> = request.projection.axes().iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![200.0, 600.0, 1000.0]);
        assert_eq!(
            controller.state().registry().scale(DELAY).unwrap().range(),
            (800.0, 0.0)
        );
    }

    #[test]
    fn test_rescale_keeps_inversion() {
        let mut controller = controller();
        controller.invert_axis(FFES).unwrap();
        controller.set_brush(FFES, Brush::range(1.0, 2.0)).unwrap();

        let request = controller.rescale();
        assert!(controller.state().registry().scale(FFES).unwrap().is_inverted());
        assert_eq!(controller.state().registry().brushed_count(), 0);
        assert_eq!(request.selection.len(), 3);
    }

    #[test]
    fn test_reset_axes_restores_removed_dimensions() {
        let mut controller = controller();
        controller.remove_axis(ROUTE).unwrap();
        controller.invert_axis(DELAY).unwrap();
        assert_eq!(controller.state().layout().len(), 2);

        let request = controller.reset_axes();
        assert_eq!(controller.state().layout().order(), &[ROUTE, DELAY, FFES]);
        assert!(!controller.state().registry().scale(DELAY).unwrap().is_inverted());
        assert_eq!(request.projection.axes().len(), 3);
    }

    #[test]
    fn test_every_mutation_bumps_generation() {
        let mut controller = controller();
        let mut last = controller.state().generation().current();
        let mut check = |generation: u64| {
            assert!(generation > last);
            last = generation;
        };

        check(controller.refresh().generation);
        check(controller.clear_brushes().generation);
        check(controller.invert_axis(DELAY).unwrap().generation);
        check(controller.rescale().generation);
        check(controller.resize(Viewport::new(300.0, 300.0)).generation);
        check(controller.remove_axis(FFES).unwrap().generation);
    }
}
