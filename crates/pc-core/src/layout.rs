//! Horizontal placement of the visible axes

use crate::model::DimensionId;

/// An axis being dragged and its live, clamped position
#[derive(Debug, Clone, Copy, PartialEq)]
struct LiveDrag {
    dimension: DimensionId,
    x: f32,
}

/// Ordered visible dimensions spread across the chart width
///
/// Settled positions are evenly spaced with half a step of padding at
/// each edge. While an axis is dragged its live position overrides its
/// slot and the order is re-sorted every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    order: Vec<DimensionId>,
    width: f32,
    dragging: Option<LiveDrag>,
}

impl AxisLayout {
    pub fn new(order: Vec<DimensionId>, width: f32) -> Self {
        Self {
            order,
            width,
            dragging: None,
        }
    }

    /// Visible dimensions, left to right
    pub fn order(&self) -> &[DimensionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn contains(&self, dimension: DimensionId) -> bool {
        self.order.contains(&dimension)
    }

    pub fn index_of(&self, dimension: DimensionId) -> Option<usize> {
        self.order.iter().position(|&d| d == dimension)
    }

    /// The dimension currently being dragged
    pub fn dragging(&self) -> Option<DimensionId> {
        self.dragging.map(|d| d.dimension)
    }

    fn slot_x(&self, index: usize) -> f32 {
        let n = self.order.len().max(1) as f32;
        self.width / n * (index as f32 + 0.5)
    }

    /// Slot position of a dimension in the current order
    pub fn settled_x(&self, dimension: DimensionId) -> Option<f32> {
        self.index_of(dimension).map(|i| self.slot_x(i))
    }

    /// Where a dimension is drawn right now: its live drag position if it
    /// is being dragged, its slot otherwise
    pub fn position(&self, dimension: DimensionId) -> Option<f32> {
        match self.dragging {
            Some(live) if live.dimension == dimension && self.contains(dimension) => Some(live.x),
            _ => self.settled_x(dimension),
        }
    }

    /// Move `dimension` to `target_x` (clamped to the chart) and re-sort
    /// every axis by its effective position. Returns the clamped position.
    pub fn reorder(&mut self, dimension: DimensionId, target_x: f32) -> Option<f32> {
        if !self.contains(dimension) {
            return None;
        }
        let x = target_x.clamp(0.0, self.width.max(0.0));
        self.dragging = Some(LiveDrag { dimension, x });

        let mut keyed: Vec<(f32, DimensionId)> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, &d)| (if d == dimension { x } else { self.slot_x(i) }, d))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.order = keyed.into_iter().map(|(_, d)| d).collect();

        Some(x)
    }

    /// End a drag, leaving the axis at its sorted slot
    pub fn commit(&mut self, dimension: DimensionId) -> Option<f32> {
        if self.dragging.map(|d| d.dimension) == Some(dimension) {
            self.dragging = None;
        }
        self.settled_x(dimension)
    }

    /// Drop a dimension from the visible sequence
    pub fn remove(&mut self, dimension: DimensionId) -> bool {
        let Some(index) = self.index_of(dimension) else {
            return false;
        };
        self.order.remove(index);
        if self.dragging.map(|d| d.dimension) == Some(dimension) {
            self.dragging = None;
        }
        true
    }

    /// Whether `x` lies within `margin` of either edge
    pub fn in_removal_zone(&self, x: f32, margin: f32) -> bool {
        x < margin || x > self.width - margin
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        if let Some(live) = self.dragging.as_mut() {
            live.x = live.x.clamp(0.0, width.max(0.0));
        }
    }

    /// Replace the sequence, dropping any drag in progress
    pub fn reset(&mut self, order: Vec<DimensionId>) {
        self.order = order;
        self.dragging = None;
    }
}
