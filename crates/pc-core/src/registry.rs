//! Scale and brush per visible dimension

use std::sync::Arc;
use ahash::AHashMap;
use tracing::debug;

use crate::brush::{Brush, BrushSpace};
use crate::model::{Dataset, DimensionId};
use crate::scale::Scale;

/// Everything the chart tracks for one axis
#[derive(Debug, Clone)]
pub struct AxisEntry {
    scale: Arc<Scale>,
    brush: Brush,
    space: BrushSpace,
}

impl AxisEntry {
    pub fn scale(&self) -> &Arc<Scale> {
        &self.scale
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn space(&self) -> BrushSpace {
        self.space
    }
}

/// Map from dimension to its live scale and brush
///
/// Scales are swapped as whole `Arc`s so readers never observe a scale
/// halfway through an update.
#[derive(Debug, Clone, Default)]
pub struct AxisRegistry {
    entries: AHashMap<DimensionId, AxisEntry>,
}

impl AxisRegistry {
    /// Build non-inverted scales with empty brushes for `dimensions`
    pub fn build(
        dataset: &Dataset,
        dimensions: impl IntoIterator<Item = DimensionId>,
        height: f32,
        padding: f64,
    ) -> Self {
        let entries = dimensions
            .into_iter()
            .filter_map(|id| dataset.dimension(id))
            .map(|dim| {
                let scale = Scale::build(dim, dataset.records(), height, false, padding);
                let entry = AxisEntry {
                    scale: Arc::new(scale),
                    brush: Brush::Empty,
                    space: dim.kind().into(),
                };
                (dim.id, entry)
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, id: DimensionId) -> Option<&AxisEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: DimensionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn scale(&self, id: DimensionId) -> Option<Arc<Scale>> {
        self.entries.get(&id).map(|e| e.scale.clone())
    }

    /// Brush of a dimension; unknown dimensions read as empty
    pub fn brush(&self, id: DimensionId) -> Brush {
        self.entries.get(&id).map(|e| e.brush).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of axes with an active brush
    pub fn brushed_count(&self) -> usize {
        self.entries.values().filter(|e| !e.brush.is_empty()).count()
    }

    pub(crate) fn set_brush(&mut self, id: DimensionId, brush: Brush) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.brush = brush;
                true
            }
            None => false,
        }
    }

    /// Flip the scale's range. The brush keeps its extent verbatim even
    /// though the coordinate system just flipped; the prior brush is
    /// returned.
    pub(crate) fn invert(&mut self, id: DimensionId) -> Option<Brush> {
        let entry = self.entries.get_mut(&id)?;
        let prior = entry.brush;
        entry.scale = Arc::new(entry.scale.flipped());
        entry.brush = prior;
        debug!(dimension = id.index(), inverted = entry.scale.is_inverted(), "axis inverted");
        Some(prior)
    }

    /// Refit every range to a new height; brushes do not survive
    pub(crate) fn resize(&mut self, height: f32) {
        for entry in self.entries.values_mut() {
            entry.scale = Arc::new(entry.scale.resized(height));
            entry.brush = Brush::Empty;
        }
    }

    /// Rebuild every domain from the dataset, keeping each axis's
    /// orientation; brushes are reset
    pub(crate) fn rescale(&mut self, dataset: &Dataset, height: f32, padding: f64) {
        for (id, entry) in self.entries.iter_mut() {
            let Some(dim) = dataset.dimension(*id) else {
                continue;
            };
            let inverted = entry.scale.is_inverted();
            entry.scale = Arc::new(Scale::build(dim, dataset.records(), height, inverted, padding));
            entry.brush = Brush::Empty;
        }
    }

    pub(crate) fn remove(&mut self, id: DimensionId) -> Option<AxisEntry> {
        self.entries.remove(&id)
    }

    pub(crate) fn clear_brushes(&mut self) {
        for entry in self.entries.values_mut() {
            entry.brush = Brush::Empty;
        }
    }
}
