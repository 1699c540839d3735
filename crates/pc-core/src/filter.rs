//! Brush evaluation and the axis presentation derived from it

use std::sync::Arc;

use crate::brush::{BrushSpace, Extent};
use crate::layout::AxisLayout;
use crate::model::{Dataset, DimensionId, Record, Value};
use crate::registry::AxisRegistry;
use crate::scale::Scale;

/// A non-empty brush, ready to test records against
#[derive(Debug, Clone)]
pub struct ActiveFilter {
    pub dimension: DimensionId,
    pub space: BrushSpace,
    pub extent: Extent,
    pub scale: Arc<Scale>,
}

impl ActiveFilter {
    /// Test a single value under this filter's comparison space
    pub fn admits_value(&self, value: &Value) -> bool {
        match self.space {
            BrushSpace::Domain => value.as_number().map_or(false, |v| self.extent.contains(v)),
            BrushSpace::Pixel => self
                .scale
                .position(value)
                .map_or(false, |px| self.extent.contains(px as f64)),
        }
    }

    pub fn admits(&self, record: &Record) -> bool {
        record
            .value(self.dimension)
            .map_or(false, |v| self.admits_value(v))
    }
}

/// All brushed dimensions, in layout order
pub fn active_filters(layout: &AxisLayout, registry: &AxisRegistry) -> Vec<ActiveFilter> {
    layout
        .order()
        .iter()
        .filter_map(|&dimension| {
            let entry = registry.get(dimension)?;
            let extent = entry.brush().extent()?;
            Some(ActiveFilter {
                dimension,
                space: entry.space(),
                extent,
                scale: entry.scale().clone(),
            })
        })
        .collect()
}

/// Indices of the records that pass every filter
pub fn evaluate(records: &[Record], filters: &[ActiveFilter]) -> Vec<usize> {
    if filters.is_empty() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filters.iter().all(|f| f.admits(record)))
        .map(|(i, _)| i)
        .collect()
}

/// A tick label and whether the brush on its axis leaves it visible
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub label: String,
    pub position: f32,
    pub visible: bool,
}

/// How one axis should be drawn after the latest filter pass
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPresentation {
    pub dimension: DimensionId,
    pub name: Arc<str>,
    /// The axis carries an active brush
    pub bold: bool,
    pub inverted: bool,
    pub ticks: Vec<TickLabel>,
}

/// Derive labels and tick visibility for every visible axis
pub fn presentation(
    dataset: &Dataset,
    layout: &AxisLayout,
    registry: &AxisRegistry,
    filters: &[ActiveFilter],
    tick_count: usize,
) -> Vec<AxisPresentation> {
    layout
        .order()
        .iter()
        .filter_map(|&dimension| {
            let dim = dataset.dimension(dimension)?;
            let entry = registry.get(dimension)?;
            let filter = filters.iter().find(|f| f.dimension == dimension);

            let ticks = entry
                .scale()
                .ticks(tick_count)
                .into_iter()
                .map(|tick| {
                    let visible = filter.map_or(true, |f| match f.space {
                        BrushSpace::Domain => f.admits_value(&tick.value),
                        BrushSpace::Pixel => f.extent.contains(tick.position as f64),
                    });
                    TickLabel {
                        label: tick.label,
                        position: tick.position,
                        visible,
                    }
                })
                .collect();

            Some(AxisPresentation {
                dimension,
                name: dim.name.clone(),
                bold: filter.is_some(),
                inverted: entry.scale().is_inverted(),
                ticks,
            })
        })
        .collect()
}
