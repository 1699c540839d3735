//! Chart state owned by the interaction controller

use std::sync::Arc;
use ahash::AHashMap;
use tracing::{debug, info};

use crate::filter::{self, AxisPresentation};
use crate::generation::Generation;
use crate::layout::AxisLayout;
use crate::model::{Dataset, DimensionId, Record};
use crate::registry::AxisRegistry;
use crate::scale::Scale;
use crate::settings::ChartSettings;

/// Pixel size of the plotting area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One axis as seen by the renderer
#[derive(Debug, Clone)]
pub struct ProjectedAxis {
    pub dimension: DimensionId,
    pub x: f32,
    pub scale: Arc<Scale>,
}

/// Snapshot of axis geometry used to turn records into curves
#[derive(Debug, Clone, Default)]
pub struct Projection {
    axes: Vec<ProjectedAxis>,
    overshoot: f32,
}

impl Projection {
    pub fn new(axes: Vec<ProjectedAxis>, overshoot: f32) -> Self {
        Self { axes, overshoot }
    }

    pub fn axes(&self) -> &[ProjectedAxis] {
        &self.axes
    }

    pub fn overshoot(&self) -> f32 {
        self.overshoot
    }

    /// Where a record crosses each axis, left to right. Values the scale
    /// cannot place sit at the start of the axis range.
    pub fn points(&self, record: &Record) -> Vec<(f32, f32)> {
        self.axes
            .iter()
            .map(|axis| {
                let y = record
                    .value(axis.dimension)
                    .and_then(|v| axis.scale.position(v))
                    .unwrap_or_else(|| axis.scale.range().0);
                (axis.x, y)
            })
            .collect()
    }
}

/// Everything a render pass needs, captured at the moment it was issued
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Generation the request was issued under
    pub generation: u64,
    pub dataset: Arc<Dataset>,
    /// Indices into `dataset.records()` to draw
    pub selection: Arc<[usize]>,
    pub projection: Projection,
}

/// Counts shown next to the chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSummary {
    /// Visible axes
    pub dimensions: usize,
    pub records: usize,
    pub selected: usize,
    pub brushed_axes: usize,
    /// Selected records per color label, sorted by label. Records without
    /// a label count under the empty string.
    pub selected_by_label: Vec<(Arc<str>, usize)>,
}

impl ChartSummary {
    /// Selected count for one label
    pub fn selected_with_label(&self, label: &str) -> usize {
        self.selected_by_label
            .iter()
            .find(|(l, _)| l.as_ref() == label)
            .map_or(0, |(_, n)| *n)
    }
}

/// The chart's mutable state
///
/// Mutators are crate-private; outside code changes the chart through
/// [`crate::InteractionController`], which bumps the generation before
/// asking for a new render.
#[derive(Debug, Clone)]
pub struct ChartState {
    dataset: Arc<Dataset>,
    initial_order: Vec<DimensionId>,
    layout: AxisLayout,
    registry: AxisRegistry,
    generation: Generation,
    viewport: Viewport,
    settings: ChartSettings,
    selection: Arc<[usize]>,
    presentation: Vec<AxisPresentation>,
}

impl ChartState {
    pub fn new(dataset: Arc<Dataset>, viewport: Viewport, settings: ChartSettings) -> Self {
        let mut initial_order: Vec<DimensionId> = dataset.dimensions().iter().map(|d| d.id).collect();
        if settings.sort_axes {
            initial_order.sort_by(|a, b| {
                let name = |id: &DimensionId| dataset.dimension(*id).map(|d| d.name.clone());
                name(a).cmp(&name(b))
            });
        }

        let layout = AxisLayout::new(initial_order.clone(), viewport.width);
        let registry = AxisRegistry::build(
            &dataset,
            initial_order.iter().copied(),
            viewport.height,
            settings.point_padding,
        );

        info!(
            dimensions = initial_order.len(),
            records = dataset.len(),
            width = viewport.width,
            height = viewport.height,
            "chart state created"
        );

        let mut state = Self {
            dataset,
            initial_order,
            layout,
            registry,
            generation: Generation::new(),
            viewport,
            settings,
            selection: Arc::from(Vec::new()),
            presentation: Vec::new(),
        };
        state.recompute();
        state
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn layout(&self) -> &AxisLayout {
        &self.layout
    }

    pub fn registry(&self) -> &AxisRegistry {
        &self.registry
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Records passing every brush as of the last recompute
    pub fn selection(&self) -> &Arc<[usize]> {
        &self.selection
    }

    /// Axis labels and ticks as of the last recompute
    pub fn presentation(&self) -> &[AxisPresentation] {
        &self.presentation
    }

    /// Look up a visible dimension by name
    pub fn visible_dimension(&self, name: &str) -> Option<DimensionId> {
        self.dataset
            .find(name)
            .map(|d| d.id)
            .filter(|id| self.layout.contains(*id))
    }

    /// Current axis geometry at settled positions
    pub fn projection(&self) -> Projection {
        let axes = self
            .layout
            .order()
            .iter()
            .filter_map(|&dimension| {
                Some(ProjectedAxis {
                    dimension,
                    x: self.layout.settled_x(dimension)?,
                    scale: self.registry.scale(dimension)?,
                })
            })
            .collect();
        Projection::new(axes, self.settings.overshoot)
    }

    /// Request covering every record regardless of brushes
    pub fn full_request(&self) -> RenderRequest {
        RenderRequest {
            generation: self.generation.current(),
            dataset: self.dataset.clone(),
            selection: (0..self.dataset.len()).collect(),
            projection: self.projection(),
        }
    }

    pub fn summary(&self) -> ChartSummary {
        let mut counts: AHashMap<Arc<str>, usize> = AHashMap::new();
        let records = self.dataset.records();
        for &index in self.selection.iter() {
            let label = records
                .get(index)
                .and_then(|r| r.label.clone())
                .unwrap_or_else(|| Arc::from(""));
            *counts.entry(label).or_default() += 1;
        }
        let mut selected_by_label: Vec<_> = counts.into_iter().collect();
        selected_by_label.sort_by(|a, b| a.0.cmp(&b.0));

        ChartSummary {
            dimensions: self.layout.len(),
            records: self.dataset.len(),
            selected: self.selection.len(),
            brushed_axes: self.registry.brushed_count(),
            selected_by_label,
        }
    }

    fn recompute(&mut self) {
        let filters = filter::active_filters(&self.layout, &self.registry);
        self.selection = filter::evaluate(self.dataset.records(), &filters).into();
        let tick_count = self.settings.tick_count(self.viewport.height);
        self.presentation =
            filter::presentation(&self.dataset, &self.layout, &self.registry, &filters, tick_count);
    }

    /// Bump the generation, re-run the filter and describe the new pass
    pub(crate) fn refresh(&mut self) -> RenderRequest {
        let generation = self.generation.bump();
        self.recompute();
        debug!(generation, selected = self.selection.len(), "selection recomputed");

        RenderRequest {
            generation,
            dataset: self.dataset.clone(),
            selection: self.selection.clone(),
            projection: self.projection(),
        }
    }

    pub(crate) fn layout_mut(&mut self) -> &mut AxisLayout {
        &mut self.layout
    }

    pub(crate) fn registry_mut(&mut self) -> &mut AxisRegistry {
        &mut self.registry
    }

    pub(crate) fn remove_dimension(&mut self, dimension: DimensionId) -> bool {
        let removed = self.layout.remove(dimension);
        self.registry.remove(dimension);
        removed
    }

    pub(crate) fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout.set_width(viewport.width);
        self.registry.resize(viewport.height);
    }

    pub(crate) fn rescale(&mut self) {
        self.registry
            .rescale(&self.dataset, self.viewport.height, self.settings.point_padding);
    }

    /// Bring back every dimension in its initial order with fresh scales
    pub(crate) fn reset_axes(&mut self) {
        self.layout.reset(self.initial_order.clone());
        self.registry = AxisRegistry::build(
            &self.dataset,
            self.initial_order.iter().copied(),
            self.viewport.height,
            self.settings.point_padding,
        );
    }
}
