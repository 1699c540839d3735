//! Chart and renderer settings

use serde::{Serialize, Deserialize};

/// Geometry and interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Dropping an axis closer than this to either edge removes it
    pub edge_margin: f32,

    /// How far curves extend past the first and last axis
    pub overshoot: f32,

    /// Outer padding of categorical point scales, in steps
    pub point_padding: f64,

    /// Vertical pixels per tick on numeric axes
    pub tick_spacing: f32,

    /// Start with axes sorted by name instead of file order
    pub sort_axes: bool,

    /// Adaptive renderer tuning
    pub render: RenderSettings,
}

/// Adaptive renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub initial_batch: usize,
    pub min_batch: usize,
    pub max_batch: usize,

    /// Time budget per batch in milliseconds
    pub target_batch_ms: f64,

    pub line_width: f32,
    pub highlight_width: f32,

    /// Alpha of the unfiltered context lines
    pub background_alpha: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            edge_margin: 12.0,
            overshoot: 15.0,
            point_padding: 0.1,
            tick_spacing: 50.0,
            sort_axes: true,
            render: RenderSettings::default(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            initial_batch: 50,
            min_batch: 8,
            max_batch: 300,
            target_batch_ms: 30.0,
            line_width: 1.7,
            highlight_width: 4.0,
            background_alpha: 0.1,
        }
    }
}

impl ChartSettings {
    /// Number of ticks for a numeric axis of the given pixel height
    pub fn tick_count(&self, height: f32) -> usize {
        if self.tick_spacing <= 0.0 {
            return 1;
        }
        1 + (height / self.tick_spacing).max(0.0) as usize
    }
}
