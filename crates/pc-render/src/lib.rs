//! Rendering layer for the parallel-coordinates chart
//!
//! Records are turned into curves, stroked onto [`Surface`]s in
//! throttled batches and finally handed to egui as shapes.

pub mod adaptive;
pub mod colors;
pub mod curve;
pub mod layers;
pub mod surface;

use egui::Color32;

pub use adaptive::{line_opacity, AdaptiveRenderer, BatchSizer, RenderStatus};
pub use curve::CurvePath;
pub use layers::ChartLayers;
pub use surface::ShapeSurface;

/// How a single curve is stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
}

/// Trait for surfaces curves are drawn onto
pub trait Surface {
    /// Drop everything drawn so far
    fn clear(&mut self);

    /// Stroke the curve of `record`
    fn stroke(&mut self, record: usize, path: &CurvePath, style: LineStyle);

    /// Number of curves currently on the surface
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
