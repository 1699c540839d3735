//! Core functionality for the parallel-coordinates chart
//!
//! This crate owns the chart's data model and the interaction engine:
//! scales, brushes, axis layout, filtering and the controller that ties
//! them together. It knows nothing about windows or painting.

pub mod brush;
pub mod controller;
pub mod filter;
pub mod generation;
pub mod layout;
pub mod model;
pub mod palette;
pub mod registry;
pub mod scale;
pub mod settings;
pub mod state;

use thiserror::Error;

// Re-export commonly used types
pub use brush::{Brush, BrushSpace, Extent};
pub use controller::{AxisDragOutcome, DragFeedback, InteractionController};
pub use filter::{ActiveFilter, AxisPresentation, TickLabel};
pub use generation::Generation;
pub use layout::AxisLayout;
pub use model::{Dataset, Dimension, DimensionId, DimensionKind, FieldKind, Record, Value};
pub use palette::{ColorTable, Hsl};
pub use registry::{AxisEntry, AxisRegistry};
pub use scale::{LinearScale, PointScale, Scale, ScaleKind, Tick};
pub use settings::{ChartSettings, RenderSettings};
pub use state::{ChartState, ChartSummary, ProjectedAxis, Projection, RenderRequest, Viewport};

/// Errors raised when the controller is asked to act on something that
/// is not part of the chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("dimension {0} is not visible")]
    HiddenDimension(String),

    #[error("no gesture in progress")]
    NoGesture,
}
