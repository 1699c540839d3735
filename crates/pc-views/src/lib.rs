//! Views for the parallel-coordinates chart
//!
//! The view owns the interaction controller and the drawing layers, turns
//! egui pointer input into controller gestures and paints the result.

pub mod hit;
pub mod parallel_coordinates;

pub use hit::{ChartMargins, HitTarget};
pub use parallel_coordinates::ParallelCoordinatesView;
