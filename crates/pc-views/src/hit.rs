//! Which part of the chart the pointer is over

use egui::{Pos2, Rect, Vec2};
use pc_core::DimensionId;

/// Left edge of an axis's brush strip, relative to the axis line
pub const BRUSH_LEFT: f32 = -23.0;
/// Width of the brush strip
pub const BRUSH_WIDTH: f32 = 36.0;
/// How far either side of an axis its label can be grabbed
const LABEL_GRAB: f32 = 40.0;

/// Space kept around the plotting area for labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for ChartMargins {
    fn default() -> Self {
        Self {
            top: 60.0,
            right: 0.0,
            bottom: 10.0,
            left: 0.0,
        }
    }
}

impl ChartMargins {
    /// The plotting area inside `outer`, never inverted
    pub fn chart_rect(&self, outer: Rect) -> Rect {
        let min = outer.min + Vec2::new(self.left, self.top);
        let max = Pos2::new(
            (outer.max.x - self.right).max(min.x),
            (outer.max.y - self.bottom).max(min.y),
        );
        Rect::from_min_max(min, max)
    }
}

/// What a press at some point would act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The axis label: drag to move, click to invert
    Axis(DimensionId),
    /// The brush strip along an axis
    Brush(DimensionId),
    /// Plotting area away from any axis
    Lines,
}

/// Horizontal span of the brush strip around an axis at `x`
pub fn brush_strip(x: f32) -> (f32, f32) {
    (x + BRUSH_LEFT, x + BRUSH_LEFT + BRUSH_WIDTH)
}

/// Classify a chart-local pointer position. `axes` holds each visible
/// axis and its x; labels sit in the `label_band` pixels above the chart.
pub fn hit_test(axes: &[(DimensionId, f32)], pointer: Pos2, height: f32, label_band: f32) -> Option<HitTarget> {
    let nearest = |accept: &dyn Fn(f32) -> bool| {
        axes.iter()
            .filter(|(_, x)| accept(*x))
            .min_by(|a, b| (a.1 - pointer.x).abs().total_cmp(&(b.1 - pointer.x).abs()))
            .map(|(d, _)| *d)
    };

    if pointer.y < 0.0 {
        if pointer.y < -label_band {
            return None;
        }
        return nearest(&|x| (pointer.x - x).abs() <= LABEL_GRAB).map(HitTarget::Axis);
    }
    if pointer.y > height {
        return None;
    }

    let in_strip = |x: f32| {
        let (left, right) = brush_strip(x);
        (left..=right).contains(&pointer.x)
    };
    Some(nearest(&in_strip).map_or(HitTarget::Lines, HitTarget::Brush))
}
