//! Surfaces backed by egui shapes

use egui::{Color32, Painter, Pos2, Shape, Stroke, Vec2};

use crate::{CurvePath, LineStyle, Surface};

/// Points sampled per curve segment
const DEFAULT_STEPS: usize = 12;

#[derive(Debug, Clone)]
struct StrokedCurve {
    record: usize,
    points: Vec<Pos2>,
    style: LineStyle,
}

/// Keeps flattened curves in chart-local coordinates until painted
#[derive(Debug, Clone)]
pub struct ShapeSurface {
    curves: Vec<StrokedCurve>,
    steps: usize,
}

impl Default for ShapeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSurface {
    pub fn new() -> Self {
        Self::with_steps(DEFAULT_STEPS)
    }

    pub fn with_steps(steps: usize) -> Self {
        Self {
            curves: Vec::new(),
            steps: steps.max(1),
        }
    }

    /// Records on the surface, in draw order
    pub fn records(&self) -> impl Iterator<Item = usize> + '_ {
        self.curves.iter().map(|c| c.record)
    }

    /// Shapes for every curve, moved by `offset` and faded by `opacity`
    pub fn shapes(&self, offset: Vec2, opacity: f32) -> Vec<Shape> {
        self.curves
            .iter()
            .map(|curve| {
                let color: Color32 = curve.style.color.linear_multiply(opacity);
                Shape::line(
                    curve.points.iter().map(|p| *p + offset).collect(),
                    Stroke::new(curve.style.width, color),
                )
            })
            .collect()
    }

    pub fn paint(&self, painter: &Painter, offset: Vec2, opacity: f32) {
        painter.extend(self.shapes(offset, opacity));
    }
}

impl Surface for ShapeSurface {
    fn clear(&mut self) {
        self.curves.clear();
    }

    fn stroke(&mut self, record: usize, path: &CurvePath, style: LineStyle) {
        self.curves.push(StrokedCurve {
            record,
            points: path.flatten(self.steps),
            style,
        });
    }

    fn len(&self) -> usize {
        self.curves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_are_offset() {
        let mut surface = ShapeSurface::with_steps(2);
        let path = CurvePath::through(&[(10.0, 10.0)], 5.0).unwrap();
        let style = LineStyle {
            color: Color32::WHITE,
            width: 1.7,
        };
        surface.stroke(3, &path, style);

        assert_eq!(surface.len(), 1);
        assert_eq!(surface.records().collect::<Vec<_>>(), vec![3]);

        let shapes = surface.shapes(Vec2::new(100.0, 60.0), 0.5);
        let Shape::Path(line) = &shapes[0] else {
            panic!("expected a path shape");
        };
        assert_eq!(line.points[0], Pos2::new(105.0, 70.0));
        assert!(line.stroke.color.a() < 255);

        surface.clear();
        assert!(surface.is_empty());
    }
}
