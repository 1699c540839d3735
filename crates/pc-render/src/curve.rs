//! Record curves and hit testing

use egui::Pos2;
use pc_core::{Dataset, Projection};

/// Horizontal share of a segment taken by each control point's lead-in
const CONTROL_LEAD: f32 = 0.88;

/// One cubic Bézier piece ending on an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub c1: Pos2,
    pub c2: Pos2,
    pub to: Pos2,
}

impl CubicSegment {
    fn at(&self, from: Pos2, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Pos2::new(
            a * from.x + b * self.c1.x + c * self.c2.x + d * self.to.x,
            a * from.y + b * self.c1.y + c * self.c2.y + d * self.to.y,
        )
    }
}

/// The smooth line a record draws across the axes
///
/// It starts `overshoot` pixels left of the first axis, bends through
/// every axis crossing and runs straight for `overshoot` pixels past the
/// last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePath {
    start: Pos2,
    segments: Vec<CubicSegment>,
    end: Pos2,
}

impl CurvePath {
    /// Build a curve through axis crossings given left to right; `None`
    /// when there are no axes
    pub fn through(points: &[(f32, f32)], overshoot: f32) -> Option<Self> {
        let &(first_x, first_y) = points.first()?;
        let start = Pos2::new(first_x - overshoot, first_y);

        let mut prev = start;
        let segments = points
            .iter()
            .map(|&(x, y)| {
                let dx = x - prev.x;
                let segment = CubicSegment {
                    c1: Pos2::new(x - CONTROL_LEAD * dx, prev.y),
                    c2: Pos2::new(x - (1.0 - CONTROL_LEAD) * dx, y),
                    to: Pos2::new(x, y),
                };
                prev = segment.to;
                segment
            })
            .collect();

        Some(Self {
            start,
            segments,
            end: Pos2::new(prev.x + overshoot, prev.y),
        })
    }

    /// Curve of one record under a projection
    pub fn for_record(projection: &Projection, dataset: &Dataset, record: usize) -> Option<Self> {
        let record = dataset.records().get(record)?;
        Self::through(&projection.points(record), projection.overshoot())
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    /// Sample the curve as a polyline with `steps` points per segment
    pub fn flatten(&self, steps: usize) -> Vec<Pos2> {
        let steps = steps.max(1);
        let mut points = Vec::with_capacity(self.segments.len() * steps + 2);
        points.push(self.start);

        let mut from = self.start;
        for segment in &self.segments {
            for i in 1..=steps {
                points.push(segment.at(from, i as f32 / steps as f32));
            }
            from = segment.to;
        }

        points.push(self.end);
        points
    }
}

/// Distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let ab_squared = ab.x * ab.x + ab.y * ab.y;

    if ab_squared == 0.0 {
        return ap.length();
    }

    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_squared).clamp(0.0, 1.0);
    let projection = a + ab * t;
    (point - projection).length()
}

/// The record in `selection` whose straight polyline passes closest to
/// `point`, if any is within `threshold` pixels. Coordinates are
/// chart-local.
pub fn nearest_record(
    projection: &Projection,
    dataset: &Dataset,
    selection: &[usize],
    point: Pos2,
    threshold: f32,
) -> Option<usize> {
    let mut best = None;
    let mut min_dist = threshold;

    for &index in selection {
        let Some(record) = dataset.records().get(index) else {
            continue;
        };
        let crossings: Vec<Pos2> = projection
            .points(record)
            .into_iter()
            .map(|(x, y)| Pos2::new(x, y))
            .collect();

        for pair in crossings.windows(2) {
            let dist = distance_to_segment(point, pair[0], pair[1]);
            if dist < min_dist {
                min_dist = dist;
                best = Some(index);
            }
        }
    }

    best
}
