//! Scales mapping dimension values to vertical pixel positions
//!
//! Pixel 0 is the top of the chart. A non-inverted scale puts the smallest
//! value (or first category) at the bottom, so its range runs `[H, 0]`.

use std::sync::Arc;
use ahash::AHashMap;

use crate::model::{Dimension, DimensionKind, Record, Value};

/// A linear mapping from a continuous domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into pixel space
    pub fn map(&self, x: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    /// Maps a pixel position back into domain space
    pub fn invert(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = (r1 - r0) as f64;
        if denom == 0.0 {
            return d0;
        }
        let t = (px - r0) as f64 / denom;
        d0 + t * (d1 - d0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Round-numbered tick values covering the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match tick_step(self.domain.0, self.domain.1, count) {
            Some(step) => {
                let (lo, hi) = ordered(self.domain.0, self.domain.1);
                let start = (lo / step - 1e-9).ceil();
                let stop = (hi / step + 1e-9).floor();
                let mut ticks = Vec::new();
                let mut i = start;
                while i <= stop {
                    ticks.push(i * step);
                    i += 1.0;
                }
                ticks
            }
            None if self.domain.0.is_finite() => vec![self.domain.0],
            None => Vec::new(),
        }
    }

    /// Format a tick value with as many decimals as the tick step needs
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        let decimals = tick_step(self.domain.0, self.domain.1, count)
            .map(|step| (-(step.log10() + 0.01).floor()).max(0.0) as usize)
            .unwrap_or(0);
        let text = format!("{:.*}", decimals, value);
        // avoid printing "-0"
        if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
            text.trim_start_matches('-').to_string()
        } else {
            text
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Step between ticks, using 1/2/5 multiples of a power of ten
fn tick_step(d0: f64, d1: f64, count: usize) -> Option<f64> {
    let (lo, hi) = ordered(d0, d1);
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return None;
    }
    let m = count.max(1) as f64;
    let mut step = 10f64.powf((span / m).log10().floor());
    let err = m / span * step;

    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    Some(step)
}

/// Evenly spaced positions for an ordered set of category tokens
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Arc<[Arc<str>]>,
    index: AHashMap<Arc<str>, usize>,
    range: (f32, f32),
    padding: f64,
}

impl PointScale {
    /// `domain` must already be sorted and free of duplicates
    pub fn new(domain: Arc<[Arc<str>]>, range: (f32, f32), padding: f64) -> Self {
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        Self {
            domain,
            index,
            range,
            padding: padding.max(0.0),
        }
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let denom = (n - 1.0) + self.padding;
        if denom <= 0.0 {
            return 0.0;
        }
        (r1 - r0) as f64 / denom
    }

    /// Position of the token at `index`
    pub fn x(&self, index: usize) -> f32 {
        let (r0, r1) = self.range;
        if self.domain.len() < 2 {
            return (r0 + r1) / 2.0;
        }
        let step = self.step();
        (r0 as f64 + step * self.padding / 2.0 + step * index as f64) as f32
    }

    /// Position of a token, `None` if it is not in the domain
    pub fn map(&self, token: &str) -> Option<f32> {
        self.index.get(token).map(|&i| self.x(i))
    }

    pub fn domain(&self) -> &[Arc<str>] {
        &self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    fn with_range(&self, range: (f32, f32)) -> Self {
        Self {
            range,
            ..self.clone()
        }
    }
}

/// Either scale family
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleKind {
    Linear(LinearScale),
    Point(PointScale),
}

/// An axis tick: the value it marks, where, and how it reads
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: Value,
    pub position: f32,
    pub label: String,
}

/// The live scale of one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    height: f32,
    inverted: bool,
}

fn range_for(height: f32, inverted: bool) -> (f32, f32) {
    if inverted { (0.0, height) } else { (height, 0.0) }
}

impl Scale {
    /// Build a scale from the extent of `dimension` over `records`
    pub fn build(dimension: &Dimension, records: &[Record], height: f32, inverted: bool, padding: f64) -> Self {
        let range = range_for(height, inverted);
        let id = dimension.id;

        let kind = match dimension.kind() {
            DimensionKind::NumericLike => {
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for n in records.iter().filter_map(|r| r.value(id)).filter_map(Value::as_number) {
                    if n.is_nan() {
                        continue;
                    }
                    lo = lo.min(n);
                    hi = hi.max(n);
                }
                let domain = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
                ScaleKind::Linear(LinearScale::new(domain, range))
            }
            DimensionKind::Categorical => {
                let mut tokens: Vec<Arc<str>> = records
                    .iter()
                    .filter_map(|r| match r.value(id) {
                        Some(Value::Category(c)) => Some(c.clone()),
                        _ => None,
                    })
                    .collect();
                tokens.sort_unstable();
                tokens.dedup();
                ScaleKind::Point(PointScale::new(tokens.into(), range, padding))
            }
        };

        Self { kind, height, inverted }
    }

    pub fn kind(&self) -> &ScaleKind {
        &self.kind
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn range(&self) -> (f32, f32) {
        match &self.kind {
            ScaleKind::Linear(s) => s.range(),
            ScaleKind::Point(s) => s.range(),
        }
    }

    /// Pixel position of a value, `None` for values outside a categorical
    /// domain or of the wrong type
    pub fn position(&self, value: &Value) -> Option<f32> {
        match (&self.kind, value) {
            (ScaleKind::Linear(s), Value::Number(n)) => Some(s.map(*n)),
            (ScaleKind::Point(s), Value::Category(c)) => s.map(c),
            _ => None,
        }
    }

    /// Domain value at a pixel position; categorical scales have no inverse
    pub fn value_at(&self, px: f32) -> Option<f64> {
        match &self.kind {
            ScaleKind::Linear(s) => Some(s.invert(px)),
            ScaleKind::Point(_) => None,
        }
    }

    /// Same domain, range endpoints swapped
    pub fn flipped(&self) -> Self {
        self.with_range(self.height, !self.inverted)
    }

    /// Same domain and orientation for a new chart height
    pub fn resized(&self, height: f32) -> Self {
        self.with_range(height, self.inverted)
    }

    fn with_range(&self, height: f32, inverted: bool) -> Self {
        let (r0, r1) = self.range();
        // swap the endpoints in place rather than recomputing them
        let range = if inverted == self.inverted && height == self.height {
            (r0, r1)
        } else if height == self.height {
            (r1, r0)
        } else {
            range_for(height, inverted)
        };

        let kind = match &self.kind {
            ScaleKind::Linear(s) => ScaleKind::Linear(LinearScale::new(s.domain(), range)),
            ScaleKind::Point(s) => ScaleKind::Point(s.with_range(range)),
        };
        Self { kind, height, inverted }
    }

    /// Ticks for drawing the axis
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        match &self.kind {
            ScaleKind::Linear(s) => s
                .ticks(count)
                .into_iter()
                .map(|v| Tick {
                    value: Value::Number(v),
                    position: s.map(v),
                    label: s.tick_format(count, v),
                })
                .collect(),
            ScaleKind::Point(s) => s
                .domain()
                .iter()
                .enumerate()
                .map(|(i, token)| Tick {
                    value: Value::Category(token.clone()),
                    position: s.x(i),
                    label: token.to_string(),
                })
                .collect(),
        }
    }
}
