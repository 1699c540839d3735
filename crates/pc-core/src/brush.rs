//! Per-axis range selections

use crate::model::{DimensionKind, Value};
use crate::scale::Scale;

/// Closed interval with `lo <= hi`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    lo: f64,
    hi: f64,
}

impl Extent {
    /// Build an extent from two bounds in either order
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

/// Which coordinate system a brush extent is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushSpace {
    /// Raw data values; used by numeric axes
    Domain,
    /// Scaled pixel positions; used by categorical axes
    Pixel,
}

impl From<DimensionKind> for BrushSpace {
    fn from(kind: DimensionKind) -> Self {
        match kind {
            DimensionKind::NumericLike => BrushSpace::Domain,
            DimensionKind::Categorical => BrushSpace::Pixel,
        }
    }
}

/// Selection state of one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Brush {
    #[default]
    Empty,
    Active(Extent),
}

impl Brush {
    pub fn range(a: f64, b: f64) -> Self {
        Brush::Active(Extent::new(a, b))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Brush::Empty)
    }

    pub fn extent(&self) -> Option<Extent> {
        match self {
            Brush::Empty => None,
            Brush::Active(extent) => Some(*extent),
        }
    }

    /// Whether `value` passes this brush. Numeric values are compared
    /// directly, categorical values after being placed by `scale`.
    pub fn admits(&self, value: &Value, space: BrushSpace, scale: &Scale) -> bool {
        let Some(extent) = self.extent() else {
            return true;
        };
        match space {
            BrushSpace::Domain => value.as_number().map_or(false, |v| extent.contains(v)),
            BrushSpace::Pixel => scale
                .position(value)
                .map_or(false, |px| extent.contains(px as f64)),
        }
    }

    /// Pixel span covered by the brush on `scale`, top first
    pub fn pixel_span(&self, space: BrushSpace, scale: &Scale) -> Option<(f32, f32)> {
        let extent = self.extent()?;
        let (a, b) = match space {
            BrushSpace::Pixel => (extent.lo() as f32, extent.hi() as f32),
            BrushSpace::Domain => (
                scale.position(&Value::Number(extent.lo()))?,
                scale.position(&Value::Number(extent.hi()))?,
            ),
        };
        Some((a.min(b), a.max(b)))
    }

    /// Brush covering the pixel span `[top, bottom]` of `scale`
    pub fn from_pixels(top: f32, bottom: f32, space: BrushSpace, scale: &Scale) -> Self {
        match space {
            BrushSpace::Pixel => Brush::range(top as f64, bottom as f64),
            BrushSpace::Domain => match (scale.value_at(top), scale.value_at(bottom)) {
                (Some(a), Some(b)) => Brush::range(a, b),
                _ => Brush::Empty,
            },
        }
    }
}
