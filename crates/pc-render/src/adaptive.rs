//! Batched, preemptible foreground rendering
//!
//! A render pass draws its records a batch per frame. The batch size is
//! tuned after every batch so one batch costs roughly the target time,
//! and a pass stops for good as soon as the chart's generation moves past
//! the one it was issued under.

use std::time::{Duration, Instant};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use pc_core::{ColorTable, Generation, RenderRequest, RenderSettings};
use crate::colors::label_color;
use crate::{CurvePath, LineStyle, Surface};

/// Per-line alpha for a pass of `n` lines
pub fn line_opacity(n: usize) -> f32 {
    if n == 0 {
        return 1.0;
    }
    (2.0 / (n as f32).powf(0.3)).min(1.0)
}

/// Adapts the number of lines drawn per frame to the time each batch took
#[derive(Debug, Clone)]
pub struct BatchSizer {
    size: usize,
    min: usize,
    max: usize,
    target_ms: f64,
}

impl BatchSizer {
    pub fn new(settings: &RenderSettings) -> Self {
        let min = settings.min_batch.max(1);
        let max = settings.max_batch.max(min);
        Self {
            size: settings.initial_batch.clamp(min, max),
            min,
            max,
            target_ms: settings.target_batch_ms,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Scale the batch size inversely to how long the last batch took.
    /// No measurable time means the ceiling.
    pub fn adjust(&mut self, elapsed: Duration) -> usize {
        let ms = elapsed.as_secs_f64() * 1000.0;
        let next = if ms > 0.0 && ms.is_finite() {
            (self.size as f64 * self.target_ms / ms).ceil()
        } else {
            f64::INFINITY
        };

        self.size = if next.is_nan() || next >= self.max as f64 {
            self.max
        } else {
            (next as usize).clamp(self.min, self.max)
        };
        self.size
    }
}

/// Where the foreground stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Nothing submitted, or the last pass already ended
    Idle,
    /// A pass is under way
    Drawing { drawn: usize, total: usize },
    /// The pass just drew its last batch
    Complete { total: usize },
    /// The pass was abandoned for a newer generation
    Cancelled { drawn: usize, total: usize },
}

impl RenderStatus {
    pub fn is_drawing(&self) -> bool {
        matches!(self, RenderStatus::Drawing { .. })
    }
}

#[derive(Debug)]
struct RenderPass {
    request: RenderRequest,
    order: Vec<usize>,
    next: usize,
    opacity: f32,
    last_batch: Instant,
}

/// Draws render requests onto a surface in adaptive batches
pub struct AdaptiveRenderer<S> {
    surface: S,
    generation: Generation,
    sizer: BatchSizer,
    colors: ColorTable,
    line_width: f32,
    rng: StdRng,
    pass: Option<RenderPass>,
}

impl<S: Surface> AdaptiveRenderer<S> {
    pub fn new(surface: S, generation: Generation, colors: ColorTable, settings: &RenderSettings) -> Self {
        Self {
            surface,
            generation,
            sizer: BatchSizer::new(settings),
            colors,
            line_width: settings.line_width,
            rng: StdRng::from_entropy(),
            pass: None,
        }
    }

    /// Use a fixed shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn batch_size(&self) -> usize {
        self.sizer.size()
    }

    /// Whether a pass still has batches to draw
    pub fn is_drawing(&self) -> bool {
        self.pass.is_some()
    }

    /// Start a new pass, replacing whatever was drawing
    pub fn submit(&mut self, request: RenderRequest) {
        self.submit_at(request, Instant::now());
    }

    /// Clear the surface and shuffle the draw order; drawing starts on
    /// the next tick
    pub fn submit_at(&mut self, request: RenderRequest, now: Instant) {
        self.surface.clear();

        let mut order = request.selection.to_vec();
        order.shuffle(&mut self.rng);
        let opacity = line_opacity(order.len());

        debug!(
            generation = request.generation,
            records = order.len(),
            opacity,
            "render pass submitted"
        );
        self.pass = Some(RenderPass {
            request,
            order,
            next: 0,
            opacity,
            last_batch: now,
        });
    }

    /// Draw the next batch
    pub fn tick(&mut self) -> RenderStatus {
        self.tick_with(Instant::now())
    }

    /// Draw the next batch, with `now` as the time the batch finished
    pub fn tick_with(&mut self, now: Instant) -> RenderStatus {
        let Some(pass) = self.pass.as_mut() else {
            return RenderStatus::Idle;
        };
        let total = pass.order.len();

        if self.generation.is_stale(pass.request.generation) {
            debug!(
                generation = pass.request.generation,
                drawn = pass.next,
                total,
                "render pass preempted"
            );
            let drawn = pass.next;
            self.pass = None;
            return RenderStatus::Cancelled { drawn, total };
        }

        let end = (pass.next + self.sizer.size()).min(total);
        let dataset = &pass.request.dataset;
        let projection = &pass.request.projection;
        for &index in &pass.order[pass.next..end] {
            let Some(record) = dataset.records().get(index) else {
                continue;
            };
            let Some(path) = CurvePath::through(&projection.points(record), projection.overshoot()) else {
                continue;
            };
            let style = LineStyle {
                color: label_color(&self.colors, record.label.as_deref(), pass.opacity),
                width: self.line_width,
            };
            self.surface.stroke(index, &path, style);
        }
        pass.next = end;

        self.sizer.adjust(now.saturating_duration_since(pass.last_batch));
        pass.last_batch = now;

        if end >= total {
            debug!(generation = pass.request.generation, total, "render pass complete");
            self.pass = None;
            RenderStatus::Complete { total }
        } else {
            RenderStatus::Drawing { drawn: end, total }
        }
    }
}
