//! Interaction generation counter

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared, monotonically increasing interaction counter
///
/// Every interaction that invalidates in-flight rendering bumps it. Render
/// tasks remember the value they were issued under and stop as soon as the
/// counter moves past it. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

impl Generation {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }

    /// Advance the counter, returning the new value
    pub fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether work issued under `issued` has been superseded
    pub fn is_stale(&self, issued: u64) -> bool {
        self.current() > issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_shared_between_clones() {
        let generation = Generation::new();
        let handle = generation.clone();
        assert_eq!(generation.current(), 0);

        assert_eq!(handle.bump(), 1);
        assert_eq!(generation.current(), 1);
        assert!(generation.is_stale(0));
        assert!(!generation.is_stale(1));
    }
}
