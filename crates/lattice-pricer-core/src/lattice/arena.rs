//! Reusable scratch buffer for repeated lattice pricing.

use super::payoff::grid_len;

/// Holds the payoff vector between pricing calls.
///
/// The buffer grows on demand and never shrinks, so pricing a sequence of
/// specs at the same or decreasing step counts allocates once.
#[derive(Debug, Clone, Default)]
pub struct LatticeArena {
    buffer: Vec<f64>,
}

impl LatticeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the arena for lattices of up to `max_steps` steps.
    pub fn with_capacity(max_steps: u32) -> Self {
        Self {
            buffer: Vec::with_capacity(grid_len(max_steps)),
        }
    }

    /// Returns a mutable slice of exactly `grid_len(steps)` entries. Contents
    /// are whatever the previous caller left there.
    #[inline]
    pub fn grid_slice(&mut self, steps: u32) -> &mut [f64] {
        let n = grid_len(steps);
        if self.buffer.len() < n {
            self.buffer.resize(n, 0.0);
        }
        &mut self.buffer[..n]
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}
