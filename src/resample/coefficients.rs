//! `resample/coefficients.rs` — Catmull-Rom weights and their storage.
//!
//! Every output frame is a weighted sum of 4 input frames; the weights
//! depend only on the frame's phase `acc / mul`, of which there are exactly
//! `mul` distinct values. How those weight vectors are stored is the
//! [`Strategy`]: cache them all, cache half and exploit the kernel's
//! reflection symmetry, or recompute per frame when `mul` is too large for
//! caching to pay off.
//!
//! Cached tables are stored **permuted**: slot `s` holds the weights for
//! phase `(s * phase_step) mod mul`, so consecutive output frames read
//! consecutive slots. The permutation is a bijection because the phase step
//! inherits coprimality with `mul` from the reduced ratio.

use crate::resample::ratio::RateRatio;

/// Coefficient storage/traversal scheme, fixed at construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Evaluate the basis polynomial per output frame; no table.
    Direct,
    /// One cached entry per phase, permuted to sequential traversal order.
    CachedDirect,
    /// Half table plus the shared top entry; ping-pong traversal, odd `mul`.
    CachedWrappedOdd,
    /// Half table plus the half-phase pivot; ping-pong traversal, even `mul`.
    CachedWrappedEven,
}

impl Strategy {
    /// Pure function of the reduced `mul` and the cache threshold.
    pub fn select(mul: u32, phase_cache_limit: u32) -> Self {
        let limit = phase_cache_limit as u64;
        if mul as u64 <= limit {
            Strategy::CachedDirect
        } else if mul as u64 <= 2 * limit {
            if mul % 2 == 1 {
                Strategy::CachedWrappedOdd
            } else {
                Strategy::CachedWrappedEven
            }
        } else {
            Strategy::Direct
        }
    }
}

/// Catmull-Rom basis weights at phase `t` in `[0, 1)`.
///
/// Evaluated in f64, stored as f32 — same as the per-point Horner form, just
/// expressed per tap so a whole vector can be cached and reversed.
#[inline]
pub fn catmull_rom(t: f64) -> [f32; 4] {
    let w0 = ((-0.5 * t + 1.0) * t - 0.5) * t;
    let w1 = (1.5 * t - 2.5) * t * t + 1.0;
    let w2 = ((-1.5 * t + 2.0) * t + 0.5) * t;
    let w3 = (0.5 * t - 0.5) * t * t;
    [w0 as f32, w1 as f32, w2 as f32, w3 as f32]
}

/// Tap-reversed weight vector: `reverse(W(t)) == W(1 - t)`.
#[inline]
pub fn reverse(w: [f32; 4]) -> [f32; 4] {
    [w[3], w[2], w[1], w[0]]
}

/// Immutable per-instance weight table, built once at construction.
pub struct CoefficientTable {
    strategy: Strategy,
    weights: Vec<[f32; 4]>,
}

impl CoefficientTable {
    pub fn build(ratio: &RateRatio, phase_cache_limit: u32) -> Self {
        let mul = ratio.mul();
        let strategy = Strategy::select(mul, phase_cache_limit);
        let entries = match strategy {
            Strategy::Direct => 0,
            Strategy::CachedDirect => mul as usize,
            // Both parities store the permuted first half inclusive: the
            // permuted table satisfies P[mul - s] == reverse(P[s]), so the
            // backward leg reads the same slots tap-reversed.
            Strategy::CachedWrappedOdd | Strategy::CachedWrappedEven => mul as usize / 2 + 1,
        };

        let step = ratio.phase_step() as u64;
        let weights = (0..entries as u64)
            .map(|slot| catmull_rom((slot * step % mul as u64) as f64 / mul as f64))
            .collect();

        Self { strategy, weights }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Entries stored; 0 for [`Strategy::Direct`].
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn entry(&self, slot: usize) -> [f32; 4] {
        debug_assert!(slot < self.weights.len(), "table slot {slot} out of range");
        self.weights[slot]
    }
}
