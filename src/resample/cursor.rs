//! `resample/cursor.rs` — per-frame phase and table traversal state.
//!
//! Two independent pieces advance once per output frame:
//!
//! - the fractional accumulator, `acc += phase_step` with a carry into the
//!   input index when it wraps past `mul` (the Bresenham half of
//!   `resample/ratio.rs`);
//! - the table traversal. Cached tables are permuted to sequential order,
//!   so the slot moves by exactly one step per frame: `(slot + 1) % mul`
//!   for the full table, a reflected ping-pong over the half table for the
//!   wrapped strategies.
//!
//! The wrapped walk realizes a triangle-wave index: forward to the top,
//! backward to the bottom, tap order reversed on the backward leg. The
//! clamp differs by one step between the parities — odd `mul` re-consumes
//! the shared top entry in both directions, even `mul` consumes its pivot
//! once and steps past it — which is exactly what makes both periods come
//! out to `mul` frames.

use crate::resample::{
    coefficients::{CoefficientTable, Strategy, catmull_rom, reverse},
    ratio::{RateRatio, mod_inverse},
};

/// Mutable per-instance traversal state.
#[derive(Debug, Copy, Clone)]
pub struct PhaseCursor {
    /// Phase numerator in `[0, mul)`.
    acc: u32,
    /// Current table slot; unused for [`Strategy::Direct`].
    table_index: i32,
    /// +1 forward, -1 backward; only the wrapped strategies ever flip it.
    direction: i32,
}

impl PhaseCursor {
    pub fn start(ratio: &RateRatio, table: &CoefficientTable) -> Self {
        let mut cursor = Self {
            acc: 0,
            table_index: 0,
            direction: 1,
        };
        cursor.seek(0, ratio, table);
        cursor
    }

    /// Phase numerator of the next output frame.
    pub fn accumulator(&self) -> u32 {
        self.acc
    }

    /// Place the cursor at an arbitrary accumulator value.
    ///
    /// The slot for phase `p` is `p * phase_step^-1 (mod mul)`; a slot in the
    /// stored half maps directly, one in the mirrored half folds to
    /// `mul - slot` walking backward.
    pub fn seek(&mut self, acc: u32, ratio: &RateRatio, table: &CoefficientTable) {
        let mul = ratio.mul();
        debug_assert!(acc < mul || mul == 1);
        self.acc = acc;
        self.direction = 1;
        match table.strategy() {
            Strategy::Direct => self.table_index = 0,
            Strategy::CachedDirect => {
                self.table_index = phase_slot(acc, ratio) as i32;
            }
            Strategy::CachedWrappedOdd | Strategy::CachedWrappedEven => {
                let slot = phase_slot(acc, ratio);
                if (slot as usize) < table.len() {
                    self.table_index = slot as i32;
                } else {
                    self.table_index = (mul - slot) as i32;
                    self.direction = -1;
                }
            }
        }
    }

    /// Weights for the next output frame.
    #[inline]
    pub fn weights(&self, ratio: &RateRatio, table: &CoefficientTable) -> [f32; 4] {
        match table.strategy() {
            Strategy::Direct => catmull_rom(self.acc as f64 / ratio.mul() as f64),
            Strategy::CachedDirect => table.entry(self.table_index as usize),
            Strategy::CachedWrappedOdd | Strategy::CachedWrappedEven => {
                let w = table.entry(self.table_index as usize);
                if self.direction < 0 { reverse(w) } else { w }
            }
        }
    }

    /// Advance past the frame just produced. Returns the input frames the
    /// staging window moves by (whole step plus the accumulator carry).
    #[inline]
    pub fn advance(&mut self, ratio: &RateRatio, table: &CoefficientTable) -> usize {
        let mut input_step = ratio.whole_step() as usize;
        self.acc += ratio.phase_step();
        if self.acc >= ratio.mul() {
            self.acc -= ratio.mul();
            input_step += 1;
        }
        self.step_table(1, ratio, table);
        input_step
    }

    /// Apply `steps` single-slot traversal transitions.
    ///
    /// With the permuted layout one phase step is one slot step, so the hot
    /// path always passes 1; the loop keeps the transition itself in one
    /// place.
    fn step_table(&mut self, steps: u32, ratio: &RateRatio, table: &CoefficientTable) {
        for _ in 0..steps {
            match table.strategy() {
                Strategy::Direct => {}
                Strategy::CachedDirect => {
                    self.table_index += 1;
                    if self.table_index as u32 == ratio.mul() {
                        self.table_index = 0;
                    }
                }
                Strategy::CachedWrappedOdd | Strategy::CachedWrappedEven => {
                    let len = table.len() as i32;
                    self.table_index += self.direction;
                    if self.table_index == len {
                        // Odd re-reads the shared top entry reversed; even
                        // has consumed its pivot and steps past it.
                        self.table_index = match table.strategy() {
                            Strategy::CachedWrappedOdd => len - 1,
                            _ => len - 2,
                        };
                        self.direction = -1;
                    }
                    if self.table_index == 0 {
                        self.direction = 1;
                    }
                    debug_assert!(
                        self.table_index >= 0 && self.table_index < len,
                        "wrapped index {} outside table of {len}",
                        self.table_index
                    );
                }
            }
        }
    }
}

/// Slot of phase `acc` in the permuted full table.
fn phase_slot(acc: u32, ratio: &RateRatio) -> u32 {
    let mul = ratio.mul();
    if mul == 1 {
        return 0;
    }
    let inv = mod_inverse(ratio.phase_step(), mul);
    (acc as u64 * inv as u64 % mul as u64) as u32
}
