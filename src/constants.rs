//! Central constants for the resampling core.
//!
//! All magic numbers in `src/**` live here so they can be tuned in one place
//! and remain consistent across modules.

// ── Interpolation ────────────────────────────────────────────────────────────

/// Taps of the Catmull-Rom kernel: one history frame, the current frame and
/// two look-ahead frames.
pub const KERNEL_TAPS: usize = 4;

/// Look-ahead frames needed beyond the current frame (`KERNEL_TAPS - 2`,
/// i.e. the two future taps plus room for the pending carry).
pub const LOOKAHEAD_FRAMES: usize = 3;

/// Zero frames appended once the upstream ends: the two future taps of the
/// final interpolation interval.
pub const EOS_PAD_FRAMES: usize = KERNEL_TAPS - 2;

// ── Coefficient cache ────────────────────────────────────────────────────────

/// Largest phase count cached as a full per-phase table. Between this and
/// twice this, only half the table is stored and traversed reflected; above
/// twice this, coefficients are evaluated per output frame.
pub const PHASE_CACHE_LIMIT: u32 = 512;

// ── Anti-aliasing pre-filter ─────────────────────────────────────────────────

/// Cutoff as a fraction of the destination rate — just under the new Nyquist
/// so the transition band stays inside it.
pub const LOWPASS_CUTOFF_RATIO: f64 = 0.45;

/// Butterworth section Q values for the cascaded 4th-order lowpass.
pub const LOWPASS_SECTION_Q: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376];
