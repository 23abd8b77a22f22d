//! `resample/ratio.rs` — exact rational tracking of the resampling read head.
//!
//! Advancing the output cursor by one frame moves the input position by
//! `div / mul` frames exactly. Splitting that into an integer step plus a
//! numerator carried in an accumulator (Bresenham) keeps the mapping exact
//! over arbitrarily long streams, where a floating-point phase accumulator
//! would drift.

use crate::ResampleError;

/// Reduced destination/source rate ratio.
///
/// Invariant: `gcd(mul, div) == 1`, both strictly positive, and
/// `dest_rate / source_rate == mul / div` exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RateRatio {
    mul: u32,
    div: u32,
}

impl RateRatio {
    /// Reduce `dest_rate / source_rate` to lowest terms.
    pub fn reduce(source_rate: u32, dest_rate: u32) -> Result<Self, ResampleError> {
        if dest_rate < 1 {
            return Err(ResampleError::InvalidRate(dest_rate));
        }
        if source_rate < 1 {
            return Err(ResampleError::InvalidRate(source_rate));
        }
        let g = gcd(dest_rate, source_rate);
        Ok(Self {
            mul: dest_rate / g,
            div: source_rate / g,
        })
    }

    pub fn mul(&self) -> u32 {
        self.mul
    }

    pub fn div(&self) -> u32 {
        self.div
    }

    /// Input frames consumed by every output frame regardless of phase.
    pub fn whole_step(&self) -> u32 {
        self.div / self.mul
    }

    /// Phase-accumulator increment per output frame; a wrap past `mul`
    /// carries one extra frame into the input index.
    pub fn phase_step(&self) -> u32 {
        self.div % self.mul
    }

    /// `true` when no conversion is needed (source rate == dest rate).
    pub fn is_unity(&self) -> bool {
        self.mul == 1 && self.div == 1
    }

    /// Total input advance after `frames` output frames, starting from
    /// accumulator `acc`: `floor((acc + frames * div) / mul)`.
    ///
    /// This closed form is the drift oracle: the streamed accumulator +
    /// carry bookkeeping must consume exactly this many input frames.
    pub fn input_advance(&self, acc: u32, frames: u64) -> u64 {
        (acc as u64 + frames * self.div as u64) / self.mul as u64
    }
}

pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Modular multiplicative inverse of `a` modulo `m` (extended Euclid).
///
/// Callers guarantee `gcd(a, m) == 1` and `m >= 1`; for the phase step this
/// holds because it inherits coprimality from the reduced ratio.
pub fn mod_inverse(a: u32, m: u32) -> u32 {
    if m == 1 {
        return 0;
    }
    let (mut old_r, mut r) = (a as i64 % m as i64, m as i64);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    debug_assert_eq!(old_r, 1, "mod_inverse arguments must be coprime");
    old_s.rem_euclid(m as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_cd_to_dat() {
        let r = RateRatio::reduce(44_100, 48_000).unwrap();
        assert_eq!((r.mul(), r.div()), (160, 147));
        assert_eq!(r.whole_step(), 0);
        assert_eq!(r.phase_step(), 147);
    }

    #[test]
    fn reduction_is_exact_and_coprime() {
        for (source, dest) in [
            (8_000, 48_000),
            (48_000, 8_000),
            (44_100, 48_000),
            (48_000, 44_100),
            (22_050, 96_000),
            (192_000, 44_100),
            (11_025, 11_025),
            (7, 13),
        ] {
            let r = RateRatio::reduce(source, dest).unwrap();
            assert_eq!(gcd(r.mul(), r.div()), 1);
            // dest/source == mul/div exactly <=> dest * div == source * mul
            assert_eq!(dest as u64 * r.div() as u64, source as u64 * r.mul() as u64);
        }
    }

    #[test]
    fn zero_rates_are_rejected() {
        assert!(RateRatio::reduce(44_100, 0).is_err());
        assert!(RateRatio::reduce(0, 48_000).is_err());
    }

    #[test]
    fn closed_form_matches_streamed_carry() {
        for (source, dest) in [(44_100, 48_000), (48_000, 44_100), (48_000, 8_000), (3, 7)] {
            let r = RateRatio::reduce(source, dest).unwrap();
            let mut acc = 0u32;
            let mut consumed = 0u64;
            for n in 1..=4_000u64 {
                consumed += r.whole_step() as u64;
                acc += r.phase_step();
                if acc >= r.mul() {
                    acc -= r.mul();
                    consumed += 1;
                }
                assert_eq!(consumed, r.input_advance(0, n), "{source}->{dest} at {n}");
            }
        }
    }

    #[test]
    fn no_drift_over_a_billion_frames() {
        // 44.1 kHz -> 48 kHz: exactly 147/160 input frames per output frame.
        let r = RateRatio::reduce(44_100, 48_000).unwrap();
        assert_eq!(r.input_advance(0, 1_000_000_000), 918_750_000);
        // And the worst-case accumulator start stays exact too.
        assert_eq!(
            r.input_advance(159, 1_000_000_000),
            (159u64 + 1_000_000_000 * 147) / 160
        );
    }

    #[test]
    fn mod_inverse_round_trips() {
        for (a, m) in [(147u32, 160u32), (13, 160), (1, 7), (599, 600), (3, 1)] {
            let inv = mod_inverse(a, m);
            if m > 1 {
                assert_eq!((a as u64 * inv as u64) % m as u64, 1, "{a} mod {m}");
            }
        }
    }
}
