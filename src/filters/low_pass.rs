//! `filters/low_pass.rs` — anti-aliasing low-pass pre-filter.
//!
//! When downsampling, input content above the new Nyquist would fold back
//! into the audible band; this stage removes it before the rate conversion
//! ever sees it. Two cascaded RBJ biquad sections give a 4th-order
//! Butterworth response with the cutoff just under `dest_rate / 2`.
//!
//! The filter is just another [`PcmSource`]: it pulls from the wrapped
//! source and processes in place, so the tri-state read contract passes
//! through untouched.

use std::f64::consts::PI;

use crate::{
    ResampleError, SampleFormat,
    constants::{LOWPASS_CUTOFF_RATIO, LOWPASS_SECTION_Q},
    source::{PcmSource, ReadResult},
};

/// Biquad filter coefficients (normalized by a0).
#[derive(Debug, Copy, Clone)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    fn lowpass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let omega0 = 2.0 * PI * freq / sample_rate;
        let sin_omega0 = omega0.sin();
        let cos_omega0 = omega0.cos();
        let alpha = sin_omega0 / (2.0 * q);

        let a0 = 1.0 + alpha;
        let inv_a0 = 1.0 / a0;
        Self {
            b0: (1.0 - cos_omega0) * 0.5 * inv_a0,
            b1: (1.0 - cos_omega0) * inv_a0,
            b2: (1.0 - cos_omega0) * 0.5 * inv_a0,
            a1: -2.0 * cos_omega0 * inv_a0,
            a2: (1.0 - alpha) * inv_a0,
        }
    }
}

/// Per-channel biquad filter state (Direct Form I).
#[derive(Debug, Copy, Clone, Default)]
struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        if !output.is_finite() {
            // Reset on NaN/Inf to avoid cascading errors
            *self = Self::default();
            return 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }
}

/// Anti-aliasing low-pass as a source adapter.
pub struct AntiAliasSource {
    inner: Box<dyn PcmSource>,
    coeffs: [BiquadCoeffs; 2],
    /// One state per section per channel.
    state: Vec<[BiquadState; 2]>,
}

impl AntiAliasSource {
    /// Cut everything the destination rate cannot represent. The cutoff is
    /// clamped below the *source* Nyquist so the sections stay stable even
    /// for a near-unity conversion.
    pub fn new(inner: Box<dyn PcmSource>, dest_rate: u32) -> Self {
        let format = inner.format();
        let source_rate = format.sample_rate() as f64;
        let cutoff = (LOWPASS_CUTOFF_RATIO * dest_rate as f64).min(0.49 * source_rate);
        let coeffs = [
            BiquadCoeffs::lowpass(cutoff, LOWPASS_SECTION_Q[0], source_rate),
            BiquadCoeffs::lowpass(cutoff, LOWPASS_SECTION_Q[1], source_rate),
        ];
        Self {
            coeffs,
            state: vec![[BiquadState::default(); 2]; format.channels()],
            inner,
        }
    }

    pub fn reset(&mut self) {
        for channel in &mut self.state {
            *channel = [BiquadState::default(); 2];
        }
    }
}

impl PcmSource for AntiAliasSource {
    fn format(&self) -> SampleFormat {
        self.inner.format()
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<ReadResult, ResampleError> {
        let result = self.inner.read(buf)?;
        if let ReadResult::Frames(frames) = result {
            let channels = self.state.len();
            for frame in buf[..frames * channels].chunks_exact_mut(channels) {
                for (sample, state) in frame.iter_mut().zip(self.state.iter_mut()) {
                    let mut acc = *sample as f64;
                    for (section, coeffs) in state.iter_mut().zip(self.coeffs.iter()) {
                        acc = section.process(acc, coeffs);
                    }
                    *sample = acc as f32;
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BufferSource;

    fn filtered_sine(freq: f64, source_rate: u32, dest_rate: u32, frames: usize) -> Vec<f32> {
        let data: Vec<f32> = (0..frames)
            .map(|n| (2.0 * PI * freq * n as f64 / source_rate as f64).sin() as f32)
            .collect();
        let source = BufferSource::new(data, SampleFormat::new(source_rate, 1));
        let mut filter = AntiAliasSource::new(Box::new(source), dest_rate);

        let mut out = vec![0.0f32; frames];
        let mut filled = 0;
        while filled < frames {
            match filter.read(&mut out[filled..]).unwrap() {
                ReadResult::Frames(n) => filled += n,
                ReadResult::EndOfStream => break,
            }
        }
        out.truncate(filled);
        out
    }

    fn rms(samples: &[f32]) -> f64 {
        let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
        (sum / samples.len() as f64).sqrt()
    }

    #[test]
    fn passband_is_flat() {
        // 440 Hz is far below the 24 kHz destination's cutoff.
        let out = filtered_sine(440.0, 48_000, 24_000, 8_192);
        let settled = &out[2_048..];
        assert!((rms(settled) - (0.5f64).sqrt()).abs() < 0.01, "rms {}", rms(settled));
    }

    #[test]
    fn folding_band_is_rejected() {
        // 20 kHz would alias to 4 kHz after a 48 -> 24 kHz conversion.
        let out = filtered_sine(20_000.0, 48_000, 24_000, 8_192);
        let settled = &out[2_048..];
        assert!(rms(settled) < 0.1, "rms {}", rms(settled));
    }

    #[test]
    fn read_contract_passes_through() {
        let source = BufferSource::new(vec![0.1; 8], SampleFormat::new(48_000, 1))
            .with_chunk_limit(3);
        let mut filter = AntiAliasSource::new(Box::new(source), 24_000);
        let mut buf = [0.0f32; 16];
        assert_eq!(filter.read(&mut buf).unwrap(), ReadResult::Frames(3));
        assert_eq!(filter.read(&mut buf).unwrap(), ReadResult::Frames(3));
        assert_eq!(filter.read(&mut buf).unwrap(), ReadResult::Frames(2));
        assert_eq!(filter.read(&mut buf).unwrap(), ReadResult::EndOfStream);
    }

    #[test]
    fn dc_settles_to_unity_gain() {
        let source = BufferSource::new(vec![0.5; 4_096], SampleFormat::new(48_000, 1));
        let mut filter = AntiAliasSource::new(Box::new(source), 24_000);
        let mut buf = vec![0.0f32; 4_096];
        assert_eq!(filter.read(&mut buf).unwrap(), ReadResult::Frames(4_096));
        for &sample in &buf[1_024..] {
            assert!((sample - 0.5).abs() < 1e-3, "sample {sample}");
        }
    }
}
