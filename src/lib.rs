//! Rational cubic sample-rate conversion core for streaming audio.
//!
//! The crate converts a pull-based multi-channel `f32` PCM stream from one
//! sample rate to another using 4-tap Catmull-Rom spline interpolation.
//! Output is bit-identical no matter how the stream is sliced into `read`
//! calls: the read head is tracked with exact rational arithmetic, so there
//! is no phase drift even over days of audio.
//!
//! # Module layout
//!
//! ```text
//! src/
//! ├── lib.rs          ← SampleFormat + re-exports
//! ├── constants.rs    ← central tunables
//! ├── error.rs        ← ResampleError
//! ├── source.rs       ← PcmSource trait + ReadResult + BufferSource
//! ├── resample/       ← ratio, coefficient tables, cursor, kernel, window
//! └── filters/        ← anti-aliasing low-pass pre-filter
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use rustasample::{BufferSource, ReadResult, Resampler, SampleFormat};
//!
//! let format = SampleFormat::new(44_100, 2);
//! let source = BufferSource::new(vec![0.0; 44_100 * 2], format);
//! let mut resampler = Resampler::new(Box::new(source), 48_000).unwrap();
//!
//! let mut out = vec![0.0f32; 1024 * 2];
//! loop {
//!     match resampler.read(&mut out).unwrap() {
//!         ReadResult::Frames(0) => continue,      // upstream is waiting
//!         ReadResult::Frames(n) => { /* use out[..n * 2] */ }
//!         ReadResult::EndOfStream => break,
//!     }
//! }
//! ```

pub mod constants;
pub mod error;
pub mod filters;
pub mod resample;
pub mod source;

pub use error::ResampleError;
pub use filters::AntiAliasSource;
pub use resample::{Resampler, ResamplerOptions, Strategy};
pub use source::{BufferSource, PcmSource, ReadResult};

/// Channel count and sample rate of a PCM stream.
///
/// Immutable; shared between a source and every stage consuming it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SampleFormat {
    sample_rate: u32,
    channels: usize,
}

impl SampleFormat {
    /// `sample_rate` in Hz, `channels` interleaved per frame.
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Same channel layout at a different rate.
    pub fn with_rate(&self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: self.channels,
        }
    }
}
