//! `PcmSource` — the common contract for all pull-based PCM sources.
//!
//! The resampler, the anti-aliasing pre-filter and any upstream read-ahead
//! layer all speak this one trait, so stages compose by wrapping.
//!
//! # The read contract
//!
//! `read` fills an interleaved `f32` buffer and reports exactly one of:
//!
//! | Result                  | Meaning                                  |
//! |-------------------------|------------------------------------------|
//! | `Frames(n)` with n > 0  | `n` frames were written                  |
//! | `Frames(0)`             | nothing available right now — call again |
//! | `EndOfStream`           | no more data, ever                       |
//!
//! The distinction between "nothing right now" and "nothing ever again" is
//! load-bearing: downstream stages return a shrunk (possibly empty) block on
//! the former and flush + terminate on the latter.

use crate::{ResampleError, SampleFormat};

/// Outcome of one pull from a [`PcmSource`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// Frames written into the buffer. `Frames(0)` means retry later.
    Frames(usize),
    /// The stream is exhausted; no call will ever produce data again.
    EndOfStream,
}

/// Common trait implemented by every pull-based PCM source.
pub trait PcmSource: Send {
    /// Channel count and sample rate of the frames this source produces.
    fn format(&self) -> SampleFormat;

    /// Fill `buf` (interleaved, truncated down to whole frames) and report
    /// how many frames were written.
    fn read(&mut self, buf: &mut [f32]) -> Result<ReadResult, ResampleError>;
}

// ─── BufferSource ─────────────────────────────────────────────────────────────

/// A [`PcmSource`] over an owned interleaved buffer.
///
/// Mostly useful for tests and for feeding decoded blocks into a chain; a
/// `chunk_limit` caps how many frames a single `read` hands out, which makes
/// it easy to exercise partial-read paths.
pub struct BufferSource {
    data: Vec<f32>,
    format: SampleFormat,
    pos: usize,
    chunk_limit: Option<usize>,
}

impl BufferSource {
    /// `data.len()` is truncated down to a whole number of frames.
    pub fn new(data: Vec<f32>, format: SampleFormat) -> Self {
        let mut data = data;
        let channels = format.channels().max(1);
        data.truncate(data.len() / channels * channels);
        Self {
            data,
            format,
            pos: 0,
            chunk_limit: None,
        }
    }

    /// Cap every `read` at `frames` frames.
    pub fn with_chunk_limit(mut self, frames: usize) -> Self {
        self.chunk_limit = Some(frames);
        self
    }

    /// Frames not yet handed out.
    pub fn remaining_frames(&self) -> usize {
        (self.data.len() - self.pos) / self.format.channels()
    }
}

impl PcmSource for BufferSource {
    fn format(&self) -> SampleFormat {
        self.format
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<ReadResult, ResampleError> {
        let channels = self.format.channels();
        if self.pos >= self.data.len() {
            return Ok(ReadResult::EndOfStream);
        }

        let mut frames = (buf.len() / channels).min(self.remaining_frames());
        if let Some(limit) = self.chunk_limit {
            frames = frames.min(limit);
        }

        let samples = frames * channels;
        buf[..samples].copy_from_slice(&self.data[self.pos..self.pos + samples]);
        self.pos += samples;
        Ok(ReadResult::Frames(frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_source_drains_then_ends() {
        let format = SampleFormat::new(48_000, 2);
        let mut src = BufferSource::new((0..10).map(|i| i as f32).collect(), format);

        let mut buf = [0.0f32; 6];
        assert_eq!(src.read(&mut buf).unwrap(), ReadResult::Frames(3));
        assert_eq!(&buf, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(src.read(&mut buf).unwrap(), ReadResult::Frames(2));
        assert_eq!(&buf[..4], &[6.0, 7.0, 8.0, 9.0]);
        assert_eq!(src.read(&mut buf).unwrap(), ReadResult::EndOfStream);
        assert_eq!(src.read(&mut buf).unwrap(), ReadResult::EndOfStream);
    }

    #[test]
    fn chunk_limit_caps_reads() {
        let format = SampleFormat::new(48_000, 1);
        let mut src =
            BufferSource::new(vec![1.0; 100], format).with_chunk_limit(7);

        let mut buf = [0.0f32; 64];
        assert_eq!(src.read(&mut buf).unwrap(), ReadResult::Frames(7));
    }

    #[test]
    fn odd_tail_sample_is_dropped() {
        let format = SampleFormat::new(48_000, 2);
        let src = BufferSource::new(vec![0.0; 5], format);
        assert_eq!(src.remaining_frames(), 2);
    }
}
