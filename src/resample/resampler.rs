//! `resample/resampler.rs` — the orchestrator.
//!
//! Owns the boxed upstream source and ties the pieces together per `read`
//! call: size the staging window from the exact rational mapping, pull,
//! then drive cursor + kernel across the staged frames into the caller's
//! buffer. All cross-call state lives in the cursor and the window, so the
//! output is identical no matter how the stream is sliced into calls.

use tracing::{debug, trace};

use crate::{
    ReadResult, ResampleError, SampleFormat,
    constants::{EOS_PAD_FRAMES, KERNEL_TAPS, PHASE_CACHE_LIMIT},
    filters::AntiAliasSource,
    resample::{
        coefficients::{CoefficientTable, Strategy},
        cursor::PhaseCursor,
        kernel::Kernel,
        ratio::RateRatio,
        window::{FillOutcome, StreamWindow},
    },
    source::PcmSource,
};

/// Construction-time tunables.
#[derive(Debug, Copy, Clone)]
pub struct ResamplerOptions {
    /// Threshold `T` of the strategy selection: full table up to `T` phases,
    /// half table up to `2T`, per-frame evaluation above.
    pub phase_cache_limit: u32,
}

impl Default for ResamplerOptions {
    fn default() -> Self {
        Self {
            phase_cache_limit: PHASE_CACHE_LIMIT,
        }
    }
}

/// Streaming rational Catmull-Rom resampler.
///
/// Pulls from the owned source on demand; one instance is single-threaded
/// by construction (`read` takes `&mut self`) and never blocks beyond the
/// upstream source's own `read`.
pub struct Resampler {
    source: Box<dyn PcmSource>,
    source_format: SampleFormat,
    output_format: SampleFormat,
    ratio: RateRatio,
    table: CoefficientTable,
    cursor: PhaseCursor,
    kernel: Kernel,
    window: StreamWindow,
    /// Upstream reported end-of-stream.
    upstream_ended: bool,
    /// Zero tap padding currently staged in the window.
    padded: bool,
    /// All derivable output emitted and end-of-stream reported.
    finished: bool,
}

impl Resampler {
    pub fn new(source: Box<dyn PcmSource>, dest_rate: u32) -> Result<Self, ResampleError> {
        Self::with_options(source, dest_rate, ResamplerOptions::default())
    }

    /// Like [`Resampler::new`], wrapping the source in an anti-aliasing
    /// low-pass first when the conversion actually downsamples.
    pub fn with_lowpass(source: Box<dyn PcmSource>, dest_rate: u32) -> Result<Self, ResampleError> {
        if dest_rate >= 1 && dest_rate < source.format().sample_rate() {
            Self::new(Box::new(AntiAliasSource::new(source, dest_rate)), dest_rate)
        } else {
            Self::new(source, dest_rate)
        }
    }

    pub fn with_options(
        source: Box<dyn PcmSource>,
        dest_rate: u32,
        options: ResamplerOptions,
    ) -> Result<Self, ResampleError> {
        let source_format = source.format();
        if source_format.channels() == 0 {
            return Err(ResampleError::InvalidChannels);
        }
        let ratio = RateRatio::reduce(source_format.sample_rate(), dest_rate)?;
        let table = CoefficientTable::build(&ratio, options.phase_cache_limit);
        let cursor = PhaseCursor::start(&ratio, &table);
        debug!(
            source_rate = source_format.sample_rate(),
            dest_rate,
            mul = ratio.mul(),
            div = ratio.div(),
            strategy = ?table.strategy(),
            "resampler constructed"
        );

        Ok(Self {
            kernel: Kernel::new(source_format.channels()),
            window: StreamWindow::new(source_format.channels()),
            output_format: source_format.with_rate(dest_rate),
            source,
            source_format,
            ratio,
            table,
            cursor,
            upstream_ended: false,
            padded: false,
            finished: false,
        })
    }

    /// Format of the frames `read` produces.
    pub fn format(&self) -> SampleFormat {
        self.output_format
    }

    pub fn source_format(&self) -> SampleFormat {
        self.source_format
    }

    /// Coefficient storage strategy chosen at construction.
    pub fn strategy(&self) -> Strategy {
        self.table.strategy()
    }

    /// `true` when source and destination rates are equal; callers can skip
    /// the resampler entirely.
    pub fn is_passthrough(&self) -> bool {
        self.ratio.is_unity()
    }

    /// Fill `out` (interleaved, truncated down to whole frames) with
    /// resampled frames.
    ///
    /// Returns the produced frame count — `Frames(0)` means the upstream had
    /// nothing right now, call again — or `EndOfStream` once every frame
    /// derivable from the input has been emitted.
    pub fn read(&mut self, out: &mut [f32]) -> Result<ReadResult, ResampleError> {
        let channels = self.output_format.channels();
        if out.len() < channels {
            return Err(ResampleError::BufferTooSmall {
                len: out.len(),
                channels,
            });
        }
        if self.finished {
            return Ok(ReadResult::EndOfStream);
        }
        let requested = out.len() / channels;

        if !self.upstream_ended {
            // Staged frames needed: the rational advance over the whole
            // request plus the 4 taps of the final frame.
            let required = self
                .ratio
                .input_advance(self.cursor.accumulator(), requested as u64 - 1)
                as usize
                + KERNEL_TAPS;
            if self.window.fill_from(self.source.as_mut(), required)? == FillOutcome::Ended {
                trace!("upstream ended, flushing");
                self.upstream_ended = true;
            }
        }
        if self.upstream_ended && !self.padded {
            if self.window.valid_frames() > 0 {
                self.window.pad_tail_zeros(EOS_PAD_FRAMES);
            }
            self.padded = true;
        }

        let mut produced = 0;
        let mut off = 0;
        while produced < requested && off + KERNEL_TAPS <= self.window.valid_frames() {
            let weights = self.cursor.weights(&self.ratio, &self.table);
            self.kernel.run(
                self.window.taps(off),
                weights,
                &mut out[produced * channels..(produced + 1) * channels],
            );
            off += self.cursor.advance(&self.ratio, &self.table);
            produced += 1;
        }
        if self.padded {
            // Strip the zero tail before carrying frames over; it is
            // re-appended for as long as the flush continues, which keeps
            // the carried look-ahead bounded by real frames only.
            self.window
                .truncate_frames(self.window.valid_frames().saturating_sub(EOS_PAD_FRAMES));
            self.padded = false;
        }
        self.window.retain_from(off);

        if produced == 0 && self.upstream_ended {
            self.finished = true;
            return Ok(ReadResult::EndOfStream);
        }
        Ok(ReadResult::Frames(produced))
    }

    /// Reset cursor and staging state in place after the upstream has been
    /// seeked. The coefficient table is untouched.
    pub fn reset(&mut self) {
        self.cursor.seek(0, &self.ratio, &self.table);
        self.window.reset();
        self.upstream_ended = false;
        self.padded = false;
        self.finished = false;
    }

    /// Release the staging buffer and the upstream source.
    pub fn dispose(self) {}
}
