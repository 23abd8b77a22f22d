//! `resample/window.rs` — the input staging window.
//!
//! Owns the growable interleaved buffer the kernel taps into. Layout during
//! a call, in frames:
//!
//! ```text
//! [ history | carried look-ahead (0..=3) | frames pulled this call ... ]
//!   ^ tap 0 of the next output frame
//! ```
//!
//! Between calls only the tail that the next output still needs survives —
//! the history frame plus at most [`LOOKAHEAD_FRAMES`] carried frames,
//! copied to the front. The buffer itself never shrinks, so steady-state
//! calls allocate nothing.
//!
//! Two boundary cases are handled here: at stream start the first pulled
//! frame is repeated as history, and under aggressive downsampling the next
//! needed frame can lie beyond everything pulled so far, in which case the
//! gap is remembered and discarded from upstream on the next fill.

use tracing::trace;

use crate::{
    ResampleError,
    constants::{KERNEL_TAPS, LOOKAHEAD_FRAMES},
    source::{PcmSource, ReadResult},
};

/// Outcome of one staging pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    /// The requested frame count is staged.
    Filled,
    /// Upstream had less than requested right now; produce what is staged.
    Waiting,
    /// Upstream is exhausted for good.
    Ended,
}

pub struct StreamWindow {
    data: Vec<f32>,
    channels: usize,
    /// Frames valid from the buffer start (history frame included).
    valid_frames: usize,
    /// Carried look-ahead frames beyond the history frame, `0..=3`.
    reserved_frames: usize,
    /// Upstream frames already consumed by the cursor but never staged.
    pending_skip: usize,
    /// History frame established (stream has started).
    primed: bool,
}

impl StreamWindow {
    pub fn new(channels: usize) -> Self {
        Self {
            data: Vec::new(),
            channels,
            valid_frames: 0,
            reserved_frames: 0,
            pending_skip: 0,
            primed: false,
        }
    }

    pub fn valid_frames(&self) -> usize {
        self.valid_frames
    }

    #[cfg(test)]
    pub fn reserved_frames(&self) -> usize {
        self.reserved_frames
    }

    fn capacity_frames(&self) -> usize {
        self.data.len() / self.channels
    }

    /// Taps starting at frame `frame_off`.
    #[inline]
    pub fn taps(&self, frame_off: usize) -> &[f32] {
        debug_assert!(frame_off + KERNEL_TAPS <= self.valid_frames);
        &self.data[frame_off * self.channels..]
    }

    /// Grow (never shrink) to hold `frames` frames, preserving content.
    pub fn ensure_frames(&mut self, frames: usize) {
        let need = frames * self.channels;
        if self.data.len() < need {
            trace!(frames, "staging window grown");
            self.data.resize(need, 0.0);
        }
    }

    /// Pull from `source` until `target_frames` are staged, a short read
    /// leaves us waiting, or the stream ends. Already-staged frames are
    /// committed either way.
    pub fn fill_from(
        &mut self,
        source: &mut dyn PcmSource,
        target_frames: usize,
    ) -> Result<FillOutcome, ResampleError> {
        self.ensure_frames(target_frames);

        // Drain any gap the cursor skipped past the staged frames.
        while self.pending_skip > 0 {
            debug_assert_eq!(self.valid_frames, 0);
            let take = self.pending_skip.min(self.capacity_frames());
            match source.read(&mut self.data[..take * self.channels])? {
                ReadResult::EndOfStream => return Ok(FillOutcome::Ended),
                ReadResult::Frames(0) => return Ok(FillOutcome::Waiting),
                ReadResult::Frames(n) => self.pending_skip -= n,
            }
        }

        if !self.primed {
            // Leave frame 0 open: the first real frame doubles as history.
            if target_frames <= 1 {
                return Ok(FillOutcome::Filled);
            }
            let want = target_frames - 1;
            let span = self.channels..(1 + want) * self.channels;
            match source.read(&mut self.data[span])? {
                ReadResult::EndOfStream => return Ok(FillOutcome::Ended),
                ReadResult::Frames(0) => return Ok(FillOutcome::Waiting),
                ReadResult::Frames(n) => {
                    let (history, rest) = self.data.split_at_mut(self.channels);
                    history.copy_from_slice(&rest[..self.channels]);
                    self.primed = true;
                    self.valid_frames = n + 1;
                    if n < want {
                        return Ok(FillOutcome::Waiting);
                    }
                }
            }
        }

        while self.valid_frames < target_frames {
            let want = target_frames - self.valid_frames;
            let start = self.valid_frames * self.channels;
            match source.read(&mut self.data[start..start + want * self.channels])? {
                ReadResult::EndOfStream => return Ok(FillOutcome::Ended),
                ReadResult::Frames(0) => return Ok(FillOutcome::Waiting),
                ReadResult::Frames(n) => {
                    self.valid_frames += n;
                    if n < want {
                        return Ok(FillOutcome::Waiting);
                    }
                }
            }
        }

        Ok(FillOutcome::Filled)
    }

    /// Append `frames` zero frames (end-of-stream tap padding).
    pub fn pad_tail_zeros(&mut self, frames: usize) {
        self.ensure_frames(self.valid_frames + frames);
        let start = self.valid_frames * self.channels;
        self.data[start..start + frames * self.channels].fill(0.0);
        self.valid_frames += frames;
    }

    /// Drop staged frames beyond `frames` — strips tail padding so only real
    /// frames are carried across calls.
    pub fn truncate_frames(&mut self, frames: usize) {
        if frames < self.valid_frames {
            self.valid_frames = frames;
        }
    }

    /// Carry everything from `frame_off` on to the buffer front for the next
    /// call. A `frame_off` beyond the staged frames records the gap to be
    /// discarded from upstream instead.
    pub fn retain_from(&mut self, frame_off: usize) {
        if frame_off >= self.valid_frames {
            self.pending_skip = frame_off - self.valid_frames;
            self.valid_frames = 0;
            self.reserved_frames = 0;
            return;
        }

        let keep = self.valid_frames - frame_off;
        debug_assert!(keep <= KERNEL_TAPS, "carrying {keep} frames");
        self.data
            .copy_within(frame_off * self.channels..self.valid_frames * self.channels, 0);
        self.valid_frames = keep;
        self.reserved_frames = keep - 1;
        debug_assert!(self.reserved_frames <= LOOKAHEAD_FRAMES);
    }

    /// Forget all staged state (seek support); the allocation is kept.
    pub fn reset(&mut self) {
        self.valid_frames = 0;
        self.reserved_frames = 0;
        self.pending_skip = 0;
        self.primed = false;
    }
}
