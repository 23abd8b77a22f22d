//! Error type shared by the resampling core and its source adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResampleError {
    /// Destination (or source) sample rate was zero.
    #[error("invalid sample rate: {0} Hz")]
    InvalidRate(u32),

    /// Channel count was zero.
    #[error("invalid channel count")]
    InvalidChannels,

    /// An output buffer shorter than one frame was passed to `read`.
    #[error("output buffer holds less than one frame ({len} samples, {channels} channels)")]
    BufferTooSmall { len: usize, channels: usize },

    /// The upstream source failed.
    #[error("upstream source error: {0}")]
    Source(String),
}
