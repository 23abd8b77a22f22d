//! Pre-filter stages that sit upstream of the resampling core.
//!
//! Every filter implements [`crate::PcmSource`] by wrapping another source,
//! so stages compose by boxing: `resampler ← low-pass ← decoder`.

pub mod low_pass;

pub use low_pass::AntiAliasSource;
