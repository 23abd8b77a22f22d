//! Rational Catmull-Rom resampling — the conversion core.
//!
//! One public type, [`Resampler`], built from four pieces:
//!
//! | Piece                | Role                                            |
//! |----------------------|-------------------------------------------------|
//! | [`ratio`]            | exact rational read-head tracking (no drift)    |
//! | [`coefficients`]     | per-phase weight tables + storage strategy      |
//! | [`cursor`]           | per-frame phase/table traversal state machine   |
//! | [`window`]           | staging buffer carrying context across calls    |
//!
//! The coefficient storage [`Strategy`] is chosen once at construction from
//! the reduced rate ratio:
//!
//! | Condition       | Strategy           | Table entries |
//! |-----------------|--------------------|---------------|
//! | `mul <= T`      | `CachedDirect`     | `mul`         |
//! | `T < mul <= 2T` | `CachedWrapped*`   | `mul / 2 + 1` |
//! | `mul > 2T`      | `Direct`           | none          |
//!
//! where `T` is [`crate::constants::PHASE_CACHE_LIMIT`]. All three cached
//! traversals are numerically equivalent to `Direct`, which is the
//! correctness oracle for the whole module.

pub mod coefficients;
pub mod cursor;
pub mod kernel;
pub mod ratio;
pub mod resampler;
pub mod window;

pub use coefficients::Strategy;
pub use resampler::{Resampler, ResamplerOptions};
