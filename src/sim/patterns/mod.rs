//! Concrete emission algorithms
//!
//! Each pattern wraps a [`PatternCore`](super::PatternCore) and implements
//! [`Pattern`](super::Pattern). Wave-indexed patterns also own a
//! [`WaveTracker`](super::WaveTracker).

mod flower;
mod mercury;
mod rings;
mod ripple;
mod saucer;
mod spiral;
mod static_field;

pub use flower::{Flower, FlowerGeometry, FlowerPhase};
pub use mercury::Mercury;
pub use rings::Rings;
pub use ripple::Ripple;
pub use saucer::{RadiusEasing, Saucer};
pub use spiral::Spiral;
pub use static_field::StaticField;

use glam::Vec2;
use rand::{Rng, RngCore};

/// Uniform whole-degree heading in [0, 360)
pub(crate) fn random_degrees(rng: &mut dyn RngCore) -> f32 {
    rng.random_range(0..360) as f32
}

/// Offset of a point jittered uniformly within a `span_x` by `span_y` box
/// centered on the origin
pub(crate) fn jitter(rng: &mut dyn RngCore, span_x: u32, span_y: u32) -> Vec2 {
    Vec2::new(jitter_axis(rng, span_x), jitter_axis(rng, span_y))
}

fn jitter_axis(rng: &mut dyn RngCore, span: u32) -> f32 {
    if span == 0 {
        return 0.0;
    }
    rng.random_range(0..span) as f32 - (span / 2) as f32
}
