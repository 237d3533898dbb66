//! Deterministic simulation module
//!
//! All bullet logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one frame at `SIM_FPS`)
//! - Seeded RNG only, owned by the manager
//! - Stable iteration order (patterns in roster order, bullets in vector order)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod collision;
pub mod geometry;
pub mod laser;
pub mod manager;
pub mod pattern;
pub mod patterns;
pub mod wave;

pub use bullet::{Bullet, BulletFlag, Shape};
pub use collision::{circle_hits, point_in_beam_rect, to_local_frame};
pub use geometry::{Hitbox, Rect};
pub use laser::{Laser, LaserPhase};
pub use manager::{BulletView, FrameSnapshot, PatternManager};
pub use pattern::{Pattern, PatternCore, close_wave, prepend_tracked, retire_tracked};
pub use patterns::{Flower, FlowerPhase, Mercury, Rings, Ripple, Saucer, Spiral, StaticField};
pub use wave::WaveTracker;
