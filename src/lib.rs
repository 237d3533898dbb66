//! Danmaku - a frame-stepped bullet hell simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectiles, patterns, waves, collisions)
//! - `config`: Data-driven pattern tuning and demo settings
//!
//! Rendering, input decoding, audio and UI live in the host. The host calls
//! [`sim::PatternManager::tick`] once per simulated frame and reads the
//! drawable state back out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation rate. Every kinematic formula is calibrated in ticks of this rate.
    pub const SIM_FPS: f32 = 60.0;

    /// Host window size (beams are drawn across the whole window)
    pub const WINDOW_WIDTH: f32 = 1600.0;
    pub const WINDOW_HEIGHT: f32 = 900.0;

    /// Visible play-field
    pub const SCREEN_LEFT: f32 = 50.0;
    pub const SCREEN_TOP: f32 = 40.0;
    pub const SCREEN_WIDTH: f32 = 720.0;
    pub const SCREEN_HEIGHT: f32 = 840.0;
    pub const SCREEN_POS: Vec2 = Vec2::new(SCREEN_LEFT, SCREEN_TOP);

    /// Player hitbox
    pub const PLAYER_HITBOX_RADIUS: f32 = 4.0;

    /// Default projectile radii
    pub const CIRCLE_RADIUS: f32 = 6.0;
    pub const RICE_RADIUS: f32 = 4.0;
    pub const DOT_RADIUS: f32 = 4.0;
    pub const TALISMAN_RADIUS: f32 = 4.0;
    pub const BUBBLE_RADIUS: f32 = 15.0;
    pub const ARROWHEAD_RADIUS: f32 = 3.0;
    pub const SPAWNER_RADIUS: f32 = 4.0;

    /// Beam length (beams always span the window)
    pub const LASER_LENGTH: f32 = WINDOW_WIDTH;
}

/// RGBA color handed to the renderer untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT_WHITE: Color = Color::rgba(255, 255, 255, 200);
    pub const SEETHROUGH: Color = Color::rgba(255, 255, 255, 100);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const YELLOW: Color = Color::rgb(220, 220, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 200, 200);
    pub const VIOLET: Color = Color::rgb(148, 0, 211);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (speed, heading in degrees) to a screen-space vector.
///
/// Screen space is y-down, so positive headings turn clockwise on screen.
#[inline]
pub fn polar_to_cartesian(speed: f32, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(speed * cos, speed * sin)
}

/// Heading of a vector in degrees, `None` for the zero vector
#[inline]
pub fn heading_of(v: Vec2) -> Option<f32> {
    if v == Vec2::ZERO {
        None
    } else {
        Some(normalize_degrees(v.y.atan2(v.x).to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert!((normalize_degrees(-55.0) - 305.0).abs() < 1e-4);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-4);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_polar_to_cartesian_y_down() {
        let v = polar_to_cartesian(2.0, 90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_of_zero_vector() {
        assert_eq!(heading_of(Vec2::ZERO), None);
        let h = heading_of(Vec2::new(0.0, -3.0)).unwrap();
        assert!((h - 270.0).abs() < 1e-4);
    }
}
