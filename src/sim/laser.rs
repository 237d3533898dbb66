//! Beam (laser) growth and activation state machine
//!
//! A beam is anchored at its center point and spans the window along its
//! heading. Its lifecycle is driven by its own frame counter:
//!
//! ```text
//! Growing (t <= delay) -> Active (hitbox on) -> Shrinking (t > delay + duration) -> Collapsed
//! ```
//!
//! Width grows at `growth_speed` per second from the end of the activation
//! delay, clipped to `max_width`, and shrinks at twice that rate once the
//! active duration has elapsed, clamped at zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{circle_hits, point_in_beam_rect};
use super::geometry::Hitbox;
use crate::consts::{LASER_LENGTH, SIM_FPS};

/// Width of a freshly armed beam
pub const LASER_START_WIDTH: f32 = 1.0;

/// Current stage of a beam's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserPhase {
    /// Before the activation delay elapses; no hitbox
    Growing,
    /// Hitbox on
    Active,
    /// Past delay + duration; width heading to zero
    Shrinking,
    /// Fully shrunk
    Collapsed,
}

/// Beam geometry and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    /// Width at full growth (should be at least 2)
    pub max_width: f32,
    /// Pixels per second. A growth speed equal to `max_width` reaches full width in one second
    pub growth_speed: f32,
    /// Seconds before the hitbox turns on
    pub activation_delay: f32,
    /// Seconds the hitbox stays on
    pub active_duration: f32,
    /// Current drawn width
    pub width: f32,
    /// Frames since creation or last reset
    pub frame_counter: u32,
    hitbox_active: bool,
}

impl Laser {
    pub fn new(max_width: f32, growth_speed: f32, activation_delay: f32, active_duration: f32) -> Self {
        Self {
            max_width,
            growth_speed,
            activation_delay,
            active_duration,
            width: LASER_START_WIDTH,
            frame_counter: 0,
            hitbox_active: false,
        }
    }

    /// Seconds elapsed on the beam's own clock
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.frame_counter as f32 / SIM_FPS
    }

    pub fn hitbox_active(&self) -> bool {
        self.hitbox_active
    }

    pub fn phase(&self) -> LaserPhase {
        let t = self.elapsed();
        if t > self.activation_delay + self.active_duration {
            if self.width <= 0.0 {
                LaserPhase::Collapsed
            } else {
                LaserPhase::Shrinking
            }
        } else if t > self.activation_delay {
            LaserPhase::Active
        } else {
            LaserPhase::Growing
        }
    }

    /// Advance the beam clock by one frame and update width and hitbox state
    pub fn step(&mut self) {
        self.frame_counter += 1;
        let t = self.elapsed();
        let deactivate_at = self.activation_delay + self.active_duration;

        if t > deactivate_at {
            self.hitbox_active = false;
            // Shrinks at twice the growth speed
            let shrunk = self.max_width - (t - deactivate_at) * self.growth_speed * 2.0;
            self.width = shrunk.clamp(0.0, self.max_width.max(0.0));
        } else if t > self.activation_delay {
            self.hitbox_active = true;
            let grown = (t - self.activation_delay) * self.growth_speed;
            self.width = grown.min(self.max_width).max(0.0);
        }
    }

    /// Re-arm the beam: clock back to zero, start width, hitbox off
    pub fn reset(&mut self) {
        self.frame_counter = 0;
        self.width = LASER_START_WIDTH;
        self.hitbox_active = false;
    }

    /// Radius of the circle drawn at the beam's anchor
    pub fn cap_radius(&self) -> f32 {
        self.width / 1.4
    }

    /// Compound hit test: the rotated body rectangle or the anchor circle.
    ///
    /// Only live while the hitbox is active.
    pub fn hits(&self, center: Vec2, heading_degrees: f32, hitbox: &Hitbox) -> bool {
        if !self.hitbox_active {
            return false;
        }
        point_in_beam_rect(hitbox.center, center, heading_degrees, LASER_LENGTH, self.width)
            || circle_hits(center, self.max_width / 2.0, hitbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_clipped_to_max() {
        let mut laser = Laser::new(10.0, 20.0, 0.25, 1.0);
        for _ in 0..15 {
            laser.step();
        }
        assert_eq!(laser.phase(), LaserPhase::Growing);
        assert_eq!(laser.width, LASER_START_WIDTH);

        // 0.5s into the active window: 0.5 * 20 = 10 = max
        for _ in 0..45 {
            laser.step();
        }
        assert_eq!(laser.phase(), LaserPhase::Active);
        assert!((laser.width - 10.0).abs() < 1e-3);

        for _ in 0..10 {
            laser.step();
        }
        assert!((laser.width - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_shrink_at_double_rate_and_collapse() {
        let mut laser = Laser::new(10.0, 20.0, 0.25, 1.0);
        for _ in 0..75 {
            laser.step();
        }
        assert_eq!(laser.phase(), LaserPhase::Active);

        // 6 frames = 0.1s past deactivation: 10 - 0.1 * 40 = 6
        for _ in 0..6 {
            laser.step();
        }
        assert_eq!(laser.phase(), LaserPhase::Shrinking);
        assert!((laser.width - 6.0).abs() < 1e-3);
        assert!(!laser.hitbox_active());

        for _ in 0..60 {
            laser.step();
        }
        assert_eq!(laser.width, 0.0);
        assert_eq!(laser.phase(), LaserPhase::Collapsed);
    }

    #[test]
    fn test_reset_rearms() {
        let mut laser = Laser::new(10.0, 20.0, 0.25, 1.0);
        for _ in 0..30 {
            laser.step();
        }
        assert!(laser.hitbox_active());
        laser.reset();
        assert!(!laser.hitbox_active());
        assert_eq!(laser.frame_counter, 0);
        assert_eq!(laser.width, LASER_START_WIDTH);
        assert_eq!(laser.phase(), LaserPhase::Growing);
    }
}
