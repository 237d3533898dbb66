//! Projectiles
//!
//! Every projectile is a single [`Bullet`] value carrying a tagged [`Shape`].
//! Movement and collision dispatch on the shape; there is no per-variant type.
//!
//! Heading is stored in degrees, normalized to [0, 360), and is kept in step
//! with the velocity vector by every transform that changes direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_hits;
use super::geometry::Hitbox;
use super::laser::Laser;
use crate::{Color, heading_of, normalize_degrees, polar_to_cartesian};

/// Per-pattern tag carried by each projectile.
///
/// The meaning depends on the owning pattern; a projectile belongs to exactly
/// one pattern so two meanings never apply at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletFlag {
    #[default]
    Neutral,
    /// Ripple: side walls already used
    Bounced,
    /// Ring patterns: rotate the other way
    ReverseRotation,
    /// Spawner: hitbox is live
    ActiveHitbox,
}

/// Projectile geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Round bullet, circular hitbox
    Circle { radius: f32 },
    /// Ellipse stretched 2:1 along the heading
    Rice { radius: f32 },
    /// Small round bullet
    Dot { radius: f32 },
    /// Paper charm, drawn as a 4r x 3r rectangle
    Talisman { radius: f32 },
    /// Three concentric rings
    Bubble { radius: f32 },
    /// Rice body with two barbs
    Arrowhead { radius: f32 },
    /// Growing/shrinking beam anchored at the bullet position
    Laser(Laser),
    /// Emission point that follows a scripted path
    Spawner { radius: f32, visible: bool },
}

impl Shape {
    /// Shapes drawn with more than one primitive
    pub fn has_secondary_shapes(&self) -> bool {
        matches!(self, Shape::Bubble { .. } | Shape::Arrowhead { .. } | Shape::Laser(_))
    }

    pub fn is_beam(&self) -> bool {
        matches!(self, Shape::Laser(_))
    }

    /// Radius of the circular hitbox, `None` for beams
    pub fn hitbox_radius(&self) -> Option<f32> {
        match *self {
            Shape::Circle { radius }
            | Shape::Rice { radius }
            | Shape::Dot { radius }
            | Shape::Talisman { radius }
            | Shape::Bubble { radius }
            | Shape::Spawner { radius, .. } => Some(radius),
            // Slightly larger than the drawn body
            Shape::Arrowhead { radius } => Some(radius * 1.2),
            Shape::Laser(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rice { .. } => "rice",
            Shape::Dot { .. } => "dot",
            Shape::Talisman { .. } => "talisman",
            Shape::Bubble { .. } => "bubble",
            Shape::Arrowhead { .. } => "arrowhead",
            Shape::Laser(_) => "laser",
            Shape::Spawner { .. } => "spawner",
        }
    }
}

/// A single projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    vel: Vec2,
    /// Degrees, 0 = facing right, positive turns clockwise on screen
    heading: f32,
    pub flag: BulletFlag,
    pub color: Color,
    pub shape: Shape,
}

impl Bullet {
    /// Create a projectile at `pos` moving at `speed` along `heading` degrees
    pub fn new(shape: Shape, pos: Vec2, speed: f32, heading: f32, color: Color) -> Self {
        Self {
            pos,
            vel: polar_to_cartesian(speed, heading),
            heading: normalize_degrees(heading),
            flag: BulletFlag::Neutral,
            color,
            shape,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn flag(&self) -> BulletFlag {
        self.flag
    }

    #[inline]
    pub fn set_flag(&mut self, flag: BulletFlag) {
        self.flag = flag;
    }

    /// Move one frame. Beams progress their growth state first.
    pub fn advance(&mut self) {
        if let Shape::Laser(laser) = &mut self.shape {
            laser.step();
        }
        if self.vel != Vec2::ZERO {
            self.pos += self.vel;
        }
    }

    /// Advance `frames` times
    pub fn skip_frames(&mut self, frames: u32) {
        for _ in 0..frames {
            self.advance();
        }
    }

    /// Variant-specific reset hook (re-arms beams)
    pub fn reset(&mut self) {
        if let Shape::Laser(laser) = &mut self.shape {
            laser.reset();
        }
    }

    // --- Rotational transforms ---

    /// Rotate heading by `delta` degrees and recompute velocity.
    ///
    /// `known_speed` skips the length computation when non-zero. A projectile
    /// at rest only turns its heading.
    pub fn rotate(&mut self, delta: f32, known_speed: f32) {
        if delta == 0.0 {
            return;
        }
        self.heading = normalize_degrees(self.heading + delta);
        if self.vel == Vec2::ZERO {
            return;
        }
        let speed = if known_speed != 0.0 { known_speed } else { self.speed() };
        self.vel = polar_to_cartesian(speed, self.heading);
    }

    /// Turn so that the projectile traces a circle of `radius` at `speed`.
    ///
    /// Positive speed turns clockwise on screen, negative counterclockwise.
    pub fn rotate_arc(&mut self, radius: f32, speed: f32) {
        if speed == 0.0 || radius == 0.0 {
            return;
        }
        let delta = speed * 360.0 / (std::f32::consts::TAU * radius);
        self.rotate(delta, speed.abs());
    }

    /// Set heading and point the velocity along it
    pub fn set_heading(&mut self, degrees: f32, speed: f32) {
        self.heading = normalize_degrees(degrees);
        let speed = if speed != 0.0 { speed } else { self.speed() };
        self.vel = polar_to_cartesian(speed, self.heading);
    }

    /// Turn toward a target point, keeping speed
    pub fn aim_at(&mut self, target: Vec2) {
        if let Some(h) = heading_of(target - self.pos) {
            self.set_heading(h, 0.0);
        }
    }

    /// Mirror about the vertical axis (horizontal velocity flips)
    pub fn reflect_horizontal(&mut self) {
        self.rotate(180.0 - self.heading * 2.0, 0.0);
    }

    /// Mirror about the horizontal axis (vertical velocity flips)
    pub fn reflect_vertical(&mut self) {
        self.rotate(-self.heading * 2.0, 0.0);
    }

    /// Sync heading with velocity plus an optional offset. No-op for a zero vector.
    pub fn align_heading(&mut self, offset: Vec2) {
        if let Some(h) = heading_of(self.vel + offset) {
            self.heading = h;
        }
    }

    // --- Position and velocity transforms ---

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Shift a projectile moving on an arc so its circle's center stays put
    /// while the radius changes by `delta_radius`
    pub fn align_arc(&mut self, delta_radius: f32) {
        let angle = (self.heading - 90.0).to_radians();
        self.translate(Vec2::new(delta_radius * angle.cos(), delta_radius * angle.sin()));
    }

    /// Set velocity without touching heading
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Set velocity and realign heading to it
    pub fn set_velocity_aligned(&mut self, vel: Vec2) {
        self.vel = vel;
        self.align_heading(Vec2::ZERO);
    }

    pub fn set_velocity_polar(&mut self, speed: f32, degrees: f32) {
        self.vel = polar_to_cartesian(speed, degrees);
        self.heading = normalize_degrees(degrees);
    }

    pub fn adjust_velocity(&mut self, delta: Vec2) {
        self.vel += delta;
        self.align_heading(Vec2::ZERO);
    }

    pub fn scale_velocity(&mut self, sx: f32, sy: f32) {
        self.vel *= Vec2::new(sx, sy);
        self.align_heading(Vec2::ZERO);
    }

    /// Set speed along the current heading
    pub fn set_speed(&mut self, speed: f32) {
        self.vel = polar_to_cartesian(speed, self.heading);
    }

    /// Accelerate along the current heading
    pub fn adjust_speed(&mut self, delta: f32) {
        self.vel += polar_to_cartesian(delta, self.heading);
    }

    // --- Collision and drawing ---

    /// Variant-specific hit test against the player hitbox
    pub fn check_collision(&self, hitbox: &Hitbox) -> bool {
        match &self.shape {
            Shape::Laser(laser) => laser.hits(self.pos, self.heading, hitbox),
            Shape::Spawner { radius, .. } => {
                self.flag == BulletFlag::ActiveHitbox && circle_hits(self.pos, *radius, hitbox)
            }
            shape => shape
                .hitbox_radius()
                .is_some_and(|r| circle_hits(self.pos, r, hitbox)),
        }
    }

    /// Whether the renderer should draw this projectile
    pub fn is_visible(&self) -> bool {
        match self.shape {
            Shape::Spawner { visible, .. } => visible,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_FPS;

    fn circle(pos: Vec2, speed: f32, heading: f32) -> Bullet {
        Bullet::new(Shape::Circle { radius: 4.0 }, pos, speed, heading, Color::RED)
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut b = circle(Vec2::new(10.0, 20.0), 3.0, 33.0);
        let (pos, vel, heading) = (b.pos, b.velocity(), b.heading());
        b.rotate(0.0, 0.0);
        assert_eq!(b.pos, pos);
        assert_eq!(b.velocity(), vel);
        assert_eq!(b.heading(), heading);
    }

    #[test]
    fn test_rotate_at_rest_turns_heading_only() {
        let mut b = circle(Vec2::ZERO, 0.0, 0.0);
        b.rotate(45.0, 0.0);
        assert_eq!(b.velocity(), Vec2::ZERO);
        assert!((b.heading() - 45.0).abs() < 1e-5);
        assert!(!b.heading().is_nan());
    }

    #[test]
    fn test_rotate_keeps_velocity_consistent() {
        let mut b = circle(Vec2::ZERO, 5.0, 10.0);
        b.rotate(80.0, 0.0);
        assert!((b.heading() - 90.0).abs() < 1e-4);
        assert!(b.velocity().x.abs() < 1e-4);
        assert!((b.velocity().y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_align_heading_zero_vector_keeps_default() {
        let mut b = circle(Vec2::ZERO, 0.0, 0.0);
        b.set_velocity_aligned(Vec2::ZERO);
        assert_eq!(b.heading(), 0.0);
        b.adjust_velocity(Vec2::new(0.0, -2.0));
        assert!((b.heading() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_velocity_does_not_realign() {
        let mut b = circle(Vec2::ZERO, 1.0, 0.0);
        b.set_velocity(Vec2::new(0.0, 3.0));
        assert_eq!(b.heading(), 0.0);
        b.set_velocity_aligned(Vec2::new(0.0, 3.0));
        assert!((b.heading() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflections() {
        let mut b = circle(Vec2::ZERO, 2.0, 30.0);
        let v = b.velocity();
        b.reflect_horizontal();
        assert!((b.velocity().x + v.x).abs() < 1e-4);
        assert!((b.velocity().y - v.y).abs() < 1e-4);
        assert!((b.heading() - 150.0).abs() < 1e-3);

        let v = b.velocity();
        b.reflect_vertical();
        assert!((b.velocity().x - v.x).abs() < 1e-4);
        assert!((b.velocity().y + v.y).abs() < 1e-4);
    }

    #[test]
    fn test_arc_rotation_radius_law() {
        let center = Vec2::new(400.0, 400.0);
        let radius = 100.0;
        let speed = 2.0;
        // Start on the circle's right edge moving tangentially (down, clockwise on screen)
        let mut b = circle(center + Vec2::new(radius, 0.0), speed, 90.0);
        for _ in 0..400 {
            b.advance();
            b.rotate_arc(radius, speed);
            let d = b.pos.distance(center);
            assert!((d - radius).abs() < speed, "drifted to {d}");
        }
    }

    #[test]
    fn test_rotate_arc_noop_on_zero_args() {
        let mut b = circle(Vec2::ZERO, 2.0, 10.0);
        b.rotate_arc(0.0, 3.0);
        b.rotate_arc(50.0, 0.0);
        assert!((b.heading() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_aim_at_and_adjust_speed() {
        let mut b = circle(Vec2::new(0.0, 0.0), 0.0, 0.0);
        b.aim_at(Vec2::new(0.0, 10.0));
        assert!((b.heading() - 90.0).abs() < 1e-4);
        b.adjust_speed(0.5);
        b.adjust_speed(0.5);
        assert!((b.velocity().y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_collision_scenario() {
        let b = circle(Vec2::new(100.0, 100.0), 0.0, 0.0);
        assert!(b.check_collision(&Hitbox::new(Vec2::new(107.0, 100.0), 4.0)));
        assert!(!b.check_collision(&Hitbox::new(Vec2::new(110.0, 100.0), 4.0)));
    }

    #[test]
    fn test_spawner_hitbox_gated_by_flag() {
        let mut s = Bullet::new(
            Shape::Spawner { radius: 4.0, visible: false },
            Vec2::new(50.0, 50.0),
            0.0,
            0.0,
            Color::SEETHROUGH,
        );
        let hb = Hitbox::new(Vec2::new(50.0, 50.0), 4.0);
        assert!(!s.check_collision(&hb));
        assert!(!s.is_visible());
        s.set_flag(BulletFlag::ActiveHitbox);
        assert!(s.check_collision(&hb));
    }

    #[test]
    fn test_beam_activation_window() {
        assert_eq!(SIM_FPS, 60.0);
        let mut beam = Bullet::new(
            Shape::Laser(Laser::new(10.0, 20.0, 0.25, 1.0)),
            Vec2::new(400.0, 200.0),
            0.0,
            0.0,
            Color::BLUE,
        );
        let player = Hitbox::new(Vec2::new(400.0, 200.0), 4.0);
        for tick in 0..=14 {
            beam.advance();
            assert!(!beam.check_collision(&player), "tick {tick} should be inert");
        }
        for tick in 15..=74 {
            beam.advance();
            assert!(beam.check_collision(&player), "tick {tick} should be live");
        }
        for _ in 75..200 {
            beam.advance();
            assert!(!beam.check_collision(&player));
        }
        if let Shape::Laser(laser) = &beam.shape {
            assert_eq!(laser.width, 0.0);
        }
    }

    #[test]
    fn test_beam_body_hit_along_heading() {
        let mut beam = Bullet::new(
            Shape::Laser(Laser::new(10.0, 100.0, 0.0, 5.0)),
            Vec2::new(100.0, 100.0),
            0.0,
            90.0,
            Color::BLUE,
        );
        beam.skip_frames(30);
        // Far down the beam, off the anchor circle
        assert!(beam.check_collision(&Hitbox::new(Vec2::new(101.0, 600.0), 4.0)));
        assert!(!beam.check_collision(&Hitbox::new(Vec2::new(140.0, 600.0), 4.0)));
    }
}
