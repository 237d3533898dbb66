//! Rings of rice that ricochet once off the side walls

use rand::RngCore;

use super::{jitter, random_degrees};
use crate::Color;
use crate::config::RippleConfig;
use crate::consts::RICE_RADIUS;
use crate::sim::bullet::BulletFlag;
use crate::sim::geometry::Rect;
use crate::sim::pattern::{Pattern, PatternCore};

/// Randomly placed rings that bounce off the walls of `bounce_bounds`.
///
/// Side walls reflect a bullet only until its first bounce. The top wall
/// always reflects; the bottom edge lets bullets through.
#[derive(Debug, Clone)]
pub struct Ripple {
    core: PatternCore,
    bounce_bounds: Rect,
    variance_x: u32,
    variance_y: u32,
}

impl Ripple {
    pub fn new(config: &RippleConfig) -> Self {
        Self {
            core: PatternCore::new(
                config.stream_count,
                config.shots_per_second,
                config.base_speed,
                config.source,
            ),
            bounce_bounds: config.bounce_bounds,
            variance_x: config.variance_x,
            variance_y: config.variance_y,
        }
    }

    pub fn bounce_bounds(&self) -> Rect {
        self.bounce_bounds
    }
}

impl Pattern for Ripple {
    fn name(&self) -> &'static str {
        "ripple"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn emit(&mut self, rng: &mut dyn RngCore) {
        if !self.core.is_active() || !self.core.is_shot_due() {
            return;
        }
        let angle = random_degrees(rng);
        // The very first ring leaves from the exact source
        let source = if self.core.frame_counter != 0 {
            self.core.source + jitter(rng, self.variance_x, self.variance_y)
        } else {
            self.core.source
        };
        let streams = self.core.stream_count;
        let speed = self.core.base_speed;
        for i in 0..streams {
            let heading = angle + i as f32 * 360.0 / streams as f32;
            self.core.add_rice(source, speed, heading, Color::BLUE, RICE_RADIUS);
        }
    }

    fn advance(&mut self) {
        if !self.core.is_active() {
            return;
        }
        let walls = self.bounce_bounds;
        for bullet in &mut self.core.bullets {
            bullet.advance();
            let p = bullet.pos;
            if walls.contains(p) || p.y >= walls.bottom() {
                continue;
            }
            let past_side = p.x < walls.left || p.x >= walls.right();
            if bullet.flag() != BulletFlag::Bounced && past_side {
                bullet.reflect_horizontal();
            } else if p.y < walls.top {
                bullet.reflect_vertical();
            }
            bullet.set_flag(BulletFlag::Bounced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ripple() -> Ripple {
        Ripple::new(&RippleConfig::default())
    }

    #[test]
    fn test_first_ring_from_exact_source() {
        let mut p = ripple();
        let mut rng = Pcg32::seed_from_u64(11);
        p.emit(&mut rng);
        assert_eq!(p.bullets().len(), 80);
        assert!(p.bullets().iter().all(|b| b.pos == Vec2::new(400.0, 200.0)));
        assert!(p.bullets().iter().all(|b| b.color == Color::BLUE));
    }

    #[test]
    fn test_left_wall_flips_once() {
        let mut p = ripple();
        let walls = p.bounce_bounds();
        // Moving left at 3 px/frame, 4 px inside the wall: exits on the second frame
        p.core_mut()
            .add_rice(Vec2::new(walls.left + 4.0, 300.0), 3.0, 180.0, Color::BLUE, RICE_RADIUS);

        p.advance();
        assert!(p.bullets()[0].velocity().x < 0.0);
        assert_eq!(p.bullets()[0].flag(), BulletFlag::Neutral);

        p.advance();
        let b = &p.bullets()[0];
        assert!(b.velocity().x > 0.0);
        assert!(b.heading() < 1e-3 || b.heading() > 360.0 - 1e-3);
        assert_eq!(b.flag(), BulletFlag::Bounced);

        // Sent back across the wall, it keeps going
        let b = &mut p.bullets_mut()[0];
        b.set_position(Vec2::new(walls.left + 1.0, 300.0));
        b.set_velocity_polar(3.0, 180.0);
        p.advance();
        p.advance();
        assert!(p.bullets()[0].velocity().x < 0.0);
        assert!(p.bullets()[0].pos.x < walls.left);
    }

    #[test]
    fn test_top_wall_always_reflects() {
        let mut p = ripple();
        let walls = p.bounce_bounds();
        p.core_mut()
            .add_rice(Vec2::new(300.0, walls.top + 1.0), 3.0, 270.0, Color::BLUE, RICE_RADIUS);
        p.bullets_mut()[0].set_flag(BulletFlag::Bounced);
        p.advance();
        assert!(p.bullets()[0].velocity().y > 0.0);
    }

    #[test]
    fn test_bottom_edge_passes_through() {
        let mut p = ripple();
        let walls = p.bounce_bounds();
        p.core_mut()
            .add_rice(Vec2::new(300.0, walls.bottom() - 1.0), 3.0, 90.0, Color::BLUE, RICE_RADIUS);
        p.advance();
        let b = &p.bullets()[0];
        assert!(b.velocity().y > 0.0);
        assert_eq!(b.flag(), BulletFlag::Neutral);
    }

    #[test]
    fn test_later_rings_jittered_within_box() {
        let mut p = ripple();
        let mut rng = Pcg32::seed_from_u64(5);
        // 0.75 shots per second: every 80 frames
        for _ in 0..=80 {
            p.emit(&mut rng);
            p.increment_frame();
        }
        assert_eq!(p.bullets().len(), 160);
        let second = p.bullets()[80].pos;
        assert!((200.0..600.0).contains(&second.x));
        assert!((100.0..300.0).contains(&second.y));
    }
}
