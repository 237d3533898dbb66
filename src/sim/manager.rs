//! Pattern roster and per-frame driver
//!
//! The manager owns every pattern and the seeded RNG they draw from. The host
//! calls [`PatternManager::tick`] once per simulated frame, then queries
//! collisions and reads drawable state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bullet::{Bullet, Shape};
use super::geometry::Hitbox;
use super::pattern::Pattern;
use super::patterns::{Flower, Mercury, Rings, Ripple, Saucer, Spiral, StaticField};
use crate::Color;
use crate::config::SimConfig;

/// Ordered collection of patterns plus the shared RNG
pub struct PatternManager {
    patterns: Vec<Box<dyn Pattern>>,
    rng: Pcg32,
    seed: u64,
    tick_count: u64,
}

impl PatternManager {
    pub fn new(seed: u64) -> Self {
        log::info!("Pattern manager seeded with {}", seed);
        Self {
            patterns: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tick_count: 0,
        }
    }

    /// The stock roster, every pattern inactive:
    /// static field, spiral, ripple, saucer, rings, flower, mercury
    pub fn with_default_roster(config: &SimConfig, seed: u64) -> Self {
        let mut manager = Self::new(seed);
        manager.add_pattern(Box::new(StaticField::new()));
        manager.add_pattern(Box::new(Spiral::new(&config.spiral)));
        manager.add_pattern(Box::new(Ripple::new(&config.ripple)));
        manager.add_pattern(Box::new(Saucer::new(&config.saucer)));
        manager.add_pattern(Box::new(Rings::new(&config.rings)));
        manager.add_pattern(Box::new(Flower::new(&config.flower)));
        let mercury = Mercury::new(&config.mercury, &mut manager.rng);
        manager.add_pattern(Box::new(mercury));
        manager.deactivate_all();
        manager
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Append a pattern, returning its index
    pub fn add_pattern(&mut self, pattern: Box<dyn Pattern>) -> usize {
        log::debug!("Registered pattern {} at {}", pattern.name(), self.patterns.len());
        self.patterns.push(pattern);
        self.patterns.len() - 1
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Pattern> {
        self.patterns.get(index).map(|p| p.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Pattern + 'static)> {
        self.patterns.get_mut(index).map(|p| p.as_mut())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &dyn Pattern> {
        self.patterns.iter().map(|p| p.as_ref())
    }

    /// One simulated frame: retire, emit, advance the clock, move
    pub fn tick(&mut self) {
        for pattern in &mut self.patterns {
            pattern.retire_out_of_bounds();
            pattern.emit(&mut self.rng);
            pattern.increment_frame();
            pattern.advance();
        }
        self.tick_count += 1;
    }

    /// Deactivate and reset every pattern. All but the static field lose their bullets.
    pub fn deactivate_all(&mut self) {
        for (i, pattern) in self.patterns.iter_mut().enumerate() {
            pattern.set_active(false);
            pattern.reset(&mut self.rng);
            if i != 0 {
                pattern.clear();
            }
        }
    }

    /// Make `index` the only running pattern
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.patterns.len() {
            log::warn!("No pattern at index {} ({} registered)", index, self.patterns.len());
            return false;
        }
        self.deactivate_all();
        self.patterns[index].set_active(true);
        log::info!("Selected pattern {} ({})", index, self.patterns[index].name());
        true
    }

    pub fn select_by_name(&mut self, name: &str) -> Option<usize> {
        let index = self.patterns.iter().position(|p| p.name() == name);
        match index {
            Some(i) => {
                self.select(i);
            }
            None => log::warn!("Unknown pattern {:?}", name),
        }
        index
    }

    /// Turn every projectile by `degrees`, active or not
    pub fn rotate_all_bullets(&mut self, degrees: f32) {
        for pattern in &mut self.patterns {
            for bullet in pattern.bullets_mut() {
                bullet.rotate(degrees, 0.0);
            }
        }
    }

    /// Whether any projectile of an active pattern touches the hitbox
    pub fn query_collision(&self, hitbox: &Hitbox) -> bool {
        self.patterns
            .iter()
            .filter(|p| p.is_active())
            .any(|p| p.bullets().iter().any(|b| b.check_collision(hitbox)))
    }

    /// Projectiles the renderer should draw: active patterns only, in roster order
    pub fn visible_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.patterns
            .iter()
            .filter(|p| p.is_active())
            .flat_map(|p| p.bullets().iter())
            .filter(|b| b.is_visible())
    }

    pub fn live_bullet_count(&self) -> usize {
        self.patterns.iter().map(|p| p.bullets().len()).sum()
    }

    /// Drawable state of the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        let bullets: Vec<BulletView> = self
            .patterns
            .iter()
            .filter(|p| p.is_active())
            .flat_map(|p| {
                let name = p.name();
                p.bullets()
                    .iter()
                    .filter(|b| b.is_visible())
                    .map(move |b| BulletView::from_bullet(name, b))
            })
            .collect();
        FrameSnapshot {
            tick: self.tick_count,
            bullet_count: bullets.len(),
            bullets,
        }
    }
}

/// Serializable view of a frame for hosts and debugging
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub bullet_count: usize,
    pub bullets: Vec<BulletView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pattern: &'static str,
    pub shape: &'static str,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    /// Hitbox radius, or current width for beams
    pub size: f32,
    pub color: Color,
}

impl BulletView {
    fn from_bullet(pattern: &'static str, bullet: &Bullet) -> Self {
        let size = match &bullet.shape {
            Shape::Laser(laser) => laser.width,
            shape => shape.hitbox_radius().unwrap_or(0.0),
        };
        Self {
            pattern,
            shape: bullet.shape.name(),
            x: bullet.pos.x,
            y: bullet.pos.y,
            heading: bullet.heading(),
            size,
            color: bullet.color,
        }
    }
}
