//! Expanding counter-rotating rings from four sources
//!
//! Every wave is a set of four talisman rings. Ring bullets circle at the
//! base speed while the circle they trace grows in three phases: an eased
//! launch, a steady expansion and a slow contraction. The whole formation
//! drifts down the screen.

use glam::Vec2;
use rand::{Rng, RngCore};

use super::random_degrees;
use crate::Color;
use crate::config::SaucerConfig;
use crate::consts::{SIM_FPS, TALISMAN_RADIUS};
use crate::sim::bullet::BulletFlag;
use crate::sim::pattern::{Pattern, PatternCore, close_wave, retire_tracked};
use crate::sim::wave::WaveTracker;

/// Frames of eased launch
const PHASE1_END: u32 = 60;
/// Frames after which the ring starts contracting
const PHASE2_END: u32 = 360;
/// Radius reached at the end of phase 1
const PHASE1_RADIUS: f32 = 180.0;
/// Expansion rate entering phase 2, pixels per second
const PHASE1_EXIT_VELOCITY: f32 = 45.0;
/// Pixels per second
const PHASE2_VELOCITY: f32 = 90.0;
/// Pixels per second
const PHASE3_VELOCITY: f32 = -20.0;
/// Downward drift per frame before and after phase 2 ends
const DRIFT: f32 = 1.0;
const LATE_DRIFT: f32 = 1.1;

const COLORS: [Color; 5] = [Color::BLUE, Color::CYAN, Color::MAGENTA, Color::YELLOW, Color::RED];

/// Offsets of the four emission points from the pattern source
const SOURCE_OFFSETS: [Vec2; 4] = [
    Vec2::new(-180.0, 50.0),
    Vec2::new(180.0, 50.0),
    Vec2::new(100.0, -150.0),
    Vec2::new(-100.0, -150.0),
];

/// Piecewise ring radius as a function of wave age.
///
/// Phase 1 is a quadratic that reaches `PHASE1_RADIUS` at exactly one second
/// with slope `PHASE1_EXIT_VELOCITY`; phases 2 and 3 are linear and continue
/// from where the previous phase ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusEasing {
    start_velocity: f32,
    acceleration: f32,
}

impl RadiusEasing {
    /// Solve the quadratic `r(t) = v0·t + a·t²` for `r(T) = P` and `r'(T) = V`
    pub fn solve(target_radius: f32, target_velocity: f32, target_seconds: f32) -> Self {
        let t = target_seconds;
        let acceleration = (t * target_velocity - target_radius) / (t * t);
        Self {
            start_velocity: target_velocity - 2.0 * acceleration * t,
            acceleration,
        }
    }

    pub fn start_velocity(&self) -> f32 {
        self.start_velocity
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn radius_at(&self, age: u32) -> f32 {
        if age < PHASE1_END {
            let t = age as f32 / SIM_FPS;
            t * self.start_velocity + t * t * self.acceleration
        } else if age < PHASE2_END {
            (age - PHASE1_END) as f32 / SIM_FPS * PHASE2_VELOCITY + PHASE1_RADIUS
        } else {
            let phase2_radius = (PHASE2_END - PHASE1_END) as f32 / SIM_FPS * PHASE2_VELOCITY;
            (age - PHASE2_END) as f32 / SIM_FPS * PHASE3_VELOCITY + PHASE1_RADIUS + phase2_radius
        }
    }
}

impl Default for RadiusEasing {
    fn default() -> Self {
        Self::solve(PHASE1_RADIUS, PHASE1_EXIT_VELOCITY, PHASE1_END as f32 / SIM_FPS)
    }
}

/// Downward drift per frame for a wave of `age` frames
fn drift_at(age: u32) -> f32 {
    if age < PHASE2_END { DRIFT } else { LATE_DRIFT }
}

/// Four talisman rings per shot; half the rings turn each way
#[derive(Debug, Clone)]
pub struct Saucer {
    core: PatternCore,
    waves: WaveTracker,
    sources: [Vec2; 4],
    easing: RadiusEasing,
    /// Flips which sources turn in reverse on every shot
    alternate: bool,
}

impl Saucer {
    pub fn new(config: &SaucerConfig) -> Self {
        let mut core = PatternCore::new(
            config.stream_count,
            config.shots_per_second,
            config.base_speed,
            config.source,
        );
        core.expand_bounds(1.0);
        Self {
            core,
            waves: WaveTracker::new(),
            sources: SOURCE_OFFSETS.map(|offset| config.source + offset),
            easing: RadiusEasing::default(),
            alternate: false,
        }
    }

    pub fn sources(&self) -> &[Vec2; 4] {
        &self.sources
    }
}

impl Pattern for Saucer {
    fn name(&self) -> &'static str {
        "saucer"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn waves(&self) -> Option<&WaveTracker> {
        Some(&self.waves)
    }

    fn retire_out_of_bounds(&mut self) -> usize {
        retire_tracked(&mut self.core, &mut self.waves)
    }

    fn clear(&mut self) {
        self.core.clear();
        self.waves.clear();
    }

    fn emit(&mut self, rng: &mut dyn RngCore) {
        if !self.core.is_active() || !self.core.is_shot_due() {
            return;
        }
        let mut angle = random_degrees(rng);
        let color = COLORS[rng.random_range(0..COLORS.len())];
        let streams = self.core.stream_count;
        let (center, speed) = (self.core.source, self.core.base_speed);

        for (n, &pos) in self.sources.iter().enumerate() {
            let first = self.core.bullets.len();
            for i in 0..streams {
                let heading = angle + i as f32 * 360.0 / streams as f32;
                self.core.add_talisman(pos, speed, heading, color, TALISMAN_RADIUS);
            }
            // Diagonal pairs of sources share a direction
            let reverse = ((pos.x > center.x) ^ (pos.y > center.y)) != self.alternate;
            if reverse {
                for bullet in &mut self.core.bullets[first..] {
                    bullet.set_flag(BulletFlag::ReverseRotation);
                }
            }
            if n + 1 == self.sources.len() / 2 {
                angle = random_degrees(rng);
            }
        }

        close_wave(&self.core, &mut self.waves, Some(self.sources.len() * streams as usize));
        self.alternate = !self.alternate;
    }

    fn advance(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.waves.age_all();
        let speed = self.core.base_speed;
        for wave in 0..self.waves.len() {
            let Some(age) = self.waves.age(wave) else {
                continue;
            };
            let radius = self.easing.radius_at(age);
            let drift = drift_at(age);
            for j in self.waves.range(wave) {
                let Some(bullet) = self.core.bullets.get_mut(j) else {
                    log::warn!("Saucer wave {} points past bullet {}", wave, j);
                    break;
                };
                bullet.advance();
                let turn = if bullet.flag() == BulletFlag::Neutral { speed } else { -speed };
                bullet.rotate_arc(radius, turn);
                bullet.translate(Vec2::new(0.0, drift));
            }
        }
    }
}
