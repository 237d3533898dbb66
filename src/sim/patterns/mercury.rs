//! Alternating dual-speed rings that curve for a short window

use glam::Vec2;
use rand::RngCore;

use super::{jitter, random_degrees};
use crate::Color;
use crate::config::MercuryConfig;
use crate::sim::bullet::BulletFlag;
use crate::sim::pattern::{Pattern, PatternCore, close_wave, retire_tracked};
use crate::sim::wave::WaveTracker;

const BULLET_RADIUS: f32 = 8.0;
/// Frames of silence after a volley
const VOLLEY_DELAY: u32 = 120;
/// Shots per volley before the source moves
const VOLLEY_SHOTS: u32 = 16;
/// The offset half of each ring is this much faster
const SPEED_MULTIPLIER: f32 = 1.17;
/// Rotation applies for wave ages in (START, END]
const ROTATION_START: u32 = 45;
const ROTATION_END: u32 = 180;
/// Degrees per frame
const ROTATION_ANGLE: f32 = 0.375;

const VARIANCE_X: u32 = 200;
const VARIANCE_Y: u32 = 100;

#[derive(Debug, Clone)]
pub struct Mercury {
    core: PatternCore,
    waves: WaveTracker,
    /// Orange rings turning one way, cyan rings the other
    alternate: bool,
    shot_source: Vec2,
    shot_counter: u32,
    /// Frame the last volley ended, `None` before the first
    volley_end: Option<u32>,
}

impl Mercury {
    pub fn new(config: &MercuryConfig, rng: &mut dyn RngCore) -> Self {
        let mut core = PatternCore::new(
            config.stream_count,
            config.shots_per_second,
            config.base_speed,
            config.source,
        );
        core.expand_bounds(0.2);
        let shot_source = config.source + jitter(rng, VARIANCE_X, VARIANCE_Y);
        Self {
            core,
            waves: WaveTracker::new(),
            alternate: true,
            shot_source,
            shot_counter: 0,
            volley_end: None,
        }
    }

    pub fn shot_source(&self) -> Vec2 {
        self.shot_source
    }

    fn resting(&self) -> bool {
        self.volley_end
            .is_some_and(|end| self.core.frame_counter < end + VOLLEY_DELAY)
    }
}

impl Pattern for Mercury {
    fn name(&self) -> &'static str {
        "mercury"
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

    fn reset(&mut self, rng: &mut dyn RngCore) {
        self.core.reset();
        self.volley_end = None;
        self.shot_counter = 0;
        self.alternate = true;
        self.shot_source = self.core.source + jitter(rng, VARIANCE_X, VARIANCE_Y);
    }

    fn emit(&mut self, rng: &mut dyn RngCore) {
        if !self.core.is_active() || self.resting() || !self.core.is_shot_due() {
            return;
        }
        let angle = random_degrees(rng);
        let color = if self.alternate { Color::ORANGE } else { Color::CYAN };
        let streams = self.core.stream_count;
        let (source, speed) = (self.shot_source, self.core.base_speed);
        let step = 360.0 / streams as f32;
        let first = self.core.bullets.len();
        for i in 0..streams {
            let i = i as f32;
            self.core.add_circle(source, speed, angle + i * step, color, BULLET_RADIUS);
            self.core
                .add_circle(source, speed * SPEED_MULTIPLIER, angle + (i + 0.5) * step, color, BULLET_RADIUS);
        }
        close_wave(&self.core, &mut self.waves, Some(2 * streams as usize));
        if self.alternate {
            for bullet in &mut self.core.bullets[first..] {
                bullet.set_flag(BulletFlag::ReverseRotation);
            }
        }
        self.alternate = !self.alternate;

        self.shot_counter += 1;
        if self.shot_counter >= VOLLEY_SHOTS {
            self.shot_counter = 0;
            self.shot_source = self.core.source + jitter(rng, VARIANCE_X, VARIANCE_Y);
            self.volley_end = Some(self.core.frame_counter);
            log::debug!("Mercury volley ended at frame {}", self.core.frame_counter);
        }
    }

    fn advance(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.waves.age_all();
        for wave in 0..self.waves.len() {
            let Some(age) = self.waves.age(wave) else {
                continue;
            };
            let turning = age > ROTATION_START && age <= ROTATION_END;
            for j in self.waves.range(wave) {
                let Some(bullet) = self.core.bullets.get_mut(j) else {
                    log::warn!("Mercury wave {} points past bullet {}", wave, j);
                    break;
                };
                bullet.advance();
                if turning {
                    let delta = if bullet.flag() == BulletFlag::ReverseRotation {
                        ROTATION_ANGLE
                    } else {
                        -ROTATION_ANGLE
                    };
                    bullet.rotate(delta, 0.0);
                }
            }
        }
    }
}
