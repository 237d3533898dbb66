//! Fast rings with random kind, angle and position

use rand::{Rng, RngCore};

use super::{jitter, random_degrees};
use crate::Color;
use crate::config::RingsConfig;
use crate::consts::{CIRCLE_RADIUS, DOT_RADIUS};
use crate::sim::pattern::{Pattern, PatternCore, palette};

/// Jitter box around the source
const VARIANCE_X: u32 = 200;
const VARIANCE_Y: u32 = 100;

#[derive(Debug, Clone)]
pub struct Rings {
    core: PatternCore,
}

impl Rings {
    pub fn new(config: &RingsConfig) -> Self {
        Self {
            core: PatternCore::new(
                config.stream_count,
                config.shots_per_second,
                config.base_speed,
                config.source,
            ),
        }
    }
}

impl Pattern for Rings {
    fn name(&self) -> &'static str {
        "rings"
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
        let use_dots = rng.random_bool(0.5);
        let source = self.core.source + jitter(rng, VARIANCE_X, VARIANCE_Y);
        let streams = self.core.stream_count;
        let speed = self.core.base_speed;
        for i in 0..streams {
            let heading = angle + i as f32 * 360.0 / streams as f32;
            if use_dots {
                self.core.add_dot(source, speed, heading, palette::DOT, DOT_RADIUS);
            } else {
                self.core.add_circle(source, speed, heading, Color::BLUE, CIRCLE_RADIUS);
            }
        }
    }
}
