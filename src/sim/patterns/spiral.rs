//! Accelerating multi-stream spiral

use rand::RngCore;

use crate::config::SpiralConfig;
use crate::consts::RICE_RADIUS;
use crate::sim::pattern::{Pattern, PatternCore, palette};

/// Rice streams whose heading follows `offset + ω·t + α·t²`
#[derive(Debug, Clone)]
pub struct Spiral {
    core: PatternCore,
    angle_offset: f32,
    angular_velocity: f32,
    angular_acceleration: f32,
}

impl Spiral {
    pub fn new(config: &SpiralConfig) -> Self {
        Self {
            core: PatternCore::new(
                config.stream_count,
                config.shots_per_second,
                config.base_speed,
                config.source,
            ),
            angle_offset: config.angle_offset,
            angular_velocity: config.angular_velocity,
            angular_acceleration: config.angular_acceleration,
        }
    }

    /// Heading of the first stream at the current frame
    pub fn base_heading(&self) -> f32 {
        let t = self.core.elapsed_seconds();
        self.angle_offset + self.angular_velocity * t + self.angular_acceleration * t * t
    }
}

impl Pattern for Spiral {
    fn name(&self) -> &'static str {
        "spiral"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn emit(&mut self, _rng: &mut dyn RngCore) {
        if !self.core.is_active() || !self.core.is_shot_due() {
            return;
        }
        let base = self.base_heading();
        let streams = self.core.stream_count;
        let (source, speed) = (self.core.source, self.core.base_speed);
        for i in 0..streams {
            let heading = base + i as f32 * 360.0 / streams as f32;
            self.core.add_rice(source, speed, heading, palette::RICE, RICE_RADIUS);
        }
    }
}
