//! Two three-layer flowers drawn by five spawners
//!
//! One shot starts a cycle of two flowers. Five invisible spawners trace
//! each layer as a circular arc, dropping stationary talismans behind them.
//! Every finished layer closes a wave; ninety frames later that wave is
//! launched outward by accelerating its bullets up to the base speed.
//!
//! ```text
//! Flower 1:  inner (R1) -> middle (R2) -> outer (R3, fast) -> rest
//! Flower 2:  inner (R1, slow) -> middle (R2) -> outer (R3, fast) -> rest
//! ```
//!
//! Flower 1 spawners turn clockwise, flower 2 spawners counterclockwise.
//! The spawners always occupy the front of the bullet vector and form wave 0.

use std::f32::consts::PI;

use rand::RngCore;

use super::random_degrees;
use crate::config::FlowerConfig;
use crate::consts::{SIM_FPS, SPAWNER_RADIUS, TALISMAN_RADIUS};
use crate::sim::bullet::Shape;
use crate::sim::pattern::{Pattern, PatternCore, close_wave, palette, prepend_tracked, retire_tracked};
use crate::sim::wave::WaveTracker;
use crate::{Color, polar_to_cartesian};

const PETAL_COUNT: usize = 5;
const PETAL_SPACING: f32 = 360.0 / PETAL_COUNT as f32;
/// Radius of the inner petals
const RADIUS1: f32 = 90.0;
/// Fraction of the inner circle left undrawn
const LAYER1_CUT: f32 = 0.15;
/// Frames to draw the inner circle
const ARC_DRAW_FRAMES: u32 = 48;
/// Frames after a wave closes before it launches
const LAUNCH_DELAY: u32 = 90;
const LAUNCH_ACCEL: f32 = 0.03;
const FAST_SPEED_MULTIPLIER: f32 = 1.6;
const SLOW_SPEED_MULTIPLIER: f32 = 0.85;
/// Distance from the source to where the outer layer starts, in units of RADIUS2
const OUTER_REACH: f32 = 2.365;

const COLORS: [Color; 6] = [
    Color::RED,
    Color::VIOLET,
    Color::BLUE,
    Color::GREEN,
    Color::GREEN,
    Color::CYAN,
];

/// Bullets per petal per layer
const EXPECTED_BULLETS1: f32 = 60.0;
const EXPECTED_BULLETS2: f32 = 40.0;
const EXPECTED_BULLETS3: f32 = 40.0;

/// Spawner advancements per frame, as numerator/denominator
const INNER_SCALE: (u32, u32) = (5, 4);
const OUTER_SCALE: (u32, u32) = (4, 3);

/// Talismans fan out in groups of four
const VARIANCE_CONSTANT: f32 = -187.0;
const ANGLE_VARIANCE: [f32; 4] = [
    VARIANCE_CONSTANT,
    2.0 * VARIANCE_CONSTANT,
    3.0 * VARIANCE_CONSTANT,
    4.0 * VARIANCE_CONSTANT,
];

/// Stage of the two-flower cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowerPhase {
    FirstInner,
    FirstMiddle,
    FirstOuter,
    FirstRest,
    SecondInner,
    SecondMiddle,
    SecondOuter,
    SecondRest,
}

impl FlowerPhase {
    pub fn is_rest(self) -> bool {
        matches!(self, FlowerPhase::FirstRest | FlowerPhase::SecondRest)
    }

    pub fn is_first_flower(self) -> bool {
        matches!(
            self,
            FlowerPhase::FirstInner | FlowerPhase::FirstMiddle | FlowerPhase::FirstOuter | FlowerPhase::FirstRest
        )
    }
}

/// Speeds, radii and frame checkpoints derived from the flower constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowerGeometry {
    /// Speed that draws the inner circle (minus its cut) in `ARC_DRAW_FRAMES`
    pub spawner_speed: f32,
    /// Frames spawners are pre-advanced so the cut is centered
    pub frame_offset: f32,
    pub radius2: f32,
    pub radius3: f32,
    /// Frames from the spawn point at which each layer ends
    pub layer1: u32,
    pub layer2: u32,
    pub layer3: u32,
    pub layer4: u32,
    pub layer5: u32,
    pub layer6: u32,
}

impl FlowerGeometry {
    pub fn derive() -> Self {
        let spawner_speed = 2.0 * PI * RADIUS1 * (1.0 - LAYER1_CUT) / ARC_DRAW_FRAMES as f32;
        let frame_offset = ARC_DRAW_FRAMES as f32 * (1.0 / (1.0 - LAYER1_CUT) - 1.0) / 2.0;
        let radius2 = 2.0 * (PI / PETAL_COUNT as f32).sin() * RADIUS1;
        let radius3 = radius2 * std::f32::consts::SQRT_2;

        let layer1 = ARC_DRAW_FRAMES + 1;
        let layer2 = (layer1 as f32 + PI * radius2 / spawner_speed) as u32;
        let layer3 =
            (layer2 as f32 + PI * radius3 / (FAST_SPEED_MULTIPLIER * spawner_speed) + 2.0) as u32;
        Self {
            spawner_speed,
            frame_offset,
            radius2,
            radius3,
            layer1,
            layer2,
            layer3,
            layer4: layer3 + layer1,
            layer5: layer3 + layer2,
            layer6: layer3 * 2,
        }
    }

    /// Phase `relative` frames after the spawn point, `None` past the cycle end
    pub fn phase_at(&self, relative: u32, refresh_frames: u32) -> Option<FlowerPhase> {
        let r = refresh_frames;
        let phase = if relative < self.layer1 {
            FlowerPhase::FirstInner
        } else if relative < self.layer2 {
            FlowerPhase::FirstMiddle
        } else if relative <= self.layer3 {
            FlowerPhase::FirstOuter
        } else if relative < self.layer3 + r {
            FlowerPhase::FirstRest
        } else if relative < self.layer4 + r {
            FlowerPhase::SecondInner
        } else if relative < self.layer5 + r {
            FlowerPhase::SecondMiddle
        } else if relative <= self.layer6 + r {
            FlowerPhase::SecondOuter
        } else if relative < self.layer6 + 2 * r {
            FlowerPhase::SecondRest
        } else {
            return None;
        };
        Some(phase)
    }
}

#[derive(Debug, Clone)]
pub struct Flower {
    core: PatternCore,
    waves: WaveTracker,
    geometry: FlowerGeometry,
    refresh_frames: u32,
    /// Frame the current cycle started
    spawn_point: u32,
    phase: FlowerPhase,
    shot_angle: f32,
    /// Rolled at each shot for the second flower
    next_shot_angle: f32,
    color_index: usize,
    /// Layer tuning
    circle_radius: f32,
    bullet_density: f32,
    scale: (u32, u32),
    spawner_speed: f32,
    /// Density and fan-out cycles
    cycle_counter: u32,
    variance_index: usize,
}

impl Flower {
    pub fn new(config: &FlowerConfig) -> Self {
        let geometry = FlowerGeometry::derive();
        let refresh_frames = ((config.refresh_delay * SIM_FPS).round() as u32).max(1);
        let shots_per_second = 1.0 / (geometry.layer3 as f32 / SIM_FPS + config.refresh_delay) / 2.0;
        let mut core = PatternCore::new(0, shots_per_second, config.base_speed, config.source);
        // Spawners may clip the top of the field
        core.expand_bounds(0.1);

        let mut flower = Self {
            core,
            waves: WaveTracker::new(),
            geometry,
            refresh_frames,
            spawn_point: 0,
            phase: FlowerPhase::FirstInner,
            shot_angle: 0.0,
            next_shot_angle: 0.0,
            color_index: 0,
            circle_radius: RADIUS1,
            bullet_density: 1.0,
            scale: INNER_SCALE,
            spawner_speed: geometry.spawner_speed,
            cycle_counter: 0,
            variance_index: 0,
        };
        flower.adjust_spawners();
        flower
    }

    pub fn geometry(&self) -> &FlowerGeometry {
        &self.geometry
    }

    pub fn phase(&self) -> FlowerPhase {
        self.phase
    }

    pub fn refresh_frames(&self) -> u32 {
        self.refresh_frames
    }

    fn relative_frame(&self) -> u32 {
        self.core.frame_counter.saturating_sub(self.spawn_point)
    }

    fn update_phase(&mut self) {
        if let Some(phase) = self.geometry.phase_at(self.relative_frame(), self.refresh_frames) {
            if phase != self.phase {
                log::debug!("Flower entering {:?} at frame {}", phase, self.core.frame_counter);
            }
            self.phase = phase;
        }
    }

    /// Leading spawners in the bullet vector
    fn spawner_count(&self) -> usize {
        self.core
            .bullets
            .iter()
            .take(PETAL_COUNT)
            .take_while(|b| matches!(b.shape, Shape::Spawner { .. }))
            .count()
    }

    /// Tune radius, density and speed for the current layer
    fn adjust_spawners(&mut self) {
        let base = self.geometry.spawner_speed;
        let per_step = |scale: (u32, u32)| base * scale.1 as f32 / scale.0 as f32;
        match self.phase {
            FlowerPhase::FirstInner => {
                self.circle_radius = RADIUS1;
                self.bullet_density = EXPECTED_BULLETS1 / (1.0 - LAYER1_CUT);
                self.scale = INNER_SCALE;
                self.spawner_speed = per_step(self.scale) - 0.1;
            }
            FlowerPhase::FirstMiddle | FlowerPhase::SecondMiddle => {
                self.circle_radius = self.geometry.radius2;
                self.bullet_density = EXPECTED_BULLETS2 * 2.0;
                self.spawner_speed = per_step(self.scale) + 0.2;
            }
            FlowerPhase::FirstOuter | FlowerPhase::SecondOuter => {
                self.circle_radius = self.geometry.radius3;
                self.bullet_density = EXPECTED_BULLETS3 * 2.0;
                self.scale = OUTER_SCALE;
                self.spawner_speed = FAST_SPEED_MULTIPLIER * per_step(self.scale) - 0.25;
            }
            FlowerPhase::SecondInner => {
                self.circle_radius = RADIUS1;
                self.bullet_density = EXPECTED_BULLETS1 * 1.2;
                self.scale = INNER_SCALE;
                self.spawner_speed = SLOW_SPEED_MULTIPLIER * per_step(self.scale) - 0.1;
            }
            FlowerPhase::FirstRest | FlowerPhase::SecondRest => {}
        }
    }

    /// Point spawner `i` along `base + i·spacing`, `distance` from the source,
    /// moving at `velocity_offset` from that angle
    fn steer_spawners(&mut self, base: f32, velocity_offset: f32, distance: f32) {
        let (source, speed) = (self.core.source, self.spawner_speed);
        let count = self.spawner_count();
        for (i, spawner) in self.core.bullets.iter_mut().take(count).enumerate() {
            let angle = PETAL_SPACING * i as f32 + base;
            spawner.set_velocity_polar(speed, angle + velocity_offset);
            spawner.set_position(source + polar_to_cartesian(distance, angle));
        }
    }

    fn close_layer(&mut self) {
        close_wave(&self.core, &mut self.waves, None);
        log::debug!(
            "Flower closed a layer of {} bullets at frame {}",
            self.waves.sizes().last().copied().unwrap_or(0),
            self.core.frame_counter
        );
    }

    /// Drop talismans behind each spawner and move the spawners along their arcs
    fn spawn_petals(&mut self) {
        let (numer, denom) = self.scale;
        let mut iterations = numer / denom;
        if self.cycle_counter % denom < numer % denom {
            iterations += 1;
        }
        self.cycle_counter = if self.cycle_counter + 1 >= denom { 0 } else { self.cycle_counter + 1 };

        let first_flower = self.phase.is_first_flower();
        let color = COLORS[self.color_index];
        let (radius, speed) = (self.circle_radius, self.spawner_speed);
        let spawners = self.spawner_count();
        for _ in 0..iterations {
            let variance = ANGLE_VARIANCE[self.variance_index] / self.bullet_density;
            for j in 0..spawners {
                let (pos, rotation) = (self.core.bullets[j].pos, self.core.bullets[j].heading());
                // Spawners run tangential; +-90 aims at the petal center
                let heading = if first_flower {
                    rotation + 90.0 + 15.0 + variance
                } else {
                    rotation - 90.0 - 10.0 - variance
                };
                self.core.add_talisman(pos, 0.0, heading, color, TALISMAN_RADIUS);
                self.waves.note_bullet();

                let spawner = &mut self.core.bullets[j];
                spawner.rotate_arc(radius, if first_flower { speed } else { -speed });
                spawner.advance();
            }
            self.variance_index = (self.variance_index + 1) % ANGLE_VARIANCE.len();
        }
    }
}

impl Pattern for Flower {
    fn name(&self) -> &'static str {
        "flower"
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

    fn reset(&mut self, _rng: &mut dyn RngCore) {
        self.core.reset();
        self.spawn_point = 0;
        self.variance_index = 0;
        self.cycle_counter = 0;
        self.phase = FlowerPhase::FirstInner;
        self.adjust_spawners();
    }

    fn emit(&mut self, rng: &mut dyn RngCore) {
        if !self.core.is_active() || !self.core.is_shot_due() {
            return;
        }
        self.spawn_point = self.core.frame_counter;
        self.color_index = 0;
        self.update_phase();
        self.adjust_spawners();

        // Old spawners are replaced; their wave drains with them
        for _ in 0..self.spawner_count() {
            self.core.bullets.remove(0);
            self.waves.on_removed(0);
        }
        self.shot_angle = if self.core.frame_counter != 0 { random_degrees(rng) } else { 0.0 };
        self.next_shot_angle = random_degrees(rng);

        let (source, speed) = (self.core.source, self.geometry.spawner_speed);
        for i in 0..PETAL_COUNT {
            let heading = PETAL_SPACING * i as f32 + 180.0 + self.shot_angle;
            self.core
                .add_spawner(source, speed, heading, false, palette::SPAWNER, SPAWNER_RADIUS);
        }
        prepend_tracked(&self.core, &mut self.waves, PETAL_COUNT);

        // Pre-advance so the undrawn part of the circle is centered
        let offset_frames = self.geometry.frame_offset.ceil() as u32;
        for spawner in self.core.bullets.iter_mut().take(PETAL_COUNT) {
            for _ in 0..offset_frames {
                spawner.rotate_arc(self.circle_radius, speed);
                spawner.advance();
            }
            spawner.set_speed(self.spawner_speed);
        }
    }

    fn advance(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.waves.age_all();
        self.update_phase();

        // Launch closed layers once they have waited long enough
        let launch_end = LAUNCH_DELAY as f32 + self.core.base_speed / LAUNCH_ACCEL;
        for wave in 1..self.waves.len() {
            let Some(age) = self.waves.age(wave) else {
                continue;
            };
            if age < LAUNCH_DELAY || age as f32 > launch_end {
                continue;
            }
            for j in self.waves.range(wave) {
                match self.core.bullets.get_mut(j) {
                    Some(bullet) => bullet.adjust_speed(LAUNCH_ACCEL),
                    None => {
                        log::warn!("Flower wave {} points past bullet {}", wave, j);
                        break;
                    }
                }
            }
        }

        let spawners = self.spawner_count();
        for bullet in self.core.bullets.iter_mut().skip(spawners) {
            bullet.advance();
        }

        if self.phase.is_rest() {
            return;
        }

        let g = self.geometry;
        let r = self.refresh_frames;
        let rel = self.relative_frame();
        if rel == g.layer1 {
            self.close_layer();
            self.color_index = 1;
            self.adjust_spawners();
            let base = 180.0 + self.shot_angle + PETAL_SPACING / 4.0;
            self.steer_spawners(base, PETAL_SPACING / 2.0, 2.0 * RADIUS1);
        } else if rel == g.layer2 {
            self.close_layer();
            self.color_index = 2;
            self.adjust_spawners();
            let base = 180.0 + self.shot_angle - PETAL_SPACING / 4.0;
            self.steer_spawners(base, PETAL_SPACING / 2.0, OUTER_REACH * g.radius2);
        } else if rel == g.layer3 || rel == g.layer6 + r {
            self.close_layer();
            let count = self.spawner_count();
            for spawner in self.core.bullets.iter_mut().take(count) {
                spawner.set_velocity(glam::Vec2::ZERO);
            }
        } else if rel == g.layer3 + r {
            self.color_index = 3;
            self.adjust_spawners();
            self.shot_angle = self.next_shot_angle;
            self.steer_spawners(self.shot_angle, 0.0, 0.0);
        } else if rel == g.layer4 + r {
            self.close_layer();
            self.color_index = 4;
            self.adjust_spawners();
            let base = self.shot_angle - PETAL_SPACING / 4.0;
            self.steer_spawners(base, -PETAL_SPACING / 2.0, 2.0 * RADIUS1);
        } else if rel == g.layer5 + r {
            self.close_layer();
            self.color_index = 5;
            self.adjust_spawners();
            let base = self.shot_angle + PETAL_SPACING / 4.0;
            self.steer_spawners(base, -PETAL_SPACING / 2.0, OUTER_REACH * g.radius2);
        } else {
            self.spawn_petals();
        }
    }
}
