//! Pattern base: owned bullets, frame clock, emission cadence
//!
//! A pattern owns an ordered vector of bullets and a logical frame counter.
//! Concrete algorithms implement [`Pattern`] and keep their shared state in a
//! [`PatternCore`]. The manager drives every pattern through the same
//! per-frame pipeline: retire, emit, increment frame, advance.

use glam::Vec2;
use rand::RngCore;

use super::bullet::{Bullet, Shape};
use super::geometry::Rect;
use super::laser::Laser;
use super::wave::WaveTracker;
use crate::Color;
use crate::consts::SIM_FPS;

/// Default margin added around the play-field before bullets retire
pub const DEFAULT_BOUNDS_MARGIN: f32 = 0.1;

/// Alpha applied to beam colors
const LASER_ALPHA: u8 = 150;

/// Default colors per projectile kind
pub mod palette {
    use crate::Color;

    pub const CIRCLE: Color = Color::RED;
    pub const RICE: Color = Color::MAGENTA;
    pub const DOT: Color = Color::SEETHROUGH;
    pub const TALISMAN: Color = Color::MAGENTA;
    pub const BUBBLE: Color = Color::RED;
    pub const ARROWHEAD: Color = Color::RED;
    pub const LASER: Color = Color::BLUE;
    pub const SPAWNER: Color = Color::SEETHROUGH;
}

/// State shared by every pattern
#[derive(Debug, Clone)]
pub struct PatternCore {
    /// Owned bullets; order matters for wave bookkeeping
    pub bullets: Vec<Bullet>,
    /// Logical clock, only advances while active
    pub frame_counter: u32,
    active: bool,
    /// Bullets leaving this rectangle are retired
    pub bounds: Rect,
    /// Bullets per shot
    pub stream_count: u32,
    /// Shots per second, 0 = fire once
    shots_per_second: f32,
    pub base_speed: f32,
    pub source: Vec2,
    fired_once: bool,
}

impl PatternCore {
    pub fn new(stream_count: u32, shots_per_second: f32, base_speed: f32, source: Vec2) -> Self {
        Self {
            bullets: Vec::new(),
            frame_counter: 0,
            active: true,
            bounds: Rect::screen().expanded(DEFAULT_BOUNDS_MARGIN),
            stream_count,
            shots_per_second: shots_per_second.clamp(0.0, SIM_FPS),
            base_speed,
            source,
            fired_once: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn shots_per_second(&self) -> f32 {
        self.shots_per_second
    }

    /// Frames between shots, `None` for the fire-once sentinel
    pub fn frames_per_shot(&self) -> Option<u32> {
        if self.shots_per_second <= 0.0 {
            None
        } else {
            Some(((SIM_FPS / self.shots_per_second).round() as u32).max(1))
        }
    }

    /// Elapsed pattern time in seconds
    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.frame_counter as f32 / SIM_FPS
    }

    /// Cadence gate used by every emission algorithm.
    ///
    /// With zero shots per second this returns true on the first call and
    /// deactivates the pattern.
    pub fn is_shot_due(&mut self) -> bool {
        match self.frames_per_shot() {
            Some(frames) => self.frame_counter % frames == 0,
            None => {
                if self.fired_once {
                    return false;
                }
                self.fired_once = true;
                self.active = false;
                true
            }
        }
    }

    pub fn increment_frame(&mut self) {
        if self.active {
            self.frame_counter += 1;
        }
    }

    /// Move every bullet one frame
    pub fn advance_bullets(&mut self) {
        if !self.active {
            return;
        }
        for bullet in &mut self.bullets {
            bullet.advance();
        }
    }

    /// Remove bullets outside the bounds, preserving survivor order.
    ///
    /// `on_remove` receives each removed bullet's index as it was just before
    /// its removal.
    pub fn retire_out_of_bounds_with(&mut self, mut on_remove: impl FnMut(usize)) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.bullets.len() {
            if self.bounds.contains(self.bullets[i].pos) {
                i += 1;
            } else {
                // Re-check the same index: the next bullet has shifted into it
                self.bullets.remove(i);
                on_remove(i);
                removed += 1;
            }
        }
        removed
    }

    pub fn retire_out_of_bounds(&mut self) -> usize {
        self.retire_out_of_bounds_with(|_| {})
    }

    /// Zero the clock and re-arm bullets
    pub fn reset(&mut self) {
        self.frame_counter = 0;
        self.fired_once = false;
        for bullet in &mut self.bullets {
            bullet.reset();
        }
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    /// Grow the retirement rectangle by `factor` play-fields on every side
    pub fn expand_bounds(&mut self, factor: f32) {
        self.bounds.expand(factor);
    }

    // --- Factories: position plus polar velocity ---

    fn push(&mut self, bullet: Bullet) -> &mut Bullet {
        self.bullets.push(bullet);
        let last = self.bullets.len() - 1;
        &mut self.bullets[last]
    }

    pub fn add_circle(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Circle { radius }, pos, speed, heading, color))
    }

    pub fn add_rice(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Rice { radius }, pos, speed, heading, color))
    }

    pub fn add_dot(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Dot { radius }, pos, speed, heading, color))
    }

    pub fn add_talisman(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Talisman { radius }, pos, speed, heading, color))
    }

    pub fn add_bubble(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Bubble { radius }, pos, speed, heading, color))
    }

    pub fn add_arrowhead(&mut self, pos: Vec2, speed: f32, heading: f32, color: Color, radius: f32) -> &mut Bullet {
        self.push(Bullet::new(Shape::Arrowhead { radius }, pos, speed, heading, color))
    }

    /// Add a stationary beam anchored at `pos`
    #[allow(clippy::too_many_arguments)]
    pub fn add_laser(
        &mut self,
        pos: Vec2,
        heading: f32,
        max_width: f32,
        growth_speed: f32,
        activation_delay: f32,
        active_duration: f32,
        color: Color,
    ) -> &mut Bullet {
        let laser = Laser::new(max_width, growth_speed, activation_delay, active_duration);
        let color = Color { a: LASER_ALPHA, ..color };
        self.push(Bullet::new(Shape::Laser(laser), pos, 0.0, heading, color))
    }

    /// Spawners always go to the front of the bullet vector
    pub fn add_spawner(
        &mut self,
        pos: Vec2,
        speed: f32,
        heading: f32,
        visible: bool,
        color: Color,
        radius: f32,
    ) -> &mut Bullet {
        let spawner = Bullet::new(Shape::Spawner { radius, visible }, pos, speed, heading, color);
        self.bullets.insert(0, spawner);
        &mut self.bullets[0]
    }
}

/// A scripted emission algorithm.
///
/// Implementors override `emit` (and usually `advance`); the remaining
/// methods have base behavior operating on [`PatternCore`].
pub trait Pattern {
    /// Short identifier used for host menus and logs
    fn name(&self) -> &'static str;

    fn core(&self) -> &PatternCore;

    fn core_mut(&mut self) -> &mut PatternCore;

    /// Emission algorithm, gated by [`PatternCore::is_shot_due`]. The base never emits.
    fn emit(&mut self, _rng: &mut dyn RngCore) {}

    /// Per-frame kinematics. The base moves every bullet once.
    fn advance(&mut self) {
        self.core_mut().advance_bullets();
    }

    fn retire_out_of_bounds(&mut self) -> usize {
        self.core_mut().retire_out_of_bounds()
    }

    fn reset(&mut self, _rng: &mut dyn RngCore) {
        self.core_mut().reset();
    }

    fn clear(&mut self) {
        self.core_mut().clear();
    }

    /// Wave bookkeeping, for wave-indexed patterns
    fn waves(&self) -> Option<&WaveTracker> {
        None
    }

    fn bullets(&self) -> &[Bullet] {
        &self.core().bullets
    }

    fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.core_mut().bullets
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn set_active(&mut self, active: bool) {
        self.core_mut().set_active(active);
    }

    fn frame_counter(&self) -> u32 {
        self.core().frame_counter
    }

    fn increment_frame(&mut self) {
        self.core_mut().increment_frame();
    }
}

/// Retirement sweep that keeps wave sizes in step with the bullet vector
pub fn retire_tracked(core: &mut PatternCore, waves: &mut WaveTracker) -> usize {
    let removed = core.retire_out_of_bounds_with(|index| waves.on_removed(index));
    if removed > 0 {
        waves.check(core.bullets.len());
    }
    removed
}

/// Close a wave on the tracker, then check it against the bullet vector
pub fn close_wave(core: &PatternCore, waves: &mut WaveTracker, explicit_size: Option<usize>) -> bool {
    waves.start_wave(explicit_size);
    waves.check(core.bullets.len())
}

/// Record `size` bullets just inserted at the front, then check the tracker
pub fn prepend_tracked(core: &PatternCore, waves: &mut WaveTracker, size: usize) -> bool {
    waves.prepend_wave(size);
    waves.check(core.bullets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    /// One structural change to a tracked bullet vector
    #[derive(Debug, Clone)]
    enum WaveOp {
        Push(f32, f32),
        Close,
        Batch(Vec<(f32, f32)>),
        Prepend(Vec<(f32, f32)>),
        Retire,
    }

    fn wave_op() -> impl Strategy<Value = WaveOp> {
        let coord = -800.0f32..1800.0;
        prop_oneof![
            4 => (coord.clone(), coord.clone()).prop_map(|(x, y)| WaveOp::Push(x, y)),
            2 => Just(WaveOp::Close),
            1 => prop::collection::vec((coord.clone(), coord.clone()), 0..6).prop_map(WaveOp::Batch),
            1 => prop::collection::vec((coord.clone(), coord), 0..6).prop_map(WaveOp::Prepend),
            2 => Just(WaveOp::Retire),
        ]
    }

    /// Emits one dot per due shot and counts emissions
    struct Counting {
        core: PatternCore,
        shots: Vec<u32>,
    }

    impl Pattern for Counting {
        fn name(&self) -> &'static str {
            "counting"
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
            self.shots.push(self.core.frame_counter);
            let source = self.core.source;
            self.core.add_dot(source, 0.0, 0.0, Color::WHITE, 4.0);
        }
    }

    fn run(pattern: &mut dyn Pattern, ticks: u32) {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..ticks {
            pattern.retire_out_of_bounds();
            pattern.emit(&mut rng);
            pattern.increment_frame();
            pattern.advance();
        }
    }

    #[test]
    fn test_cadence_on_multiples_only() {
        let mut p = Counting {
            core: PatternCore::new(1, 7.0, 0.0, Vec2::new(300.0, 300.0)),
            shots: Vec::new(),
        };
        // round(60 / 7) = 9
        assert_eq!(p.core.frames_per_shot(), Some(9));
        run(&mut p, 100);
        let expected: Vec<u32> = (0..100).filter(|t| t % 9 == 0).collect();
        assert_eq!(p.shots, expected);
    }

    #[test]
    fn test_shots_per_second_clamped_to_frame_rate() {
        let core = PatternCore::new(1, 500.0, 0.0, Vec2::ZERO);
        assert_eq!(core.shots_per_second(), SIM_FPS);
        assert_eq!(core.frames_per_shot(), Some(1));
    }

    #[test]
    fn test_zero_frequency_fires_once() {
        let mut p = Counting {
            core: PatternCore::new(1, 0.0, 0.0, Vec2::new(300.0, 300.0)),
            shots: Vec::new(),
        };
        run(&mut p, 30);
        assert_eq!(p.shots, vec![0]);
        assert!(!p.is_active());
        assert!(!p.core.is_shot_due());
    }

    #[test]
    fn test_inactive_pattern_is_frozen() {
        let mut core = PatternCore::new(1, 1.0, 0.0, Vec2::ZERO);
        core.add_circle(Vec2::new(100.0, 100.0), 2.0, 0.0, Color::RED, 4.0);
        core.set_active(false);
        core.increment_frame();
        core.advance_bullets();
        assert_eq!(core.frame_counter, 0);
        assert_eq!(core.bullets[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_retirement_preserves_order_of_adjacent_survivors() {
        let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
        let inside = Vec2::new(300.0, 300.0);
        let outside = Vec2::new(-5000.0, 0.0);
        for (i, pos) in [outside, outside, inside, outside, inside].into_iter().enumerate() {
            core.add_dot(pos, 0.0, i as f32, Color::WHITE, 4.0);
        }
        let mut removed_at = Vec::new();
        let removed = core.retire_out_of_bounds_with(|i| removed_at.push(i));
        assert_eq!(removed, 3);
        assert_eq!(removed_at, vec![0, 0, 1]);
        let headings: Vec<f32> = core.bullets.iter().map(|b| b.heading()).collect();
        assert_eq!(headings, vec![2.0, 4.0]);
    }

    #[test]
    fn test_spawner_is_prepended() {
        let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
        core.add_circle(Vec2::ZERO, 0.0, 0.0, Color::RED, 4.0);
        core.add_spawner(Vec2::ONE, 0.0, 0.0, false, Color::SEETHROUGH, 4.0);
        assert!(matches!(core.bullets[0].shape, Shape::Spawner { .. }));
        assert_eq!(core.bullets.len(), 2);
    }

    #[test]
    fn test_reset_rearms_lasers_and_clock() {
        let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
        core.add_laser(Vec2::new(400.0, 200.0), 0.0, 10.0, 20.0, 0.25, 99.0, Color::BLUE);
        for _ in 0..40 {
            core.increment_frame();
            core.advance_bullets();
        }
        core.reset();
        assert_eq!(core.frame_counter, 0);
        match &core.bullets[0].shape {
            Shape::Laser(laser) => assert_eq!(laser.frame_counter, 0),
            other => panic!("unexpected shape {other:?}"),
        }
        assert_eq!(core.bullets[0].color.a, LASER_ALPHA);
    }

    proptest! {
        #[test]
        fn prop_retirement_keeps_only_inside(
            points in prop::collection::vec((-800.0f32..1800.0, -800.0f32..1800.0), 0..64)
        ) {
            let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
            for (x, y) in &points {
                core.add_dot(Vec2::new(*x, *y), 0.0, 0.0, Color::WHITE, 4.0);
            }
            let bounds = core.bounds;
            let inside = points.iter().filter(|(x, y)| bounds.contains(Vec2::new(*x, *y))).count();
            let removed = core.retire_out_of_bounds();
            prop_assert_eq!(core.bullets.len(), inside);
            prop_assert_eq!(removed, points.len() - inside);
            for bullet in &core.bullets {
                prop_assert!(bounds.contains(bullet.pos));
            }
        }

        #[test]
        fn prop_wave_sizes_match_after_retirement(
            batches in prop::collection::vec(
                prop::collection::vec((-800.0f32..1800.0, -800.0f32..1800.0), 1..12),
                1..10,
            )
        ) {
            let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
            let mut waves = WaveTracker::new();
            for batch in &batches {
                for (x, y) in batch {
                    core.add_dot(Vec2::new(*x, *y), 0.0, 0.0, Color::WHITE, 4.0);
                }
                waves.start_wave(Some(batch.len()));
                retire_tracked(&mut core, &mut waves);
                prop_assert_eq!(waves.total(), core.bullets.len());
                prop_assert!(waves.sizes().iter().all(|&s| s > 0));
                prop_assert_eq!(waves.sizes().len(), waves.ages().len());
            }
        }

        #[test]
        fn prop_mixed_wave_ops_keep_tracker_in_step(
            ops in prop::collection::vec(wave_op(), 1..80)
        ) {
            let mut core = PatternCore::new(0, 0.0, 0.0, Vec2::ZERO);
            let mut waves = WaveTracker::new();
            for op in ops {
                match op {
                    WaveOp::Push(x, y) => {
                        core.add_dot(Vec2::new(x, y), 0.0, 0.0, Color::WHITE, 4.0);
                        waves.note_bullet();
                    }
                    WaveOp::Close => {
                        close_wave(&core, &mut waves, None);
                    }
                    WaveOp::Batch(points) => {
                        // Open bullets close first so the batch stays contiguous
                        close_wave(&core, &mut waves, None);
                        for (x, y) in &points {
                            core.add_dot(Vec2::new(*x, *y), 0.0, 0.0, Color::WHITE, 4.0);
                        }
                        close_wave(&core, &mut waves, Some(points.len()));
                    }
                    WaveOp::Prepend(points) => {
                        for (x, y) in &points {
                            core.add_spawner(Vec2::new(*x, *y), 0.0, 0.0, true, Color::WHITE, 4.0);
                        }
                        prepend_tracked(&core, &mut waves, points.len());
                    }
                    WaveOp::Retire => {
                        retire_tracked(&mut core, &mut waves);
                    }
                }
                prop_assert_eq!(waves.total() + waves.pending(), core.bullets.len());
                prop_assert!(waves.sizes().iter().all(|&s| s > 0));
                prop_assert_eq!(waves.sizes().len(), waves.ages().len());
                prop_assert!(waves.check(core.bullets.len()));
            }
        }
    }
}
