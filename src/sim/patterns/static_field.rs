//! Static test field: one projectile of every kind, never emits

use glam::Vec2;

use crate::Color;
use crate::consts::*;
use crate::sim::pattern::{Pattern, PatternCore, palette};

/// Stationary showcase of every projectile kind, roster slot 0.
///
/// Fires nothing; the manager never clears it on deactivation.
#[derive(Debug, Clone)]
pub struct StaticField {
    core: PatternCore,
}

impl StaticField {
    pub fn new() -> Self {
        let mut core = PatternCore::new(0, 0.0, 0.0, SCREEN_POS);
        core.add_circle(Vec2::new(350.0, 400.0), 0.0, 0.0, palette::CIRCLE, CIRCLE_RADIUS);
        core.add_rice(Vec2::new(400.0, 400.0), 0.0, 90.0, palette::RICE, RICE_RADIUS);
        core.add_dot(Vec2::new(450.0, 400.0), 0.0, 0.0, palette::DOT, DOT_RADIUS);
        core.add_talisman(Vec2::new(500.0, 400.0), 0.0, 90.0, palette::TALISMAN, TALISMAN_RADIUS);
        core.add_bubble(Vec2::new(550.0, 400.0), 0.0, 0.0, palette::BUBBLE, BUBBLE_RADIUS);
        core.add_laser(Vec2::new(400.0, 200.0), 0.0, 10.0, 20.0, 0.25, 99.0, palette::LASER);
        core.add_arrowhead(Vec2::new(400.0, 500.0), 0.0, 90.0, Color::ORANGE, 10.0);
        core.add_spawner(Vec2::new(300.0, 400.0), 0.0, 0.0, true, palette::SPAWNER, SPAWNER_RADIUS);
        Self { core }
    }
}

impl Default for StaticField {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for StaticField {
    fn name(&self) -> &'static str {
        "static"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }
}
