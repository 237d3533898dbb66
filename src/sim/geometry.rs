//! Axis-aligned rectangles and the player hitbox
//!
//! Rectangles use the play-field convention: `left`/`top` corner plus a size,
//! with a half-open `contains` test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle in screen space (y-down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The visible play-field
    pub const fn screen() -> Self {
        Self::new(SCREEN_LEFT, SCREEN_TOP, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Half-open containment: `left <= x < right`, `top <= y < bottom`
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Grow every side by `factor` times the play-field dimension.
    ///
    /// A factor of 1 triples the width and height of a play-field sized rectangle.
    pub fn expand(&mut self, factor: f32) {
        self.left -= SCREEN_WIDTH * factor;
        self.top -= SCREEN_HEIGHT * factor;
        self.width += SCREEN_WIDTH * 2.0 * factor;
        self.height += SCREEN_HEIGHT * 2.0 * factor;
    }

    pub fn expanded(mut self, factor: f32) -> Self {
        self.expand(factor);
        self
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::screen()
    }
}

/// Circular collision surface supplied by the host once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub center: Vec2,
    pub radius: f32,
}

impl Hitbox {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            center: Vec2::new(SCREEN_LEFT + SCREEN_WIDTH * 0.5, SCREEN_TOP + SCREEN_HEIGHT * 0.8),
            radius: PLAYER_HITBOX_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.99, 9.99)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.0)));
        assert!(!r.contains(Vec2::new(-0.01, 5.0)));
    }

    #[test]
    fn test_expand_by_one_triples_screen() {
        let r = Rect::screen().expanded(1.0);
        assert!((r.width - SCREEN_WIDTH * 3.0).abs() < 1e-3);
        assert!((r.height - SCREEN_HEIGHT * 3.0).abs() < 1e-3);
        assert!((r.left - (SCREEN_LEFT - SCREEN_WIDTH)).abs() < 1e-3);
        assert!((r.top - (SCREEN_TOP - SCREEN_HEIGHT)).abs() < 1e-3);
    }
}
