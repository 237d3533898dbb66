//! Collision tests between projectiles and the player hitbox
//!
//! Two primitives cover every projectile shape: circle-vs-circle for the
//! round hitboxes, and point-in-rotated-rectangle for beams.

use glam::Vec2;

use super::geometry::Hitbox;

/// Circle overlap: Euclidean distance <= sum of radii
#[inline]
pub fn circle_hits(center: Vec2, radius: f32, hitbox: &Hitbox) -> bool {
    center.distance(hitbox.center) <= radius + hitbox.radius
}

/// Transform `point` into the local frame of a rectangle anchored at `origin`
/// and rotated by `heading_degrees` (inverse rotation around the origin).
#[inline]
pub fn to_local_frame(point: Vec2, origin: Vec2, heading_degrees: f32) -> Vec2 {
    let (sin, cos) = (-heading_degrees).to_radians().sin_cos();
    let d = point - origin;
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Check whether `point` lies inside a rectangle that starts at `origin`,
/// extends `length` along `heading_degrees`, and is `width` thick, centered on
/// its axis.
///
/// Containment is half-open along both local axes.
pub fn point_in_beam_rect(
    point: Vec2,
    origin: Vec2,
    heading_degrees: f32,
    length: f32,
    width: f32,
) -> bool {
    if width <= 0.0 || length <= 0.0 {
        return false;
    }
    let local = to_local_frame(point, origin, heading_degrees);
    let half = width / 2.0;
    local.x >= 0.0 && local.x < length && local.y >= -half && local.y < half
}
