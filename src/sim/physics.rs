//! AABB physics: gravity, integration, overlap tests, penetration resolution
//!
//! Every physical actor in the game is an axis-aligned box. Collision
//! resolution always moves the mover, never the solid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Position/size/velocity shared by all physical actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Axis along which a collision was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Accelerate downward by gravity.
#[inline]
pub fn apply_gravity(body: &mut Body, dt: f32) {
    body.vel.y += GRAVITY * dt;
}

/// Geometric horizontal decay, applied only when grounded.
#[inline]
pub fn apply_friction(body: &mut Body) {
    body.vel.x *= FRICTION;
}

/// Geometric decay on both axes.
#[inline]
pub fn apply_air_drag(body: &mut Body) {
    body.vel *= AIR_DRAG;
}

/// Integrate position from velocity.
#[inline]
pub fn integrate(body: &mut Body, dt: f32) {
    body.pos += body.vel * dt;
}

/// Strict AABB overlap. Boxes that exactly touch along an edge do NOT
/// overlap (`<`, never `<=`), so resting contact never reads as collision.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Push `mover` out of `solid` along the axis of least penetration, zeroing
/// the velocity component on that axis. Returns the resolved axis, or `None`
/// if the boxes were not overlapping.
///
/// When both penetrations are equal the Y axis wins; the choice is
/// arbitrary but kept stable for determinism.
pub fn resolve_collision(mover: &mut Body, solid: &Body) -> Option<Axis> {
    if !overlaps(mover, solid) {
        return None;
    }

    let delta = mover.center() - solid.center();
    let overlap_x = (mover.size.x + solid.size.x) * 0.5 - delta.x.abs();
    let overlap_y = (mover.size.y + solid.size.y) * 0.5 - delta.y.abs();

    // Snap to the solid's edge so separation is exact, not epsilon-close
    if overlap_x < overlap_y {
        mover.pos.x = if delta.x >= 0.0 {
            solid.right()
        } else {
            solid.pos.x - mover.size.x
        };
        mover.vel.x = 0.0;
        Some(Axis::X)
    } else {
        mover.pos.y = if delta.y >= 0.0 {
            solid.bottom()
        } else {
            solid.pos.y - mover.size.y
        };
        mover.vel.y = 0.0;
        Some(Axis::Y)
    }
}
