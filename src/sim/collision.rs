//! Swept collision between the ball and axis-aligned rectangles
//!
//! The tricky part of the game: a fast ball must never tunnel through a thin
//! paddle or block between two samples. The circle is reduced to a point by
//! inflating the target rectangle by the ball radius, then the point's path
//! over one sub-step is clipped against both axis slabs.

use glam::Vec2;

use super::rect::Rect;

/// What the ball is being swept against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Always deflects the ball upward
    Paddle,
    /// Normal picked from the face the ball reaches first
    Block,
}

/// Result of a swept collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred during the sweep
    pub hit: bool,
    /// Axis-aligned unit normal of the face that was hit
    pub normal: Vec2,
    /// Fraction of the displacement travelled before contact, in [0, 1)
    pub time: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            time: 0.0,
        }
    }
}

/// Sweep a circle of `radius` from `start` along `displacement` against `target`
///
/// Zero displacement, degenerate rectangles and non-finite input all report a
/// miss rather than a contact.
pub fn sweep_circle_rect(
    start: Vec2,
    displacement: Vec2,
    radius: f32,
    target: &Rect,
    kind: TargetKind,
) -> CollisionResult {
    if !target.is_valid()
        || !start.is_finite()
        || !displacement.is_finite()
        || !radius.is_finite()
        || displacement == Vec2::ZERO
    {
        return CollisionResult::miss();
    }

    let expanded = target.expanded(radius);
    let slabs = [
        (start.x, displacement.x, expanded.left(), expanded.right()),
        (start.y, displacement.y, expanded.top(), expanded.bottom()),
    ];

    let mut t_entry: f32 = 0.0;
    let mut t_exit: f32 = 1.0;

    for (origin, delta, slab_min, slab_max) in slabs {
        if delta == 0.0 {
            // Moving parallel to this slab: must already be inside it
            if origin < slab_min || origin > slab_max {
                return CollisionResult::miss();
            }
            continue;
        }

        let t0 = (slab_min - origin) / delta;
        let t1 = (slab_max - origin) / delta;

        t_entry = t_entry.max(t0.min(t1));
        t_exit = t_exit.min(t0.max(t1));

        if t_entry > t_exit {
            return CollisionResult::miss();
        }
    }

    if !(0.0..1.0).contains(&t_entry) {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        normal: contact_normal(start + displacement * t_entry, target, kind),
        time: t_entry,
    }
}

/// Face normal at the predicted contact point
///
/// The face with the smallest signed distance from `contact` wins; ties go to
/// left, then right, then top, then bottom.
pub fn contact_normal(contact: Vec2, target: &Rect, kind: TargetKind) -> Vec2 {
    if kind == TargetKind::Paddle {
        return Vec2::NEG_Y;
    }

    let faces = [
        (contact.x - target.left(), Vec2::NEG_X),
        (target.right() - contact.x, Vec2::X),
        (contact.y - target.top(), Vec2::NEG_Y),
        (target.bottom() - contact.y, Vec2::Y),
    ];

    let mut best = faces[0];
    for face in &faces[1..] {
        // Strict comparison keeps the earlier face on ties
        if face.0 < best.0 {
            best = *face;
        }
    }
    best.1
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect, then rescale so the outgoing speed equals the incoming speed
pub fn reflect_preserving_speed(velocity: Vec2, normal: Vec2) -> Vec2 {
    let speed_before = velocity.length();
    let reflected = reflect_velocity(velocity, normal);
    let speed_after = reflected.length();
    if speed_after <= f32::EPSILON {
        return reflected;
    }
    reflected * (speed_before / speed_after)
}
