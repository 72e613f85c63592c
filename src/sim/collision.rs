//! Collision response
//!
//! Sequential impulses: every overlapping shape pair found in a step is
//! resolved on its own, in order, against the velocities left by the
//! previous one. The agent has infinite mass and never takes an impulse.
//!
//! The contact normal runs from the *moving* body's center to the contact
//! point (`contact - b.pos`). That convention is asymmetric between agent
//! and item-item contacts and gameplay is tuned around it.

use glam::Vec2;

use super::geometry::Contact;
use super::vector::VectorOps;
use crate::consts::RESTITUTION;

/// Velocity change for body `b` hitting `a` at `contact`, or `None` when
/// the pair is already separating along the normal.
///
/// The returned vector is the relative velocity `b.vel - a.vel` projected on
/// the normal and scaled by [`RESTITUTION`].
pub fn collision_impulse(
    a_vel: Vec2,
    b_pos: Vec2,
    b_vel: Vec2,
    contact: Vec2,
) -> Option<Vec2> {
    let mut relative = b_vel;
    relative.subtract(a_vel);

    let mut normal = contact;
    normal.subtract(b_pos);

    // Only bodies closing along the normal are pushed; this also rules out a
    // zero normal before we project onto it
    if normal.dot(relative) <= 0.0 {
        return None;
    }

    let mut impulse = relative;
    impulse.set_projection_onto(normal).scale_by(RESTITUTION);
    Some(impulse)
}

/// Resolve an item hitting the immovable agent. Returns true if an impulse
/// was applied.
pub fn resolve_agent_contact(
    agent_vel: Vec2,
    item_pos: Vec2,
    item_vel: &mut Vec2,
    contact: &Contact,
) -> bool {
    if !contact.hit {
        return false;
    }
    match collision_impulse(agent_vel, item_pos, *item_vel, contact.point) {
        Some(impulse) => {
            item_vel.subtract(impulse);
            true
        }
        None => false,
    }
}

/// Resolve two items. The impulse is added to `a` and taken from `b`.
pub fn resolve_item_contact(
    a_vel: &mut Vec2,
    b_pos: Vec2,
    b_vel: &mut Vec2,
    contact: &Contact,
) -> bool {
    if !contact.hit {
        return false;
    }
    match collision_impulse(*a_vel, b_pos, *b_vel, contact.point) {
        Some(impulse) => {
            a_vel.add_vec(impulse);
            b_vel.subtract(impulse);
            true
        }
        None => false,
    }
}
