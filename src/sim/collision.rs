//! Narrow phase: exact overlap tests and responses
//!
//! Contact tests are pure and return the separating normal plus the
//! penetration depth. The `resolve_*` functions apply positional correction
//! and the velocity response to the actors involved.

use glam::Vec2;

use super::state::{Actor, Node, Team, Wall};
use super::vector::{distance, normalize, project};
use crate::settings::ArenaSettings;

/// Overlap between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit direction the first shape must move to separate
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

/// Circle vs axis-aligned rectangle, resolved along the shallower axis.
///
/// Zero depth counts as contact; a negative depth on either axis does not.
pub fn circle_rect_contact(pos: Vec2, radius: f32, wall: &Wall) -> Option<Contact> {
    let delta = pos - wall.pos;
    let half = wall.half_extents();
    let overlap_x = half.x + radius - delta.x.abs();
    let overlap_y = half.y + radius - delta.y.abs();

    if overlap_x.min(overlap_y) < 0.0 {
        return None;
    }

    if overlap_x < overlap_y {
        Some(Contact {
            normal: Vec2::new(delta.x.signum(), 0.0),
            penetration: overlap_x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, delta.y.signum()),
            penetration: overlap_y,
        })
    }
}

/// Circle vs circle; the normal points from `b` toward `a`.
///
/// Centers at exactly the sum of radii do not touch. Coincident centers
/// separate along +X so the pair never stays stuck.
pub fn circle_circle_contact(
    a_pos: Vec2,
    a_radius: f32,
    b_pos: Vec2,
    b_radius: f32,
) -> Option<Contact> {
    let dist = distance(a_pos, b_pos);
    let overlap = a_radius + b_radius - dist;
    if overlap <= 0.0 {
        return None;
    }
    let normal = if dist == 0.0 {
        Vec2::X
    } else {
        normalize(a_pos - b_pos)
    };
    Some(Contact {
        normal,
        penetration: overlap,
    })
}

/// Push an actor out of a wall and damp its velocity along the contact axis.
///
/// Returns whether the actor was touching the wall.
pub fn resolve_actor_wall(actor: &mut Actor, wall: &Wall, settings: &ArenaSettings) -> bool {
    let Some(contact) = circle_rect_contact(actor.pos, actor.radius, wall) else {
        return false;
    };

    actor.pos += contact.normal * contact.penetration * settings.wall_overshoot;
    if contact.normal.x != 0.0 {
        actor.vel.x = settings.wall_response.apply(actor.vel.x);
    } else {
        actor.vel.y = settings.wall_response.apply(actor.vel.y);
    }

    if settings.wall_resets_charge {
        actor.reset_charge();
    }

    log::trace!(
        "Actor {} hit wall {} (depth {:.3})",
        actor.id.0,
        wall.id,
        contact.penetration
    );
    true
}

/// Separate two overlapping actors and swap their normal velocities.
///
/// Both actors move by half of `overlap * separation_scale` in opposite
/// directions. Velocity components along the normal are exchanged while
/// the tangential components stay, as in an equal-mass elastic collision.
pub fn resolve_actor_actor(a: &mut Actor, b: &mut Actor, separation_scale: f32) -> bool {
    if a.same_entity(b) || !a.active || !b.active {
        return false;
    }
    let Some(contact) = circle_circle_contact(a.pos, a.radius, b.pos, b.radius) else {
        return false;
    };

    let push = contact.normal * (0.5 * contact.penetration * separation_scale);
    a.pos += push;
    b.pos -= push;

    let along_a = project(a.vel, contact.normal);
    let along_b = project(b.vel, contact.normal);
    a.vel = a.vel - along_a + along_b;
    b.vel = b.vel - along_b + along_a;

    log::trace!("Actors {} and {} collided", a.id.0, b.id.0);
    true
}

/// Touch test for an actor and a capture node.
///
/// A fully charged player overwrites the node's team. Returns the node's
/// team from before the touch, or `None` if they are not touching.
pub fn actor_node_contact(actor: &Actor, node: &mut Node) -> Option<Team> {
    if !actor.active {
        return None;
    }
    circle_circle_contact(actor.pos, actor.radius, node.pos, node.radius)?;

    let previous = node.team;
    if actor.is_charged() && node.team != actor.team {
        node.team = actor.team;
    }
    Some(previous)
}

/// Remaining overlap depth between an actor and a wall (0 when apart)
pub fn wall_penetration(actor: &Actor, wall: &Wall) -> f32 {
    circle_rect_contact(actor.pos, actor.radius, wall).map_or(0.0, |c| c.penetration)
}
