//! Pursuer steering
//!
//! Each tick a pursuer locks onto the nearest player, estimates where that
//! player is fleeing, and picks whichever of the eight compass directions
//! best matches the force needed to close in.

use glam::Vec2;

use super::state::{Actor, Role, World};
use super::vector::{COMPASS, direction, distance, normalize, project, reject};
use crate::settings::{ArenaSettings, Leash};

/// Index of the closest player; the first minimum wins ties
pub fn nearest_player(pos: Vec2, players: &[Actor]) -> Option<usize> {
    let mut min_dist = f32::INFINITY;
    let mut nearest = None;
    for (i, player) in players.iter().enumerate() {
        let dist = distance(pos, player.pos);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(i);
        }
    }
    nearest
}

/// Continuous steering force for `hunter` to intercept `prey`
pub fn desired_force(hunter: &Actor, prey: &Actor, settings: &ArenaSettings) -> Vec2 {
    let prey_dir = direction(hunter.pos, prey.pos);
    let along = project(prey.vel, prey_dir);
    let across = reject(prey.vel, prey_dir);

    // Only chase the radial component if the prey is running away
    let fleeing = normalize(along).dot(prey_dir) > 0.0;
    let flee_vel = if fleeing { across + along } else { across };

    let advance = settings.advance_base + settings.advance_gain * distance(hunter.pos, prey.pos);
    let target_vel = flee_vel + prey_dir * advance;

    let mut pursue = target_vel - hunter.vel;
    if settings.normalize_pursuit {
        pursue = normalize(pursue);
    }
    if fleeing {
        pursue += prey.force;
    }
    pursue
}

/// Compass direction with the largest positive alignment, if any
pub fn snap_to_compass(desired: Vec2) -> Option<Vec2> {
    let mut best_align = 0.0;
    let mut best = None;
    for dir in COMPASS {
        let align = dir.dot(desired);
        if align > best_align {
            best_align = align;
            best = Some(dir);
        }
    }
    best
}

/// Pull toward the origin once outside the leash box
pub fn centering_force(pos: Vec2, leash: &Leash) -> Option<Vec2> {
    if leash.contains(pos) {
        None
    } else {
        Some(normalize(-pos))
    }
}

/// Retarget every pursuer and set the force it integrates next tick
pub fn update_pursuers(world: &mut World, settings: &ArenaSettings) {
    let players = &world.players;
    for pursuer in &mut world.pursuers {
        let prey = nearest_player(pursuer.pos, players).map(|i| &players[i]);
        if let Role::Pursuer { target, .. } = &mut pursuer.role {
            *target = prey.map(|p| p.id);
        }

        if let Some(pull) = settings
            .leash
            .as_ref()
            .and_then(|leash| centering_force(pursuer.pos, leash))
        {
            pursuer.force = pull;
            continue;
        }

        // No prey or no aligned direction: keep the previous force
        if let Some(prey) = prey
            && let Some(dir) = snap_to_compass(desired_force(pursuer, prey, settings))
        {
            pursuer.force = dir;
        }
    }
}
