//! Fixed timestep simulation tick
//!
//! One call to `advance` moves the world forward by `settings.dt`:
//! integrate, collide (nodes, then walls, then actor pairs), advance
//! timers, and re-aim pursuers for the next tick.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::{actor_node_contact, resolve_actor_actor, resolve_actor_wall};
use super::pursuit::update_pursuers;
use super::state::{Actor, ActorId, ArenaEvent, Controls, Role, RoleKind, World};
use super::sweep::{ActorRef, find_candidates};
use crate::settings::{ArenaSettings, StunPolicy};

/// Latest control state per actor, buffered by the host between ticks
pub type TickInput = BTreeMap<ActorId, Controls>;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<ArenaEvent>,
}

impl TickReport {
    /// Whether anything worth telling players happened
    pub fn any(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Advance the world by one fixed timestep
pub fn advance(world: &mut World, input: &TickInput, settings: &ArenaSettings) -> TickReport {
    let mut report = TickReport::default();

    world.apply_pending_removals();
    apply_input(world, input);

    integrate_actors(world, settings);
    collide(world, settings, &mut report);
    advance_timers(world, settings, &mut report);
    update_pursuers(world, settings);

    world.tick += 1;
    report
}

fn apply_input(world: &mut World, input: &TickInput) {
    for (&id, &controls) in input {
        match world.player_mut(id) {
            Some(player) => player.controls = controls,
            None => log::warn!("Ignoring input for unknown actor {}", id.0),
        }
    }
}

/// Drag, then thrust, then position
fn integrate(actor: &mut Actor, settings: &ArenaSettings) {
    let dt = settings.dt;
    actor.vel -= actor.vel * settings.drag * dt;
    actor.vel += actor.force * settings.move_power * dt;
    actor.pos += actor.vel * dt;
}

fn integrate_actors(world: &mut World, settings: &ArenaSettings) {
    for player in &mut world.players {
        player.force = player.controls.force();
        integrate(player, settings);
    }
    for pursuer in &mut world.pursuers {
        let stunned = pursuer
            .stun()
            .is_some_and(|stun| settings.stun.is_stunned(stun));
        if !stunned {
            integrate(pursuer, settings);
        }
    }
}

fn collide(world: &mut World, settings: &ArenaSettings, report: &mut TickReport) {
    let pairs = find_candidates(world, settings.sweep_padding);

    for &(pi, ni) in &pairs.player_node {
        touch_node(world, pi, ni, report);
    }

    for &(actor, wi) in &pairs.actor_wall {
        let wall = &world.walls[wi];
        let actor = match actor {
            ActorRef::Player(i) => &mut world.players[i],
            ActorRef::Pursuer(i) => &mut world.pursuers[i],
        };
        resolve_actor_wall(actor, wall, settings);
    }

    for &(a, b) in &pairs.actor_actor {
        let Some((a, b)) = actor_pair_mut(&mut world.players, &mut world.pursuers, a, b) else {
            continue;
        };
        if resolve_actor_actor(a, b, settings.separation_scale) {
            match (a.kind(), b.kind()) {
                (RoleKind::Player, RoleKind::Pursuer) => strike(a, b, &settings.stun, report),
                (RoleKind::Pursuer, RoleKind::Player) => strike(b, a, &settings.stun, report),
                _ => {}
            }
        }
    }
}

/// Player-node contact: overwrite, then finalize a neutral capture
fn touch_node(world: &mut World, pi: usize, ni: usize, report: &mut TickReport) {
    let player = &mut world.players[pi];
    let node = &mut world.nodes[ni];
    let Some(previous) = actor_node_contact(player, node) else {
        return;
    };
    if previous == node.team {
        return;
    }

    if previous.is_neutral() {
        player.reset_charge();
        node.fill = 1.0;
        log::info!(
            "Player {} captured node {} for team {:?}",
            player.id.0,
            node.id,
            node.team
        );
        report.events.push(ArenaEvent::NodeCaptured {
            node: node.id,
            player: player.id,
            team: node.team,
        });
    } else {
        log::info!(
            "Player {} converted node {} from {:?} to {:?}",
            player.id.0,
            node.id,
            previous,
            node.team
        );
        report.events.push(ArenaEvent::NodeConverted {
            node: node.id,
            player: player.id,
            from: previous,
            to: node.team,
        });
    }
}

/// Player touched a pursuer; only a live pursuer reacts
fn strike(player: &mut Actor, pursuer: &mut Actor, policy: &StunPolicy, report: &mut TickReport) {
    let Role::Pursuer { stun, .. } = &mut pursuer.role else {
        return;
    };
    if policy.is_stunned(*stun) {
        return;
    }

    *stun = policy.on_contact();
    player.reset_charge();

    let event = match policy {
        StunPolicy::Recharge { .. } => ArenaEvent::PursuerStruck {
            pursuer: pursuer.id,
            player: player.id,
        },
        StunPolicy::Countdown { .. } => ArenaEvent::PursuerFrozen {
            pursuer: pursuer.id,
            player: player.id,
        },
    };
    log::debug!("{:?}", event);
    report.events.push(event);
}

fn advance_timers(world: &mut World, settings: &ArenaSettings, report: &mut TickReport) {
    let dt = settings.dt;
    for player in &mut world.players {
        if let Role::Player { charge } = &mut player.role {
            let was_full = *charge >= 1.0;
            *charge = (*charge + settings.charge_rate * dt).min(1.0);
            if !was_full && *charge >= 1.0 {
                report.events.push(ArenaEvent::ChargeReady { player: player.id });
            }
        }
    }
    for pursuer in &mut world.pursuers {
        if let Role::Pursuer { stun, .. } = &mut pursuer.role {
            // A stunned pursuer keeps no momentum from contacts this tick
            if settings.stun.is_stunned(*stun) {
                pursuer.vel = Vec2::ZERO;
            }
            *stun = settings.stun.advance(*stun, dt);
        }
    }
}

/// Two distinct mutable actors from the role collections
fn actor_pair_mut<'a>(
    players: &'a mut [Actor],
    pursuers: &'a mut [Actor],
    a: ActorRef,
    b: ActorRef,
) -> Option<(&'a mut Actor, &'a mut Actor)> {
    match (a, b) {
        (ActorRef::Player(i), ActorRef::Player(j)) => two_mut(players, i, j),
        (ActorRef::Pursuer(i), ActorRef::Pursuer(j)) => two_mut(pursuers, i, j),
        (ActorRef::Player(i), ActorRef::Pursuer(j)) => Some((&mut players[i], &mut pursuers[j])),
        (ActorRef::Pursuer(i), ActorRef::Player(j)) => Some((&mut pursuers[i], &mut players[j])),
    }
}

fn two_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j {
        return None;
    }
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Ruleset;
    use crate::sim::state::{Node, Team, Wall};
    use proptest::prelude::*;

    fn right() -> Controls {
        Controls {
            right: true,
            ..Default::default()
        }
    }

    fn lone_player(settings: &ArenaSettings) -> World {
        let mut world = World::default();
        world.spawn_player(ActorId(1), Team::A, Vec2::ZERO, settings.actor_radius);
        world
    }

    #[test]
    fn test_input_drives_player() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        let input = TickInput::from([(ActorId(1), right())]);

        advance(&mut world, &input, &settings);
        let player = &world.players[0];
        // v = 60 * 0.01, x = v * 0.01
        assert!((player.vel.x - 0.6).abs() < 1e-5);
        assert!((player.pos.x - 0.006).abs() < 1e-6);
        assert_eq!(player.force, Vec2::new(1.0, 0.0));
        assert_eq!(world.tick, 1);

        // Controls stay buffered until replaced
        advance(&mut world, &TickInput::new(), &settings);
        assert!(world.players[0].vel.x > 0.6);
    }

    #[test]
    fn test_drag_slows_coasting_player() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.players[0].vel = Vec2::new(10.0, 0.0);

        advance(&mut world, &TickInput::new(), &settings);
        assert!((world.players[0].vel.x - 9.95).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_input_ignored() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        let input = TickInput::from([(ActorId(99), right())]);
        let report = advance(&mut world, &input, &settings);
        assert!(!report.any());
        assert_eq!(world.players[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_charge_fills_then_reports_once() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        let mut ready = 0;
        let mut last = 0.0;
        for _ in 0..600 {
            let report = advance(&mut world, &TickInput::new(), &settings);
            ready += report
                .events
                .iter()
                .filter(|e| matches!(e, ArenaEvent::ChargeReady { .. }))
                .count();
            let charge = world.players[0].charge().unwrap();
            assert!(charge >= last && charge <= 1.0);
            last = charge;
        }
        assert_eq!(ready, 1);
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_neutral_capture_resets_charge() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.nodes.push(Node::new(0, Vec2::new(5.0, 0.0), 9.0));
        world.nodes[0].fill = 0.3;
        world.players[0].role = Role::Player { charge: 1.0 };

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.nodes[0].team, Team::A);
        assert_eq!(world.nodes[0].fill, 1.0);
        assert!(matches!(
            report.events[0],
            ArenaEvent::NodeCaptured { node: 0, team: Team::A, .. }
        ));
        // Charge restarted from zero this tick
        assert!(world.players[0].charge().unwrap() < 0.01);
    }

    #[test]
    fn test_enemy_node_converted_without_reset() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        let mut node = Node::new(0, Vec2::new(5.0, 0.0), 9.0);
        node.team = Team::B;
        world.nodes.push(node);
        world.players[0].role = Role::Player { charge: 1.0 };

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.nodes[0].team, Team::A);
        assert_eq!(world.players[0].charge(), Some(1.0));
        assert!(matches!(
            report.events[0],
            ArenaEvent::NodeConverted { from: Team::B, to: Team::A, .. }
        ));
    }

    #[test]
    fn test_capturing_own_node_is_noop() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        let mut node = Node::new(0, Vec2::new(5.0, 0.0), 9.0);
        node.team = Team::A;
        node.fill = 0.4;
        world.nodes.push(node);
        world.players[0].role = Role::Player { charge: 1.0 };

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.nodes[0].team, Team::A);
        assert_eq!(world.nodes[0].fill, 0.4);
        assert_eq!(world.players[0].charge(), Some(1.0));
        assert!(!report.any());
    }

    #[test]
    fn test_uncharged_player_cannot_capture() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.nodes.push(Node::new(0, Vec2::new(5.0, 0.0), 9.0));
        world.players[0].role = Role::Player { charge: 0.5 };

        advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.nodes[0].team, Team::Neutral);
    }

    #[test]
    fn test_live_pursuer_struck_in_capture_rules() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.players[0].role = Role::Player { charge: 0.8 };
        world
            .pursuers
            .push(Actor::pursuer(ActorId(2), Vec2::new(1.5, 0.0), 1.0, 1.5));

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert!(report.events.contains(&ArenaEvent::PursuerStruck {
            pursuer: ActorId(2),
            player: ActorId(1),
        }));
        // Struck to zero, then recovered one step
        let stun = world.pursuers[0].stun().unwrap();
        assert!((stun - 0.5 * SIM_DT).abs() < 1e-6);
        assert!(world.players[0].charge().unwrap() < 0.01);
    }

    #[test]
    fn test_stunned_pursuer_is_harmless_and_still() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.players[0].role = Role::Player { charge: 0.8 };
        let mut pursuer = Actor::pursuer(ActorId(2), Vec2::new(30.0, 0.0), 1.0, 0.0);
        pursuer.force = Vec2::new(-1.0, 0.0);
        world.pursuers.push(pursuer);

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert!(!report.any());
        assert_eq!(world.pursuers[0].pos, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_stunned_pursuer_keeps_no_momentum_from_contact() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.players[0].vel = Vec2::new(5.0, 0.0);
        let mut pursuer = Actor::pursuer(ActorId(2), Vec2::new(1.5, 0.0), 1.0, 0.0);
        pursuer.vel = Vec2::new(0.0, 3.0);
        world.pursuers.push(pursuer);

        advance(&mut world, &TickInput::new(), &settings);
        // Pushed out of the overlap but given no velocity
        assert!(world.pursuers[0].pos.x > 1.5);
        assert_eq!(world.pursuers[0].vel, Vec2::ZERO);

        // Once live again it does not lurch off with a stored velocity
        world.pursuers[0].role = Role::Pursuer {
            stun: 1.5,
            target: None,
        };
        world.pursuers[0].force = Vec2::ZERO;
        let before = world.pursuers[0].pos;
        world.players.clear();
        advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.pursuers[0].pos, before);
    }

    #[test]
    fn test_coincident_players_separate() {
        let settings = ArenaSettings::default();
        let mut world = World::default();
        world.spawn_player(ActorId(1), Team::A, Vec2::ZERO, settings.actor_radius);
        world.spawn_player(ActorId(2), Team::B, Vec2::ZERO, settings.actor_radius);

        for _ in 0..10 {
            advance(&mut world, &TickInput::new(), &settings);
            let gap = world.players[0].pos.distance(world.players[1].pos);
            assert!(gap >= 2.0 * settings.actor_radius - 1e-4);
        }
    }

    #[test]
    fn test_inactive_player_stops_interacting() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.nodes.push(Node::new(0, Vec2::new(5.0, 0.0), 9.0));
        world.players[0].role = Role::Player { charge: 1.0 };
        world
            .pursuers
            .push(Actor::pursuer(ActorId(2), Vec2::new(1.5, 0.0), 1.0, 1.5));

        world.set_active(ActorId(1), false);
        let report = advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.nodes[0].team, Team::Neutral);
        assert_eq!(world.pursuers[0].stun(), Some(1.5 + 0.5 * SIM_DT));
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, ArenaEvent::PursuerStruck { .. }))
        );
    }

    #[test]
    fn test_chase_rules_freeze_pursuer() {
        let settings = ArenaSettings::from_ruleset(Ruleset::Chase);
        let mut world = lone_player(&settings);
        world
            .pursuers
            .push(Actor::pursuer(ActorId(2), Vec2::new(1.5, 0.0), 1.0, 0.0));

        let report = advance(&mut world, &TickInput::new(), &settings);
        assert!(report.events.contains(&ArenaEvent::PursuerFrozen {
            pursuer: ActorId(2),
            player: ActorId(1),
        }));
        assert!(settings.stun.is_stunned(world.pursuers[0].stun().unwrap()));
    }

    #[test]
    fn test_wall_blocks_player() {
        let settings = ArenaSettings::default();
        let mut world = lone_player(&settings);
        world.walls.push(Wall::new(0, Vec2::new(3.0, 0.0), 2.0, 20.0));
        let input = TickInput::from([(ActorId(1), right())]);

        for _ in 0..500 {
            advance(&mut world, &input, &settings);
            // Actor never ends a tick deeper than one step of motion
            assert!(world.players[0].pos.x < 1.0 + 0.05);
        }
    }

    #[test]
    fn test_disconnect_applied_at_tick_start() {
        let settings = ArenaSettings::default();
        let mut world = World::default();
        world.connect(ActorId(1), &settings);
        world.connect(ActorId(2), &settings);
        world.disconnect(ActorId(1));
        assert_eq!(world.players.len(), 2);

        advance(&mut world, &TickInput::new(), &settings);
        assert_eq!(world.players.len(), 1);
        assert_eq!(world.pursuers.len(), 1);
        let survivor = world.pursuer(ActorId(2)).unwrap();
        assert_eq!(survivor.target(), Some(ActorId(2)));
    }

    #[test]
    fn test_determinism() {
        let settings = ArenaSettings::default();
        let mut world1 = World::default();
        let mut world2 = World::default();
        for id in 1..=3 {
            world1.connect(ActorId(id), &settings);
            world2.connect(ActorId(id), &settings);
        }
        let input = TickInput::from([(ActorId(1), right())]);
        for _ in 0..300 {
            advance(&mut world1, &input, &settings);
            advance(&mut world2, &input, &settings);
        }
        for (a, b) in world1.pursuers.iter().zip(&world2.pursuers) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_two_mut() {
        let mut items = [1, 2, 3];
        let (a, b) = two_mut(&mut items, 2, 0).unwrap();
        assert_eq!((*a, *b), (3, 1));
        assert!(two_mut(&mut items, 1, 1).is_none());
    }

    proptest! {
        #[test]
        fn prop_charge_monotonic_without_contact(steps in 1usize..200, start in 0.0f32..1.0) {
            let settings = ArenaSettings::default();
            let mut world = lone_player(&settings);
            world.players[0].role = Role::Player { charge: start };
            let mut last = start;
            for _ in 0..steps {
                advance(&mut world, &TickInput::new(), &settings);
                let charge = world.players[0].charge().unwrap();
                prop_assert!(charge >= last);
                prop_assert!(charge <= 1.0);
                last = charge;
            }
        }
    }
}
