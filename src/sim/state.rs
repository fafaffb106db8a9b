//! World state and core simulation types
//!
//! Everything one tick reads and mutates lives in `World`. The host keeps
//! its own session-to-`ActorId` mapping and hands the world to `advance`
//! by reference.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::ArenaSettings;

/// Stable actor identifier assigned by the session layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Team ownership for actors and nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Neutral,
    A,
    B,
    Hostile,
}

impl Team {
    /// Wire code used in snapshots (0 = neutral)
    pub fn code(&self) -> u8 {
        match self {
            Team::Neutral => 0,
            Team::A => 1,
            Team::B => 2,
            Team::Hostile => 3,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Team::Neutral
    }
}

/// Fieldless role discriminant, used for identity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    Player,
    Pursuer,
}

/// Role-specific actor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Role {
    /// Capture readiness in [0, 1]
    Player { charge: f32 },
    /// Pursuer with its stun timer and the player it chased last tick.
    /// `target` is recomputed every tick and never owns anything.
    Pursuer { stun: f32, target: Option<ActorId> },
}

/// Latest directional input buffered for an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Capture/select button
    pub select: bool,
}

impl Controls {
    /// Unit or zero thrust direction
    pub fn force(&self) -> Vec2 {
        crate::axis_force(self.up, self.down, self.left, self.right)
    }
}

/// A dynamic circular entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current thrust direction (unit or zero)
    pub force: Vec2,
    pub radius: f32,
    /// Inactive actors are skipped by the actor and node contact tests.
    /// Set by the host through `World::set_active`; `World::disconnect`
    /// clears it until the actor is removed.
    pub active: bool,
    pub controls: Controls,
    pub role: Role,
}

impl Actor {
    pub fn player(id: ActorId, team: Team, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            team,
            pos,
            vel: Vec2::ZERO,
            force: Vec2::ZERO,
            radius,
            active: true,
            controls: Controls::default(),
            role: Role::Player { charge: 0.0 },
        }
    }

    pub fn pursuer(id: ActorId, pos: Vec2, radius: f32, stun: f32) -> Self {
        Self {
            id,
            team: Team::Hostile,
            pos,
            vel: Vec2::ZERO,
            force: Vec2::ZERO,
            radius,
            active: true,
            controls: Controls::default(),
            role: Role::Pursuer { stun, target: None },
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self.role {
            Role::Player { .. } => RoleKind::Player,
            Role::Pursuer { .. } => RoleKind::Pursuer,
        }
    }

    /// Same entity iff both id and role match
    pub fn same_entity(&self, other: &Actor) -> bool {
        self.id == other.id && self.kind() == other.kind()
    }

    /// Player charge, `None` for pursuers
    pub fn charge(&self) -> Option<f32> {
        match self.role {
            Role::Player { charge } => Some(charge),
            Role::Pursuer { .. } => None,
        }
    }

    /// Whether a player has a full charge
    pub fn is_charged(&self) -> bool {
        self.charge().is_some_and(|c| c >= 1.0)
    }

    /// Drop a player's charge to zero; no-op for pursuers
    pub fn reset_charge(&mut self) {
        if let Role::Player { charge } = &mut self.role {
            *charge = 0.0;
        }
    }

    /// Pursuer stun timer, `None` for players
    pub fn stun(&self) -> Option<f32> {
        match self.role {
            Role::Pursuer { stun, .. } => Some(stun),
            Role::Player { .. } => None,
        }
    }

    /// Current pursuit target, `None` for players or idle pursuers
    pub fn target(&self) -> Option<ActorId> {
        match self.role {
            Role::Pursuer { target, .. } => target,
            Role::Player { .. } => None,
        }
    }
}

/// A static axis-aligned rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Wall {
    pub fn new(id: u32, pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            id,
            pos,
            width,
            height,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// A circular capture zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub team: Team,
    /// Visual fill progress (1 = full)
    pub fill: f32,
    /// Adjacent node ids, fixed at setup
    pub neighbors: Vec<u32>,
}

impl Node {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            team: Team::Neutral,
            fill: 1.0,
            neighbors: Vec::new(),
        }
    }
}

/// Something players should be told about after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// A fully charged player claimed a neutral node
    NodeCaptured { node: u32, player: ActorId, team: Team },
    /// A fully charged player flipped an enemy node
    NodeConverted { node: u32, player: ActorId, from: Team, to: Team },
    /// A player struck a live pursuer (recharge rules)
    PursuerStruck { pursuer: ActorId, player: ActorId },
    /// A pursuer froze on contact with a player (countdown rules)
    PursuerFrozen { pursuer: ActorId, player: ActorId },
    /// A player's charge became full this tick
    ChargeReady { player: ActorId },
}

/// Complete world snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Ticks advanced so far
    pub tick: u64,
    pub players: Vec<Actor>,
    pub pursuers: Vec<Actor>,
    pub walls: Vec<Wall>,
    pub nodes: Vec<Node>,
    /// Disconnects waiting for the next tick boundary
    #[serde(skip)]
    pending_removals: Vec<ActorId>,
}

impl World {
    pub fn new(walls: Vec<Wall>, nodes: Vec<Node>) -> Self {
        Self {
            walls,
            nodes,
            ..Default::default()
        }
    }

    /// Join a new session: a player on the smaller team plus its pursuer
    pub fn connect(&mut self, id: ActorId, settings: &ArenaSettings) -> Team {
        let (count_a, count_b) = self.team_counts();
        let team = if count_a > count_b { Team::B } else { Team::A };
        self.spawn_player(id, team, Vec2::ZERO, settings.actor_radius);
        self.spawn_pursuer(id, Vec2::new(0.0, 1.0), settings);
        log::info!("Actor {} connected on team {:?}", id.0, team);
        team
    }

    pub fn spawn_player(&mut self, id: ActorId, team: Team, pos: Vec2, radius: f32) {
        self.players.push(Actor::player(id, team, pos, radius));
    }

    pub fn spawn_pursuer(&mut self, id: ActorId, pos: Vec2, settings: &ArenaSettings) {
        self.pursuers.push(Actor::pursuer(
            id,
            pos,
            settings.actor_radius,
            settings.stun.initial(),
        ));
    }

    /// Queue removal of every actor with this id; applied at the next tick start.
    ///
    /// The actors go inactive right away so they stop touching anything
    /// while they wait for removal.
    pub fn disconnect(&mut self, id: ActorId) {
        log::info!("Actor {} disconnect queued", id.0);
        self.set_active(id, false);
        if !self.pending_removals.contains(&id) {
            self.pending_removals.push(id);
        }
    }

    /// Toggle contact participation for every actor with this id.
    ///
    /// Returns how many actors were updated.
    pub fn set_active(&mut self, id: ActorId, active: bool) -> usize {
        let mut updated = 0;
        for actor in self.players.iter_mut().chain(self.pursuers.iter_mut()) {
            if actor.id == id {
                actor.active = active;
                updated += 1;
            }
        }
        updated
    }

    /// Drop queued actors and clear pursuit targets that pointed at them
    pub fn apply_pending_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let removed = std::mem::take(&mut self.pending_removals);
        self.players.retain(|a| !removed.contains(&a.id));
        self.pursuers.retain(|a| !removed.contains(&a.id));
        for pursuer in &mut self.pursuers {
            if let Role::Pursuer { target, .. } = &mut pursuer.role
                && target.is_some_and(|t| removed.contains(&t))
            {
                *target = None;
            }
        }
        log::debug!("Removed {} disconnected sessions", removed.len());
    }

    pub fn pending_removals(&self) -> &[ActorId] {
        &self.pending_removals
    }

    /// Player counts on (team A, team B)
    pub fn team_counts(&self) -> (usize, usize) {
        self.players.iter().fold((0, 0), |(a, b), p| match p.team {
            Team::A => (a + 1, b),
            Team::B => (a, b + 1),
            _ => (a, b),
        })
    }

    pub fn player(&self, id: ActorId) -> Option<&Actor> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn pursuer(&self, id: ActorId) -> Option<&Actor> {
        self.pursuers.iter().find(|p| p.id == id)
    }

    /// Number of nodes a team holds
    pub fn nodes_owned_by(&self, team: Team) -> usize {
        self.nodes.iter().filter(|n| n.team == team).count()
    }
}
