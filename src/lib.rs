//! Node Arena - simulation core for a real-time territory-capture arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sweep, collisions, pursuit, tick driver)
//! - `settings`: Data-driven rules and tuning, loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{ArenaSettings, Ruleset, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (100 Hz)
    pub const SIM_DT: f32 = 0.01;

    /// Thrust applied per unit of force per second
    pub const ACTOR_MOVE_POWER: f32 = 60.0;
    /// Fraction of velocity shed per second
    pub const DRAG: f32 = 0.5;
    pub const ACTOR_RADIUS: f32 = 1.0;

    /// Capture nodes
    pub const NODE_RADIUS: f32 = 9.0;
    pub const NODE_SPREAD: f32 = 10.0;

    /// Left-edge margin for the broad-phase sweep (absorbs one tick of motion)
    pub const SWEEP_PADDING: f32 = 10.0;
    /// Push-out multiplier when leaving a wall
    pub const WALL_OVERSHOOT: f32 = 1.01;
    /// Velocity kept (and reversed) after bouncing off a wall
    pub const WALL_RESTITUTION: f32 = 0.1;

    /// Player charge gained per second (full after 5 s)
    pub const CHARGE_RATE: f32 = 1.0 / 5.0;
    /// Pursuer stun recovery per second in the recharge ruleset
    pub const STUN_RECOVERY_RATE: f32 = 1.0 / 2.0;
    /// Stun value above which a recharging pursuer may move and strike
    pub const STUN_STRIKE_THRESHOLD: f32 = 1.0;
    /// Freeze duration (seconds) in the countdown ruleset
    pub const STUN_FREEZE_SECONDS: f32 = 2.0;

    /// Pursuit closing speed: base + gain * distance
    pub const PURSUIT_ADVANCE_BASE: f32 = 4.0;
    pub const PURSUIT_ADVANCE_GAIN: f32 = 0.5;

    /// Chase-mode leash half-size as a fraction of the map size
    pub const LEASH_FRACTION: f32 = 0.4;

    /// Arena layout
    pub const MAP_SIZE: f32 = 150.0;
    pub const WALL_PADDING: f32 = 5.0;
    pub const WALL_THICKNESS: f32 = 50_000.0;
}

/// Unit vector for a set of directional buttons (screen space, up = -y)
#[inline]
pub fn axis_force(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let dx = right as i8 - left as i8;
    let dy = down as i8 - up as i8;
    Vec2::new(dx as f32, dy as f32).normalize_or_zero()
}
