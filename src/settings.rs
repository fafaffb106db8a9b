//! Arena rules and tuning
//!
//! Loaded from a JSON file by the host; every field falls back to the
//! `Capture` ruleset default when missing. `ruleset` only labels a file;
//! use `apply_ruleset` to switch the rule-dependent fields to a preset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rule presets matching the two shipped game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// Charge-and-capture mode: pursuers recharge after striking
    #[default]
    Capture,
    /// Pure chase mode: pursuers freeze on contact and stay near the centre
    Chase,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Capture => "Capture",
            Ruleset::Chase => "Chase",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "capture" => Some(Ruleset::Capture),
            "chase" => Some(Ruleset::Chase),
            _ => None,
        }
    }

    /// Like `from_str`, but names the bad value in the error
    pub fn parse(s: &str) -> Result<Self, SettingsError> {
        Self::from_str(s).ok_or_else(|| SettingsError::UnknownRuleset(s.to_string()))
    }
}

/// What happens to the normal velocity component when an actor hits a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WallResponse {
    /// Normal velocity is zeroed
    Stop,
    /// Normal velocity is reversed and scaled by `restitution`
    Bounce { restitution: f32 },
}

impl WallResponse {
    /// New normal velocity component after contact
    #[inline]
    pub fn apply(&self, normal_vel: f32) -> f32 {
        match *self {
            WallResponse::Stop => 0.0,
            WallResponse::Bounce { restitution } => -restitution * normal_vel,
        }
    }
}

/// How a pursuer's stun timer evolves and gates movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StunPolicy {
    /// Timer climbs at `rate`; the pursuer is live once it exceeds
    /// `threshold`, and striking a player drops it back to zero.
    Recharge { rate: f32, threshold: f32 },
    /// Timer counts down to zero; touching a player sets it to `duration`.
    Countdown { duration: f32 },
}

impl StunPolicy {
    /// Stun value for a freshly spawned pursuer
    pub fn initial(&self) -> f32 {
        0.0
    }

    /// Whether a pursuer with this timer is immobile and harmless
    pub fn is_stunned(&self, stun: f32) -> bool {
        match *self {
            StunPolicy::Recharge { threshold, .. } => stun <= threshold,
            StunPolicy::Countdown { .. } => stun > 0.0,
        }
    }

    /// Timer value after one step of `dt` seconds
    pub fn advance(&self, stun: f32, dt: f32) -> f32 {
        match *self {
            StunPolicy::Recharge { rate, .. } => stun + rate * dt,
            StunPolicy::Countdown { .. } => (stun - dt).max(0.0),
        }
    }

    /// Timer value after the pursuer touches a player
    pub fn on_contact(&self) -> f32 {
        match *self {
            StunPolicy::Recharge { .. } => 0.0,
            StunPolicy::Countdown { duration } => duration,
        }
    }
}

/// Axis-aligned box around the origin that pursuers are pulled back into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leash {
    pub half_width: f32,
    pub half_height: f32,
}

impl Leash {
    #[inline]
    pub fn contains(&self, pos: glam::Vec2) -> bool {
        pos.x.abs() <= self.half_width && pos.y.abs() <= self.half_height
    }
}

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown ruleset `{0}` (expected capture or chase)")]
    UnknownRuleset(String),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Full simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub ruleset: Ruleset,

    // === Integration ===
    /// Fixed timestep (seconds)
    pub dt: f32,
    pub move_power: f32,
    pub drag: f32,

    // === Collision ===
    /// Left-edge margin added to every sweep interval
    pub sweep_padding: f32,
    /// Multiplier on the wall push-out distance (>= 1)
    pub wall_overshoot: f32,
    pub wall_response: WallResponse,
    /// Player charge drops to zero on any wall contact
    pub wall_resets_charge: bool,
    /// Combined actor separation as a multiple of the overlap
    pub separation_scale: f32,

    // === Timers ===
    /// Player charge gained per second
    pub charge_rate: f32,
    pub stun: StunPolicy,

    // === Pursuit ===
    pub advance_base: f32,
    pub advance_gain: f32,
    /// Normalize the desired steering force before the compass snap
    pub normalize_pursuit: bool,
    /// Centering box; `None` disables the leash
    pub leash: Option<Leash>,

    // === Layout ===
    pub actor_radius: f32,
    pub node_radius: f32,
    pub node_spread: f32,
    pub map_size: f32,
    pub wall_padding: f32,
    pub wall_thickness: f32,
    /// Rejection-sampling attempts when scattering nodes
    pub node_attempts: u32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Capture,

            dt: SIM_DT,
            move_power: ACTOR_MOVE_POWER,
            drag: DRAG,

            sweep_padding: SWEEP_PADDING,
            wall_overshoot: WALL_OVERSHOOT,
            wall_response: WallResponse::Bounce {
                restitution: WALL_RESTITUTION,
            },
            wall_resets_charge: true,
            separation_scale: 1.0,

            charge_rate: CHARGE_RATE,
            stun: StunPolicy::Recharge {
                rate: STUN_RECOVERY_RATE,
                threshold: STUN_STRIKE_THRESHOLD,
            },

            advance_base: PURSUIT_ADVANCE_BASE,
            advance_gain: PURSUIT_ADVANCE_GAIN,
            normalize_pursuit: true,
            leash: None,

            actor_radius: ACTOR_RADIUS,
            node_radius: NODE_RADIUS,
            node_spread: NODE_SPREAD,
            map_size: MAP_SIZE,
            wall_padding: WALL_PADDING,
            wall_thickness: WALL_THICKNESS,
            node_attempts: 100_000,
        }
    }
}

impl ArenaSettings {
    /// Settings with the defaults of a ruleset applied
    pub fn from_ruleset(ruleset: Ruleset) -> Self {
        let mut settings = Self::default();
        settings.apply_ruleset(ruleset);
        settings
    }

    /// Switch rule-dependent fields to the preset's values
    pub fn apply_ruleset(&mut self, ruleset: Ruleset) {
        self.ruleset = ruleset;
        match ruleset {
            Ruleset::Capture => {
                self.wall_response = WallResponse::Bounce {
                    restitution: WALL_RESTITUTION,
                };
                self.wall_resets_charge = true;
                self.stun = StunPolicy::Recharge {
                    rate: STUN_RECOVERY_RATE,
                    threshold: STUN_STRIKE_THRESHOLD,
                };
                self.normalize_pursuit = true;
                self.leash = None;
            }
            Ruleset::Chase => {
                self.wall_response = WallResponse::Stop;
                self.wall_resets_charge = false;
                self.stun = StunPolicy::Countdown {
                    duration: STUN_FREEZE_SECONDS,
                };
                self.normalize_pursuit = false;
                let half = LEASH_FRACTION * self.map_size;
                self.leash = Some(Leash {
                    half_width: half,
                    half_height: half,
                });
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            if ok {
                Ok(())
            } else {
                Err(SettingsError::Invalid { field, reason })
            }
        }

        check(self.dt.is_finite() && self.dt > 0.0, "dt", "must be positive")?;
        check(self.drag >= 0.0, "drag", "must not be negative")?;
        check(self.sweep_padding >= 0.0, "sweep_padding", "must not be negative")?;
        check(self.wall_overshoot >= 1.0, "wall_overshoot", "must be at least 1")?;
        check(self.separation_scale > 0.0, "separation_scale", "must be positive")?;
        check(self.charge_rate >= 0.0, "charge_rate", "must not be negative")?;
        check(self.actor_radius > 0.0, "actor_radius", "must be positive")?;
        check(self.node_radius > 0.0, "node_radius", "must be positive")?;
        check(self.map_size > 0.0, "map_size", "must be positive")?;
        if let WallResponse::Bounce { restitution } = self.wall_response {
            check(restitution >= 0.0, "wall_response", "restitution must not be negative")?;
        }
        match self.stun {
            StunPolicy::Recharge { rate, threshold } => {
                check(
                    rate >= 0.0 && threshold >= 0.0,
                    "stun",
                    "rate and threshold must not be negative",
                )?;
            }
            StunPolicy::Countdown { duration } => {
                check(duration >= 0.0, "stun", "duration must not be negative")?;
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded {} settings from {}",
            settings.ruleset.as_str(),
            path.as_ref().display()
        );
        Ok(settings)
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
