//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (layout generation)
//! - Stable iteration order (collection order, ties broken by insertion)
//! - No transport or rendering dependencies

pub mod collision;
pub mod pursuit;
pub mod setup;
pub mod state;
pub mod sweep;
pub mod tick;
pub mod vector;

pub use collision::{Contact, circle_circle_contact, circle_rect_contact};
pub use setup::generate_world;
pub use state::{
    Actor, ActorId, ArenaEvent, Controls, Node, Role, RoleKind, Team, Wall, World,
};
pub use sweep::{ActorRef, CandidatePairs, find_candidates};
pub use tick::{TickInput, TickReport, advance};
