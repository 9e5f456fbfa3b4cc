//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by actor id, then lane index)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod generator;
pub mod lane;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use actor::{Actor, ActorId, MoveDir, PLAYER_ONE, PLAYER_TWO};
pub use collision::{Collision, check_cell};
pub use generator::LaneGenerator;
pub use lane::{Cell, Direction, Lane, LaneKind};
pub use snapshot::{ActorView, LaneView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{end_game, handle_move, set_paused, tick};
pub use world::World;
