//! Lane Hopper - An endless lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, world scrolling, actors, collisions)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player/driver preferences
//! - `highscores`: Persistent score table
//! - `autopilot`: Demo-mode player

pub mod autopilot;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{ScoreEntry, ScoreTable};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default grid dimensions
    pub const GRID_WIDTH: usize = 28;
    pub const GRID_HEIGHT: usize = 20;

    /// World scrolls one lane every this many ticks (2 seconds at 60 Hz)
    pub const SCROLL_INTERVAL_TICKS: u32 = 120;

    /// Respawn freeze after a non-final death
    pub const RESPAWN_SECONDS: f32 = 3.0;
    /// Life cap for pickups
    pub const MAX_LIVES: u8 = 5;
}
