//! Horse Derby - a six-round horse racing simulation
//!
//! Core modules:
//! - `sim`: Roster, speed model, race simulation and the game state machine
//! - `animation`: Frame-driven progress animation with pause/resume accounting
//! - `game`: Session facade owning the roster, the RNG and the race session
//! - `platform`: Browser/headless frame scheduling
//! - `settings`: Runtime configuration

pub mod animation;
pub mod error;
pub mod format;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, Result};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Horses in the roster
    pub const HORSE_COUNT: usize = 20;
    /// Horses drawn from the roster for each race
    pub const HORSES_PER_RACE: usize = 10;

    /// Condition (fitness) bounds, inclusive
    pub const MIN_CONDITION: u32 = 1;
    pub const MAX_CONDITION: u32 = 100;

    /// One race per distance, run in this order (meters)
    pub const RACE_DISTANCES: [u32; 6] = [1200, 1400, 1600, 1800, 2000, 2200];

    /// Base animation time per meter at unit speed (ms)
    pub const MS_PER_METER: f64 = 8.0;

    /// Progress value of a horse that crossed the line
    pub const PROGRESS_COMPLETE: f64 = 100.0;

    /// Color used when the palette runs out
    pub const FALLBACK_COLOR: &str = "#999999";
}
