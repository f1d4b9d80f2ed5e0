//! Race simulation module
//!
//! All game logic lives here. This module must stay free of platform code:
//! - Randomness only through an injected `Rng`
//! - Time only through `now` arguments (milliseconds)
//! - Stable ordering (roster by id, simulations by finish time)

pub mod horse;
pub mod race;
pub mod speed;
pub mod state;

pub use horse::{HORSE_COLORS, HORSE_NAMES, Horse, Roster, generate_horses};
pub use race::{
    Race, RaceResult, RaceStatus, calculate_race_results, generate_race_program,
    select_random_horses, simulate_race,
};
pub use speed::calculate_horse_speed;
pub use state::{GamePhase, RaceEvent, RaceSession};
