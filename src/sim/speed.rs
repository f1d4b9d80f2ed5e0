//! Horse speed model
//!
//! speed = condition factor * distance factor * random factor

use rand::Rng;

use super::horse::Horse;
use crate::consts::*;

/// Condition contribution: maps 1..=100 onto 0.51..=1.5
const BASE_CONDITION_MULTIPLIER: f64 = 1.0;
const MIN_CONDITION_FACTOR: f64 = 0.5;

/// Center of the distance range (1200..=2200)
const MID_DISTANCE: f64 = 1700.0;
/// Width of the distance range; normalizes deviation to [-0.5, 0.5]
const DISTANCE_NORMALIZATION: f64 = 1000.0;

const BASE_DISTANCE_FACTOR: f64 = 1.0;
const DISTANCE_FACTOR_WEIGHT: f64 = 0.1;
const DISTANCE_RANDOM_RANGE: f64 = 0.3;

/// Race-to-race multiplier in [0.8, 1.2)
const MIN_RANDOM_FACTOR: f64 = 0.8;
const RANDOM_FACTOR_RANGE: f64 = 0.4;

/// Effective speed of a horse over `distance` meters. Always positive.
///
/// Draws fresh randomness on every call.
pub fn calculate_horse_speed<R: Rng + ?Sized>(horse: &Horse, distance: u32, rng: &mut R) -> f64 {
    let condition = horse.condition.clamp(MIN_CONDITION, MAX_CONDITION) as f64;
    let condition_factor =
        (condition / MAX_CONDITION as f64) * BASE_CONDITION_MULTIPLIER + MIN_CONDITION_FACTOR;

    // Longer races push the factor up, scaled with condition through the product
    let normalized_distance = (distance as f64 - MID_DISTANCE) / DISTANCE_NORMALIZATION;
    let distance_factor = BASE_DISTANCE_FACTOR
        + normalized_distance * DISTANCE_FACTOR_WEIGHT
        + rng.random::<f64>() * DISTANCE_RANDOM_RANGE;

    let random_factor = MIN_RANDOM_FACTOR + rng.random::<f64>() * RANDOM_FACTOR_RANGE;

    condition_factor * distance_factor * random_factor
}
