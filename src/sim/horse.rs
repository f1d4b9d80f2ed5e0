//! Horses and the session roster

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horse names, index-aligned with ids (id = index + 1)
pub const HORSE_NAMES: [&str; HORSE_COUNT] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Margaret Hamilton",
    "Donald Knuth",
    "John von Neumann",
    "Claude Shannon",
    "Barbara Liskov",
    "Edsger Dijkstra",
    "Frances Allen",
    "Tim Berners-Lee",
    "Dennis Ritchie",
    "Ken Thompson",
    "Joan Clarke",
    "Hedy Lamarr",
    "Katherine Johnson",
    "Annie Easley",
    "Ada Yonath",
    "Rear Admiral Hopper",
    "Dorothy Vaughan",
];

/// Silk colors, index-aligned with `HORSE_NAMES`
pub const HORSE_COLORS: [&str; HORSE_COUNT] = [
    "#FF6B6B", "#4ECDC4", "#FFE66D", "#A8E6CF", "#FF8B94", "#C7CEEA", "#FFDAC1", "#B4F8C8",
    "#FBE7C6", "#A0E7E5", "#FFAEBC", "#B4A7D6", "#FFD3B6", "#DCEDC1", "#FFA8A8", "#A8DADC",
    "#F4ACB7", "#D4A5A5", "#9EE09E", "#FFB6B9",
];

/// A horse entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: u32,
    pub name: String,
    /// Fitness in `MIN_CONDITION..=MAX_CONDITION`
    pub condition: u32,
    /// Hex color tag
    pub color: String,
    /// Race progress in percent (0-100)
    #[serde(default)]
    pub position: f64,
    /// Simulated finish time in ms (set by `simulate_race`)
    #[serde(default)]
    pub finish_time: Option<f64>,
}

impl Horse {
    pub fn new(id: u32, name: impl Into<String>, condition: u32, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            condition,
            color: color.into(),
            position: 0.0,
            finish_time: None,
        }
    }

    /// Independent copy for a race lineup: progress at the gate, no finish time
    pub fn race_entry(&self) -> Self {
        Self {
            position: 0.0,
            finish_time: None,
            ..self.clone()
        }
    }

    /// True once the horse crossed the line
    pub fn has_finished(&self) -> bool {
        self.position >= PROGRESS_COMPLETE
    }
}

/// Build the full roster with random conditions
pub fn generate_horses<R: Rng + ?Sized>(rng: &mut R) -> Vec<Horse> {
    HORSE_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let color = HORSE_COLORS.get(index).copied().unwrap_or(FALLBACK_COLOR);
            let condition = rng.random_range(MIN_CONDITION..=MAX_CONDITION);
            Horse::new(index as u32 + 1, *name, condition, color)
        })
        .collect()
}

/// All horses available to the current session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    horses: Vec<Horse>,
}

impl Roster {
    pub fn new() -> Self {
        Self { horses: Vec::new() }
    }

    /// Generate the roster unless it already exists
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.horses.is_empty() {
            return;
        }
        self.horses = generate_horses(rng);
        log::info!("Roster generated ({} horses)", self.horses.len());
    }

    /// Drop all horses; the next `initialize` builds a fresh roster
    pub fn reset(&mut self) {
        self.horses.clear();
    }

    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    pub fn len(&self) -> usize {
        self.horses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horses.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Horse> {
        self.horses.iter().find(|h| h.id == id)
    }
}
