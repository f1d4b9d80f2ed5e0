//! Races, program scheduling, race simulation and results

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::horse::Horse;
use super::speed::calculate_horse_speed;
use crate::consts::*;

/// Race lifecycle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceStatus {
    #[default]
    Pending,
    Running,
    Completed,
}

/// One line of a race's result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    /// Finishing position (1-based)
    pub position: u32,
    pub horse_name: String,
    pub horse_id: u32,
    /// Finish time in ms (0 when unknown)
    pub time: f64,
}

/// A single round of the program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    /// 1-based round number
    pub round_number: u32,
    /// Distance in meters
    pub distance: u32,
    /// Lineup (independent copies of roster horses)
    pub horses: Vec<Horse>,
    pub status: RaceStatus,
    /// Present once the race is completed
    pub results: Option<Vec<RaceResult>>,
}

impl Race {
    pub fn new(round_number: u32, distance: u32, horses: Vec<Horse>) -> Self {
        Self {
            round_number,
            distance,
            horses,
            status: RaceStatus::Pending,
            results: None,
        }
    }

    pub fn horse(&self, id: u32) -> Option<&Horse> {
        self.horses.iter().find(|h| h.id == id)
    }

    pub fn horse_mut(&mut self, id: u32) -> Option<&mut Horse> {
        self.horses.iter_mut().find(|h| h.id == id)
    }

    /// Pending -> Running. A completed race stays completed.
    pub fn mark_running(&mut self) {
        if self.status == RaceStatus::Pending {
            self.status = RaceStatus::Running;
        }
    }

    /// Store results and mark the race completed
    pub fn complete(&mut self, results: Vec<RaceResult>) {
        self.status = RaceStatus::Completed;
        self.results = Some(results);
    }

    pub fn is_completed(&self) -> bool {
        self.status == RaceStatus::Completed
    }
}

/// Draw `count` distinct horses at random, as fresh race entries.
///
/// The input roster is never modified.
pub fn select_random_horses<R: Rng + ?Sized>(
    all_horses: &[Horse],
    count: usize,
    rng: &mut R,
) -> Vec<Horse> {
    let mut shuffled: Vec<&Horse> = all_horses.iter().collect();
    shuffled.shuffle(rng);
    shuffled
        .into_iter()
        .take(count)
        .map(Horse::race_entry)
        .collect()
}

/// Build the six-round program, one pending race per distance
pub fn generate_race_program<R: Rng + ?Sized>(all_horses: &[Horse], rng: &mut R) -> Vec<Race> {
    RACE_DISTANCES
        .iter()
        .enumerate()
        .map(|(index, &distance)| {
            let horses = select_random_horses(all_horses, HORSES_PER_RACE, rng);
            Race::new(index as u32 + 1, distance, horses)
        })
        .collect()
}

/// Assign finish times to every horse in the race.
///
/// Returns copies sorted fastest first (stable for equal times), progress reset to 0.
pub fn simulate_race<R: Rng + ?Sized>(race: &Race, rng: &mut R) -> Vec<Horse> {
    let base_time = race.distance as f64 * MS_PER_METER;

    let mut simulated: Vec<Horse> = race
        .horses
        .iter()
        .map(|horse| {
            let speed = calculate_horse_speed(horse, race.distance, rng);
            Horse {
                position: 0.0,
                finish_time: Some(base_time / speed),
                ..horse.clone()
            }
        })
        .collect();

    simulated.sort_by(|a, b| {
        a.finish_time
            .unwrap_or(0.0)
            .total_cmp(&b.finish_time.unwrap_or(0.0))
    });
    simulated
}

/// Rank horses already ordered by finish time
pub fn calculate_race_results(simulated_horses: &[Horse]) -> Vec<RaceResult> {
    simulated_horses
        .iter()
        .enumerate()
        .map(|(index, horse)| RaceResult {
            position: index as u32 + 1,
            horse_name: horse.name.clone(),
            horse_id: horse.id,
            time: horse.finish_time.unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::horse::generate_horses;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn roster(seed: u64) -> Vec<Horse> {
        generate_horses(&mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_select_random_horses_without_replacement() {
        let mut rng = Pcg32::seed_from_u64(5);
        let all = roster(5);
        let picked = select_random_horses(&all, HORSES_PER_RACE, &mut rng);

        assert_eq!(picked.len(), HORSES_PER_RACE);
        let ids: HashSet<u32> = picked.iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), HORSES_PER_RACE);
        assert!(picked.iter().all(|h| all.iter().any(|r| r.id == h.id)));
    }

    #[test]
    fn test_select_random_horses_leaves_roster_alone() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut all = roster(6);
        for horse in &mut all {
            horse.position = 42.0;
            horse.finish_time = Some(1234.0);
        }
        let before = all.clone();

        let picked = select_random_horses(&all, HORSES_PER_RACE, &mut rng);

        assert_eq!(all, before);
        for horse in &picked {
            assert_eq!(horse.position, 0.0);
            assert!(horse.finish_time.is_none());
        }
    }

    #[test]
    fn test_select_more_than_available() {
        let mut rng = Pcg32::seed_from_u64(6);
        let all = roster(6);
        let picked = select_random_horses(&all[..4], HORSES_PER_RACE, &mut rng);
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn test_generate_race_program() {
        let mut rng = Pcg32::seed_from_u64(8);
        let all = roster(8);
        let program = generate_race_program(&all, &mut rng);

        assert_eq!(program.len(), 6);
        for (index, race) in program.iter().enumerate() {
            assert_eq!(race.round_number, index as u32 + 1);
            assert_eq!(race.distance, RACE_DISTANCES[index]);
            assert_eq!(race.horses.len(), HORSES_PER_RACE);
            assert_eq!(race.status, RaceStatus::Pending);
            assert!(race.results.is_none());
        }
        assert!(program.windows(2).all(|w| w[0].distance < w[1].distance));
    }

    #[test]
    fn test_simulate_race() {
        let mut rng = Pcg32::seed_from_u64(9);
        let all = roster(9);
        let mut race = Race::new(1, 1600, select_random_horses(&all, HORSES_PER_RACE, &mut rng));
        race.horses[0].position = 30.0;

        let simulated = simulate_race(&race, &mut rng);

        assert_eq!(simulated.len(), race.horses.len());
        assert!(simulated.iter().all(|h| h.position == 0.0));
        assert!(simulated.iter().all(|h| h.finish_time.is_some_and(|t| t > 0.0)));
        assert!(
            simulated
                .windows(2)
                .all(|w| w[0].finish_time <= w[1].finish_time)
        );
        // Race lineup is not touched
        assert_eq!(race.horses[0].position, 30.0);
        assert!(race.horses.iter().all(|h| h.finish_time.is_none()));
    }

    /// Source that always yields zero, so equal horses get equal speeds
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_simulate_race_ties_keep_lineup_order() {
        let horses: Vec<Horse> = (1..=5)
            .map(|id| Horse::new(id, format!("Twin {id}"), 60, "#FF6B6B"))
            .collect();
        let race = Race::new(1, 1400, horses);

        let simulated = simulate_race(&race, &mut ZeroRng);

        let ids: Vec<u32> = simulated.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let first = simulated[0].finish_time;
        assert!(simulated.iter().all(|h| h.finish_time == first));
    }

    #[test]
    fn test_simulate_empty_race() {
        let mut rng = Pcg32::seed_from_u64(9);
        let race = Race::new(1, 1200, Vec::new());
        assert!(simulate_race(&race, &mut rng).is_empty());
    }

    #[test]
    fn test_calculate_race_results() {
        let mut horses = vec![
            Horse::new(7, "Hedy Lamarr", 50, "#FF6B6B"),
            Horse::new(2, "Grace Hopper", 50, "#4ECDC4"),
            Horse::new(9, "Ken Thompson", 50, "#FFE66D"),
        ];
        horses[0].finish_time = Some(9000.0);
        horses[1].finish_time = Some(9500.0);

        let results = calculate_race_results(&horses);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].position, 1);
        assert_eq!(results[0].horse_id, 7);
        assert_eq!(results[0].horse_name, "Hedy Lamarr");
        assert_eq!(results[0].time, 9000.0);
        assert_eq!(results[1].position, 2);
        assert_eq!(results[1].horse_id, 2);
        // Missing finish time maps to 0
        assert_eq!(results[2].position, 3);
        assert_eq!(results[2].time, 0.0);
    }

    #[test]
    fn test_calculate_race_results_empty() {
        assert!(calculate_race_results(&[]).is_empty());
    }

    #[test]
    fn test_race_status_only_moves_forward() {
        let mut race = Race::new(1, 1200, Vec::new());
        race.mark_running();
        assert_eq!(race.status, RaceStatus::Running);

        race.complete(Vec::new());
        assert!(race.is_completed());
        assert_eq!(race.results, Some(Vec::new()));

        race.mark_running();
        assert_eq!(race.status, RaceStatus::Completed);
    }

    #[test]
    fn test_race_status_serializes_lowercase() {
        let json = serde_json::to_string(&RaceStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }

    proptest! {
        #[test]
        fn prop_simulation_ordering(seed in any::<u64>(), distance_index in 0usize..6) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let all = roster(seed);
            let race = Race::new(1, RACE_DISTANCES[distance_index], select_random_horses(&all, HORSES_PER_RACE, &mut rng));

            let simulated = simulate_race(&race, &mut rng);
            let results = calculate_race_results(&simulated);

            prop_assert_eq!(simulated.len(), HORSES_PER_RACE);
            prop_assert!(simulated.windows(2).all(|w| w[0].finish_time <= w[1].finish_time));
            for (index, result) in results.iter().enumerate() {
                prop_assert_eq!(result.position as usize, index + 1);
                prop_assert_eq!(result.horse_id, simulated[index].id);
            }
        }
    }
}
