//! Race progress animation
//!
//! Maps elapsed wall-clock time onto per-horse progress. One tick per display
//! frame; the host schedules frames through a [`FrameScheduler`] and hands the
//! fired frame back to the session, which calls [`RaceAnimator::tick`].

use serde::{Deserialize, Serialize};

use crate::consts::PROGRESS_COMPLETE;
use crate::sim::Horse;

/// Identifier of one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub i32);

/// Display-refresh scheduling primitive (requestAnimationFrame on the web)
pub trait FrameScheduler {
    /// Schedule one frame callback. `None` when the host could not schedule it.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    /// Cancel a scheduled frame. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Result of a single animation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTick {
    /// Horses still running; schedule another frame
    Continue,
    /// The animation is over. Either every horse finished, or the
    /// continuation predicate failed (paused); callers check the phase.
    Resolved,
}

/// Timing snapshot of one animation chain
#[derive(Debug, Clone, PartialEq)]
pub struct RaceAnimator {
    /// (horse id, finish time) in simulation order
    horses: Vec<(u32, Option<f64>)>,
    slowest_time: f64,
    start_time: f64,
    elapsed_before_pause: f64,
}

impl RaceAnimator {
    pub fn new(simulated_horses: &[Horse], start_time: f64, elapsed_before_pause: f64) -> Self {
        let horses: Vec<(u32, Option<f64>)> = simulated_horses
            .iter()
            .map(|h| (h.id, h.finish_time))
            .collect();
        let slowest_time = horses
            .iter()
            .filter_map(|(_, time)| *time)
            .fold(0.0, f64::max);

        Self {
            horses,
            slowest_time,
            start_time,
            elapsed_before_pause,
        }
    }

    /// Total race time elapsed at `now`, including time run before pauses
    pub fn elapsed_at(&self, now: f64) -> f64 {
        self.elapsed_before_pause + (now - self.start_time)
    }

    /// Progress of a horse after `elapsed` ms.
    ///
    /// Horses without a finish time run at the pace of the slowest horse.
    pub fn progress(&self, finish_time: Option<f64>, elapsed: f64) -> f64 {
        let finish_time = match finish_time {
            Some(time) if time > 0.0 => time,
            _ => self.slowest_time,
        };
        if finish_time <= 0.0 {
            return PROGRESS_COMPLETE;
        }
        (elapsed / finish_time * PROGRESS_COMPLETE).clamp(0.0, PROGRESS_COMPLETE)
    }

    /// Run one tick at `now`.
    ///
    /// Reports every horse through `on_update`. When all horses finished, a
    /// correction pass pins everyone to exactly 100.
    pub fn tick(
        &self,
        now: f64,
        should_continue: impl FnOnce() -> bool,
        mut on_update: impl FnMut(u32, f64),
    ) -> AnimationTick {
        let elapsed = self.elapsed_at(now);
        let mut all_finished = true;

        for &(horse_id, finish_time) in &self.horses {
            let progress = self.progress(finish_time, elapsed);
            on_update(horse_id, progress);
            if progress < PROGRESS_COMPLETE {
                all_finished = false;
            }
        }

        if !all_finished && should_continue() {
            AnimationTick::Continue
        } else {
            if all_finished {
                for &(horse_id, _) in &self.horses {
                    on_update(horse_id, PROGRESS_COMPLETE);
                }
            }
            AnimationTick::Resolved
        }
    }
}

/// True when every simulated horse reached the line in the race lineup
pub fn are_all_horses_finished(simulation: &[Horse], race_horses: &[Horse]) -> bool {
    simulation.iter().all(|horse| {
        race_horses
            .iter()
            .find(|race_horse| race_horse.id == horse.id)
            .is_some_and(Horse::has_finished)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horse(id: u32, finish_time: Option<f64>) -> Horse {
        let mut horse = Horse::new(id, format!("Horse {id}"), 50, "#FF6B6B");
        horse.finish_time = finish_time;
        horse
    }

    fn collect(animator: &RaceAnimator, now: f64, keep_going: bool) -> (AnimationTick, Vec<(u32, f64)>) {
        let mut updates = Vec::new();
        let tick = animator.tick(now, || keep_going, |id, p| updates.push((id, p)));
        (tick, updates)
    }

    #[test]
    fn test_progress_scales_with_elapsed_time() {
        let horses = vec![horse(1, Some(1000.0)), horse(2, Some(2000.0))];
        let animator = RaceAnimator::new(&horses, 500.0, 0.0);

        let (tick, updates) = collect(&animator, 1000.0, true);

        assert_eq!(tick, AnimationTick::Continue);
        assert_eq!(updates, vec![(1, 50.0), (2, 25.0)]);
    }

    #[test]
    fn test_elapsed_before_pause_is_included() {
        let horses = vec![horse(1, Some(1000.0))];
        let animator = RaceAnimator::new(&horses, 10_000.0, 400.0);

        assert_eq!(animator.elapsed_at(10_100.0), 500.0);
        let (_, updates) = collect(&animator, 10_100.0, true);
        assert_eq!(updates, vec![(1, 50.0)]);
    }

    #[test]
    fn test_missing_finish_time_uses_slowest() {
        let horses = vec![horse(1, Some(1000.0)), horse(2, Some(4000.0)), horse(3, None)];
        let animator = RaceAnimator::new(&horses, 0.0, 0.0);

        assert_eq!(animator.progress(None, 1000.0), 25.0);
        assert_eq!(animator.progress(Some(0.0), 2000.0), 50.0);
        let (_, updates) = collect(&animator, 1000.0, true);
        assert_eq!(updates[2], (3, 25.0));
    }

    #[test]
    fn test_no_finish_times_counts_as_finished() {
        let horses = vec![horse(1, None)];
        let animator = RaceAnimator::new(&horses, 0.0, 0.0);
        assert_eq!(animator.progress(None, 0.0), PROGRESS_COMPLETE);
    }

    #[test]
    fn test_progress_is_capped() {
        let horses = vec![horse(1, Some(1000.0)), horse(2, Some(2000.0))];
        let animator = RaceAnimator::new(&horses, 0.0, 0.0);

        let (tick, updates) = collect(&animator, 1500.0, true);
        assert_eq!(tick, AnimationTick::Continue);
        assert_eq!(updates, vec![(1, 100.0), (2, 75.0)]);
    }

    #[test]
    fn test_all_finished_forces_completion() {
        let horses = vec![horse(1, Some(1000.0)), horse(2, Some(2000.0))];
        let animator = RaceAnimator::new(&horses, 0.0, 0.0);

        // Finishing resolves even when the predicate says stop
        let (tick, updates) = collect(&animator, 2500.0, false);

        assert_eq!(tick, AnimationTick::Resolved);
        assert_eq!(updates.len(), 4);
        assert_eq!(&updates[2..], &[(1, 100.0), (2, 100.0)]);
    }

    #[test]
    fn test_stopped_early_does_not_force_completion() {
        let horses = vec![horse(1, Some(1000.0)), horse(2, Some(2000.0))];
        let animator = RaceAnimator::new(&horses, 0.0, 0.0);

        let (tick, updates) = collect(&animator, 500.0, false);

        assert_eq!(tick, AnimationTick::Resolved);
        assert_eq!(updates, vec![(1, 50.0), (2, 25.0)]);
    }

    #[test]
    fn test_are_all_horses_finished() {
        let simulation = vec![horse(1, Some(1000.0)), horse(2, Some(2000.0))];
        let mut lineup = vec![horse(2, None), horse(1, None)];

        assert!(!are_all_horses_finished(&simulation, &lineup));
        lineup[0].position = 100.0;
        assert!(!are_all_horses_finished(&simulation, &lineup));
        lineup[1].position = 100.0;
        assert!(are_all_horses_finished(&simulation, &lineup));

        // A simulated horse missing from the lineup never counts as finished
        lineup.pop();
        assert!(!are_all_horses_finished(&simulation, &lineup));
    }
}
