//! Lane generation
//!
//! Produces lanes for a monotonically increasing world position: a weighted
//! row-type draw, then alternating obstacle/gap runs of random length until
//! the lane is full. The advance period range tightens as the world position
//! grows.

use std::collections::{TryReserveError, VecDeque};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lane::{Cell, Direction, Lane, LaneKind};
use crate::tuning::{GeneratorTuning, RunLengths};

#[derive(Debug, Clone)]
pub struct LaneGenerator {
    width: usize,
    tuning: GeneratorTuning,
    rng: Pcg32,
}

impl LaneGenerator {
    pub fn new(width: usize, tuning: GeneratorTuning, seed: u64) -> Self {
        Self {
            width,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn tuning(&self) -> &GeneratorTuning {
        &self.tuning
    }

    /// Generate the lane for `world_position`. Never fails: if the cell buffer
    /// cannot be reserved the result is an all-empty Ground lane.
    pub fn generate(&mut self, world_position: u64) -> Lane {
        let kind = self.choose_kind(world_position);
        let built = self.build(kind, world_position);
        self.lane_or_ground(world_position, built)
    }

    fn lane_or_ground(&self, world_position: u64, built: Result<Lane, TryReserveError>) -> Lane {
        match built {
            Ok(lane) => {
                log::debug!(
                    "Lane {}: {:?} {:?} period={}",
                    world_position,
                    lane.kind(),
                    lane.direction(),
                    lane.advance_period()
                );
                lane
            }
            Err(err) => {
                log::warn!("Lane {world_position}: cell buffer reservation failed ({err}); using Ground");
                Lane::ground(self.width)
            }
        }
    }

    /// Row type for a world position: forced Ground for the first lanes,
    /// weighted draw afterwards
    pub fn choose_kind(&mut self, world_position: u64) -> LaneKind {
        if world_position < self.tuning.forced_ground_lanes {
            return LaneKind::Ground;
        }
        let weights = self.tuning.weights;
        let total = weights.total();
        if total == 0 {
            return LaneKind::Ground;
        }

        let roll = self.rng.random_range(0..total);
        if roll < weights.ground {
            LaneKind::Ground
        } else if roll < weights.ground + weights.traffic {
            LaneKind::Traffic
        } else {
            LaneKind::Water
        }
    }

    /// Inclusive advance period range at a world position
    pub fn period_range(&self, world_position: u64) -> (u32, u32) {
        let t = &self.tuning;
        let ramp = u32::try_from(world_position / t.difficulty_step.max(1)).unwrap_or(u32::MAX);
        let hi = t.period_max.saturating_sub(ramp).max(t.period_floor);
        let lo = t.period_min.saturating_sub(ramp).max(t.period_floor).min(hi);
        (lo, hi)
    }

    /// Empty Ground lane of the generator's width
    pub fn ground(&self) -> Lane {
        Lane::ground(self.width)
    }

    /// Uniform column in `0..width`
    pub fn random_column(&mut self) -> usize {
        if self.width == 0 {
            return 0;
        }
        self.rng.random_range(0..self.width)
    }

    /// Fresh seed for a follow-up run (reset)
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    fn build(&mut self, kind: LaneKind, world_position: u64) -> Result<Lane, TryReserveError> {
        let mut cells = VecDeque::new();
        cells.try_reserve_exact(self.width)?;
        cells.extend(std::iter::repeat_n(Cell::Empty, self.width));

        match kind {
            LaneKind::Ground => {}
            LaneKind::Traffic => self.fill_runs(&mut cells, Cell::Vehicle, self.tuning.traffic),
            LaneKind::Water => self.fill_runs(&mut cells, Cell::Log, self.tuning.water),
        }

        let direction = if self.rng.random_bool(0.5) {
            Direction::Left
        } else {
            Direction::Right
        };
        let (lo, hi) = self.period_range(world_position);
        let period = self.rng.random_range(lo..=hi);

        Ok(Lane::new(kind, cells, direction, period))
    }

    /// Alternate obstacle and gap runs until the lane is full; the last run is truncated
    fn fill_runs(&mut self, cells: &mut VecDeque<Cell>, obstacle: Cell, runs: RunLengths) {
        let width = cells.len();
        let mut i = 0;
        while i < width {
            let obstacle_len = self.rng.random_range(runs.obstacle_min..=runs.obstacle_max);
            let gap_len = self.rng.random_range(runs.gap_min..=runs.gap_max);

            let end = (i + obstacle_len).min(width);
            for cell in cells.range_mut(i..end) {
                *cell = obstacle;
            }
            i = (end + gap_len).min(width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::RowWeights;
    use proptest::prelude::*;

    fn generator(seed: u64) -> LaneGenerator {
        LaneGenerator::new(28, GeneratorTuning::default(), seed)
    }

    #[test]
    fn test_first_lanes_forced_ground() {
        let mut g = generator(7);
        for pos in 0..3 {
            let lane = g.generate(pos);
            assert_eq!(lane.kind(), LaneKind::Ground);
            assert_eq!(lane.count(Cell::Empty), 28);
        }
    }

    #[test]
    fn test_all_kinds_drawn() {
        let mut g = generator(42);
        let mut seen = [false; 3];
        for pos in 3..500 {
            match g.generate(pos).kind() {
                LaneKind::Ground => seen[0] = true,
                LaneKind::Traffic => seen[1] = true,
                LaneKind::Water => seen[2] = true,
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_zero_weights_yield_ground() {
        let tuning = GeneratorTuning {
            weights: RowWeights {
                ground: 0,
                traffic: 0,
                water: 0,
            },
            ..GeneratorTuning::default()
        };
        let mut g = LaneGenerator::new(10, tuning, 1);
        for pos in 0..50 {
            assert_eq!(g.generate(pos).kind(), LaneKind::Ground);
        }
    }

    #[test]
    fn test_obstacle_matches_kind() {
        let mut g = generator(3);
        for pos in 3..300 {
            let lane = g.generate(pos);
            match lane.kind() {
                LaneKind::Ground => assert_eq!(lane.count(Cell::Empty), 28),
                LaneKind::Traffic => assert_eq!(lane.count(Cell::Log), 0),
                LaneKind::Water => assert_eq!(lane.count(Cell::Vehicle), 0),
            }
            assert_eq!(lane.width(), 28);
        }
    }

    #[test]
    fn test_period_range_narrows_and_clamps() {
        let g = generator(0);
        assert_eq!(g.period_range(0), (5, 8));
        assert_eq!(g.period_range(25), (4, 7));
        assert_eq!(g.period_range(75), (2, 5));
        assert_eq!(g.period_range(10_000), (2, 2));
        assert_eq!(g.period_range(u64::MAX), (2, 2));
    }

    #[test]
    fn test_generated_period_within_range() {
        let mut g = generator(11);
        for pos in 0..400 {
            let (lo, hi) = g.period_range(pos);
            let lane = g.generate(pos);
            assert!((lo..=hi).contains(&lane.advance_period()));
        }
    }

    #[test]
    fn test_reservation_failure_falls_back_to_ground() {
        let g = generator(5);
        let err = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let lane = g.lane_or_ground(40, Err(err));
        assert_eq!(lane.kind(), LaneKind::Ground);
        assert_eq!(lane.width(), 28);
        assert_eq!(lane.count(Cell::Empty), 28);
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let mut a = generator(99);
        let mut b = generator(99);
        for pos in 0..100 {
            assert_eq!(a.generate(pos), b.generate(pos));
        }
    }

    proptest! {
        #[test]
        fn prop_moving_lanes_always_have_a_gap(
            seed in any::<u64>(),
            position in 3u64..5_000,
            width in 5usize..64,
        ) {
            let mut g = LaneGenerator::new(width, GeneratorTuning::default(), seed);
            let lane = g.generate(position);
            if lane.kind() != LaneKind::Ground {
                prop_assert!(lane.count(Cell::Empty) >= 1);
            }
            prop_assert_eq!(lane.width(), width);
        }

        #[test]
        fn prop_tight_runs_still_playable(seed in any::<u64>(), width in 2usize..12) {
            let tuning = GeneratorTuning {
                weights: RowWeights { ground: 0, traffic: 50, water: 50 },
                forced_ground_lanes: 0,
                traffic: RunLengths::new(1, 1, 1, 1),
                water: RunLengths::new(1, 1, 1, 1),
                ..GeneratorTuning::default()
            };
            let mut g = LaneGenerator::new(width, tuning, seed);
            let lane = g.generate(0);
            prop_assert!(lane.count(Cell::Empty) >= 1);
        }
    }
}
