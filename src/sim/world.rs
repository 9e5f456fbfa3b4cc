//! The visible map: a fixed window of lanes
//!
//! Index 0 is the top (leading edge); scrolling retires the bottom lane and
//! generates a fresh one at the top. `world_head` counts scrolls and anchors
//! absolute row numbers.

use std::collections::VecDeque;

use glam::IVec2;

use super::generator::LaneGenerator;
use super::lane::{Cell, Lane, LaneKind};
use crate::tuning::{LateMargin, Tuning};

/// Safe-start corrections applied after every scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MarginRules {
    safe_margin: usize,
    early_game_threshold: u64,
    late_margin: LateMargin,
    no_adjacent_water_early: bool,
}

#[derive(Debug, Clone)]
pub struct World {
    lanes: VecDeque<Lane>,
    world_head: u64,
    width: usize,
    height: usize,
    generator: LaneGenerator,
    rules: MarginRules,
}

impl World {
    /// Build a full window. Lane positions count from the bottom so the
    /// forced-Ground opening lanes sit under the spawn point.
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        let mut generator = LaneGenerator::new(tuning.width, tuning.generator.clone(), seed);
        let height = tuning.height;

        let mut lanes = VecDeque::with_capacity(height);
        for position in 0..height as u64 {
            lanes.push_front(generator.generate(position));
        }

        let mut world = Self {
            lanes,
            world_head: 0,
            width: tuning.width,
            height,
            generator,
            rules: MarginRules {
                safe_margin: tuning.safe_margin,
                early_game_threshold: tuning.early_game_threshold,
                late_margin: tuning.late_margin,
                no_adjacent_water_early: tuning.no_adjacent_water_early,
            },
        };
        world.apply_corrections();
        world
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of scrolls so far
    pub fn world_head(&self) -> u64 {
        self.world_head
    }

    /// World position of the next lane the generator will produce
    pub fn next_position(&self) -> u64 {
        self.height as u64 + self.world_head
    }

    /// Absolute row of screen row `y`
    pub fn abs_row(&self, y: i32) -> i64 {
        self.world_head as i64 + i64::from(y)
    }

    pub fn is_early_game(&self) -> bool {
        self.world_head < self.rules.early_game_threshold
    }

    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }

    pub fn lane(&self, y: i32) -> Option<&Lane> {
        usize::try_from(y).ok().and_then(|y| self.lanes.get(y))
    }

    pub fn lane_mut(&mut self, y: i32) -> Option<&mut Lane> {
        usize::try_from(y).ok().and_then(|y| self.lanes.get_mut(y))
    }

    /// Swap in a lane (width must match the world)
    pub fn replace_lane(&mut self, y: usize, lane: Lane) {
        if lane.width() != self.width {
            log::warn!("Rejected lane of width {} (world width {})", lane.width(), self.width);
            return;
        }
        if let Some(slot) = self.lanes.get_mut(y) {
            *slot = lane;
        }
    }

    pub fn generator_mut(&mut self) -> &mut LaneGenerator {
        &mut self.generator
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Retire the bottom lane, generate a new top lane and re-apply the safe-start rules
    pub fn scroll_down(&mut self) {
        let position = self.next_position();
        self.lanes.pop_back();
        self.lanes.push_front(self.generator.generate(position));
        self.world_head += 1;
        self.apply_corrections();
        for lane in &mut self.lanes {
            lane.clear_advanced();
        }
        log::debug!("Scrolled to head {}", self.world_head);
    }

    /// Count one tick on every lane; moving lanes rotate when their period is reached
    pub fn advance_lanes(&mut self) {
        for lane in &mut self.lanes {
            lane.advance();
        }
    }

    /// Trailing lanes that must currently be Ground
    pub fn trailing_margin(&self) -> usize {
        let margin = if self.is_early_game() {
            self.rules.safe_margin
        } else {
            match self.rules.late_margin {
                LateMargin::Off => 0,
                LateMargin::Lanes(n) => n,
            }
        };
        margin.min(self.height)
    }

    /// Force Ground on the trailing margin and, in the early game, break up
    /// vertically adjacent Water lanes by turning the upper one into Ground
    pub fn apply_corrections(&mut self) {
        let margin = self.trailing_margin();
        for y in self.height - margin..self.height {
            if self.lanes[y].kind() != LaneKind::Ground {
                self.lanes[y] = self.generator.ground();
            }
        }

        if self.is_early_game() && self.rules.no_adjacent_water_early {
            for y in 0..self.height.saturating_sub(1) {
                if self.lanes[y].kind() == LaneKind::Water && self.lanes[y + 1].kind() == LaneKind::Water {
                    self.lanes[y] = self.generator.ground();
                }
            }
        }
    }

    /// Position of the life pickup, if one is on the map
    pub fn find_pickup(&self) -> Option<IVec2> {
        self.lanes.iter().enumerate().find_map(|(y, lane)| {
            lane.cells()
                .position(|c| c == Cell::Life)
                .map(|x| IVec2::new(x as i32, y as i32))
        })
    }

    /// Drop a life pickup on the top lane if it is Ground. Returns the column used.
    pub fn place_pickup(&mut self) -> Option<i32> {
        if self.lanes.front().map(Lane::kind) != Some(LaneKind::Ground) {
            return None;
        }
        let x = self.generator.random_column() as i32;
        let lane = self.lanes.front_mut()?;
        lane.set_cell(x, Cell::Life);
        Some(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::Direction;

    fn world(seed: u64) -> World {
        World::new(&Tuning::default(), seed)
    }

    fn assert_no_adjacent_water(w: &World) {
        let kinds: Vec<_> = w.lanes().map(Lane::kind).collect();
        for pair in kinds.windows(2) {
            assert!(
                !(pair[0] == LaneKind::Water && pair[1] == LaneKind::Water),
                "adjacent water at head {}",
                w.world_head()
            );
        }
    }

    #[test]
    fn test_new_world_shape() {
        for seed in 0..20 {
            let w = world(seed);
            assert_eq!(w.lanes().count(), 20);
            assert!(w.lanes().all(|l| l.width() == 28));
            assert_eq!(w.world_head(), 0);
            for y in 17..20 {
                assert_eq!(w.lane(y).unwrap().kind(), LaneKind::Ground);
            }
            assert_no_adjacent_water(&w);
        }
    }

    #[test]
    fn test_scroll_keeps_height_and_counts_head() {
        let mut w = world(5);
        let top_before = w.lane(0).unwrap().clone();
        w.scroll_down();
        assert_eq!(w.lanes().count(), 20);
        assert_eq!(w.world_head(), 1);
        assert_eq!(w.next_position(), 21);
        // old top lane moved down one slot (unless a correction replaced it)
        let moved = w.lane(1).unwrap();
        assert!(moved == &top_before || moved.kind() == LaneKind::Ground);
    }

    #[test]
    fn test_early_game_rules_hold_across_scrolls() {
        let mut w = world(8);
        for _ in 0..29 {
            w.scroll_down();
            assert!(w.is_early_game());
            for y in 17..20 {
                assert_eq!(w.lane(y).unwrap().kind(), LaneKind::Ground);
            }
            assert_no_adjacent_water(&w);
        }
    }

    #[test]
    fn test_late_margin_shrinks() {
        let tuning = Tuning {
            early_game_threshold: 2,
            late_margin: LateMargin::Lanes(1),
            ..Tuning::default()
        };
        let mut w = World::new(&tuning, 3);
        for _ in 0..40 {
            w.scroll_down();
        }
        assert!(!w.is_early_game());
        assert_eq!(w.trailing_margin(), 1);
        assert_eq!(w.lane(19).unwrap().kind(), LaneKind::Ground);

        let off = Tuning {
            early_game_threshold: 0,
            late_margin: LateMargin::Off,
            ..Tuning::default()
        };
        let w = World::new(&off, 3);
        assert_eq!(w.trailing_margin(), 0);
    }

    #[test]
    fn test_scroll_clears_advanced_flags() {
        let mut w = world(1);
        for _ in 0..20 {
            w.advance_lanes();
        }
        w.replace_lane(
            0,
            Lane::new(LaneKind::Traffic, std::iter::repeat_n(Cell::Empty, 28), Direction::Left, 1),
        );
        w.advance_lanes();
        assert!(w.lane(0).unwrap().advanced_this_tick());
        w.scroll_down();
        assert!(w.lanes().all(|l| !l.advanced_this_tick()));
    }

    #[test]
    fn test_advance_lanes_skips_ground() {
        let mut w = world(2);
        w.replace_lane(
            5,
            Lane::new(LaneKind::Water, std::iter::repeat_n(Cell::Log, 28), Direction::Right, 1),
        );
        w.advance_lanes();
        assert!(w.lane(5).unwrap().advanced_this_tick());
        assert!(!w.lane(19).unwrap().advanced_this_tick());
    }

    #[test]
    fn test_replace_lane_rejects_wrong_width() {
        let mut w = world(2);
        let before = w.lane(4).unwrap().clone();
        w.replace_lane(4, Lane::ground(3));
        assert_eq!(w.lane(4).unwrap(), &before);
    }

    #[test]
    fn test_pickup_placement() {
        let mut w = world(4);
        w.replace_lane(0, Lane::ground(28));
        let x = w.place_pickup().unwrap();
        assert_eq!(w.find_pickup(), Some(IVec2::new(x, 0)));

        w.replace_lane(
            0,
            Lane::new(LaneKind::Traffic, std::iter::repeat_n(Cell::Empty, 28), Direction::Left, 3),
        );
        assert_eq!(w.place_pickup(), None);
        assert_eq!(w.find_pickup(), None);
    }

    #[test]
    fn test_abs_row_tracks_head() {
        let mut w = world(0);
        assert_eq!(w.abs_row(18), 18);
        w.scroll_down();
        assert_eq!(w.abs_row(18), 19);
    }
}
