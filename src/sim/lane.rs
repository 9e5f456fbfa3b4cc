//! One row of the play grid
//!
//! A lane is a fixed-width ring of cells that rotates one step in its
//! direction every `advance_period` ticks. Ground lanes never rotate and never
//! hold obstacles.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Row type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    /// Safe ground (grass)
    Ground,
    /// Road with vehicles
    Traffic,
    /// River with floating logs
    Water,
}

impl LaneKind {
    /// Obstacle cell that populates this kind of lane
    pub fn obstacle(self) -> Option<Cell> {
        match self {
            LaneKind::Ground => None,
            LaneKind::Traffic => Some(Cell::Vehicle),
            LaneKind::Water => Some(Cell::Log),
        }
    }
}

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Vehicle,
    Log,
    /// Extra-life pickup (only ever placed on Ground)
    Life,
}

impl Cell {
    pub fn is_obstacle(self) -> bool {
        matches!(self, Cell::Vehicle | Cell::Log)
    }
}

/// Rotation direction of a moving lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta of one step
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    kind: LaneKind,
    cells: VecDeque<Cell>,
    direction: Direction,
    advance_period: u32,
    advance_counter: u32,
    advanced_this_tick: bool,
}

impl Lane {
    /// Build a lane from its cells. Ground lanes are scrubbed of obstacles.
    pub fn new(
        kind: LaneKind,
        cells: impl IntoIterator<Item = Cell>,
        direction: Direction,
        advance_period: u32,
    ) -> Self {
        let mut cells: VecDeque<Cell> = cells.into_iter().collect();
        if kind == LaneKind::Ground {
            for cell in cells.iter_mut().filter(|c| c.is_obstacle()) {
                *cell = Cell::Empty;
            }
        }
        Self {
            kind,
            cells,
            direction,
            advance_period: advance_period.max(1),
            advance_counter: 0,
            advanced_this_tick: false,
        }
    }

    /// All-empty Ground lane
    pub fn ground(width: usize) -> Self {
        Self::new(
            LaneKind::Ground,
            std::iter::repeat_n(Cell::Empty, width),
            Direction::Right,
            1,
        )
    }

    /// Test helper: `=` vehicle, `~` log, `+` life, anything else empty
    #[cfg(test)]
    pub(crate) fn from_pattern(kind: LaneKind, pattern: &str, direction: Direction, period: u32) -> Self {
        let cells = pattern.chars().map(|c| match c {
            '=' => Cell::Vehicle,
            '~' => Cell::Log,
            '+' => Cell::Life,
            _ => Cell::Empty,
        });
        Self::new(kind, cells, direction, period)
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn advance_period(&self) -> u32 {
        self.advance_period
    }

    pub fn advance_counter(&self) -> u32 {
        self.advance_counter
    }

    /// True only for the tick in which the lane rotated
    pub fn advanced_this_tick(&self) -> bool {
        self.advanced_this_tick
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Cell at column `x`; out-of-range columns read as Empty
    pub fn cell(&self, x: i32) -> Cell {
        usize::try_from(x)
            .ok()
            .and_then(|x| self.cells.get(x).copied())
            .unwrap_or_default()
    }

    /// Overwrite a cell. Out-of-range writes and obstacles on Ground are ignored.
    pub fn set_cell(&mut self, x: i32, cell: Cell) {
        if self.kind == LaneKind::Ground && cell.is_obstacle() {
            return;
        }
        if let Some(slot) = usize::try_from(x).ok().and_then(|x| self.cells.get_mut(x)) {
            *slot = cell;
        }
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn is_moving(&self) -> bool {
        self.kind != LaneKind::Ground
    }

    /// Whether the next [`Lane::advance`] call will rotate the lane
    pub fn will_advance(&self) -> bool {
        self.is_moving() && self.advance_counter + 1 >= self.advance_period
    }

    /// Count one tick; rotate when the period is reached. Returns whether it rotated.
    pub fn advance(&mut self) -> bool {
        if !self.is_moving() {
            self.advanced_this_tick = false;
            return false;
        }
        self.advance_counter += 1;
        if self.advance_counter >= self.advance_period {
            self.advance_counter = 0;
            self.rotate();
            self.advanced_this_tick = true;
        } else {
            self.advanced_this_tick = false;
        }
        self.advanced_this_tick
    }

    /// Shift every cell one column in the lane direction, wrapping at the edges
    pub fn rotate(&mut self) {
        if self.cells.len() <= 1 {
            return;
        }
        match self.direction {
            Direction::Left => self.cells.rotate_left(1),
            Direction::Right => self.cells.rotate_right(1),
        }
    }

    pub fn clear_advanced(&mut self) {
        self.advanced_this_tick = false;
    }

    /// What column `x` will hold after the next advance
    pub fn cell_after_advance(&self, x: i32) -> Cell {
        if !self.will_advance() {
            return self.cell(x);
        }
        let w = self.cells.len() as i32;
        if w == 0 {
            return Cell::Empty;
        }
        self.cell((x - self.direction.dx()).rem_euclid(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(lane: &Lane) -> String {
        lane.cells()
            .map(|c| match c {
                Cell::Empty => '.',
                Cell::Vehicle => '=',
                Cell::Log => '~',
                Cell::Life => '+',
            })
            .collect()
    }

    #[test]
    fn test_rotate_right_moves_last_to_front() {
        let mut lane = Lane::from_pattern(LaneKind::Traffic, "=....=", Direction::Right, 1);
        lane.rotate();
        assert_eq!(pattern(&lane), "==....");
    }

    #[test]
    fn test_rotate_left_moves_first_to_back() {
        let mut lane = Lane::from_pattern(LaneKind::Water, "~~...", Direction::Left, 1);
        lane.rotate();
        assert_eq!(pattern(&lane), "~...~");
    }

    #[test]
    fn test_advance_respects_period() {
        let mut lane = Lane::from_pattern(LaneKind::Traffic, "=...", Direction::Right, 3);
        assert!(!lane.will_advance());
        assert!(!lane.advance());
        assert!(!lane.advanced_this_tick());
        assert!(!lane.advance());
        assert!(lane.will_advance());
        assert!(lane.advance());
        assert!(lane.advanced_this_tick());
        assert_eq!(lane.advance_counter(), 0);
        assert_eq!(pattern(&lane), ".=..");

        assert!(!lane.advance());
        assert!(!lane.advanced_this_tick());
    }

    #[test]
    fn test_ground_never_advances() {
        let mut lane = Lane::ground(5);
        for _ in 0..10 {
            assert!(!lane.will_advance());
            assert!(!lane.advance());
        }
        assert_eq!(lane.count(Cell::Empty), 5);
    }

    #[test]
    fn test_ground_scrubs_obstacles() {
        let mut lane = Lane::from_pattern(LaneKind::Ground, "=~+.", Direction::Left, 2);
        assert_eq!(pattern(&lane), "..+.");
        lane.set_cell(0, Cell::Vehicle);
        assert_eq!(lane.cell(0), Cell::Empty);
    }

    #[test]
    fn test_cell_out_of_range_reads_empty() {
        let lane = Lane::from_pattern(LaneKind::Traffic, "===", Direction::Left, 1);
        assert_eq!(lane.cell(-1), Cell::Empty);
        assert_eq!(lane.cell(3), Cell::Empty);
        assert_eq!(lane.cell(2), Cell::Vehicle);
    }

    #[test]
    fn test_cell_after_advance_predicts_rotation() {
        let lane = Lane::from_pattern(LaneKind::Traffic, "=...", Direction::Right, 1);
        assert_eq!(lane.cell_after_advance(1), Cell::Vehicle);
        assert_eq!(lane.cell_after_advance(0), Cell::Empty);

        let lane = Lane::from_pattern(LaneKind::Water, "~...", Direction::Left, 1);
        assert_eq!(lane.cell_after_advance(3), Cell::Log);

        let slow = Lane::from_pattern(LaneKind::Water, "~...", Direction::Left, 5);
        assert_eq!(slow.cell_after_advance(0), Cell::Log);
    }
}
