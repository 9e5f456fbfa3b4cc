//! Player-controlled actors
//!
//! Progress is measured in absolute rows (`world_head + y`): smaller is
//! further up the world. A point is scored only for a manual step onto an
//! absolute row better than anything reached before.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::lane::Direction;

/// Index into [`crate::sim::GameState::actors`]
pub type ActorId = usize;

pub const PLAYER_ONE: ActorId = 0;
pub const PLAYER_TWO: ActorId = 1;

/// Discrete move command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right];

    /// Grid delta; Up decreases y
    pub fn delta(self) -> IVec2 {
        match self {
            MoveDir::Up => IVec2::new(0, -1),
            MoveDir::Down => IVec2::new(0, 1),
            MoveDir::Left => IVec2::new(-1, 0),
            MoveDir::Right => IVec2::new(1, 0),
        }
    }

    /// Keyboard mapping: WASD drives player one, IJKL player two.
    /// Unrecognized keys map to `None`.
    pub fn from_key(key: char) -> Option<(ActorId, MoveDir)> {
        match key.to_ascii_uppercase() {
            'W' => Some((PLAYER_ONE, MoveDir::Up)),
            'S' => Some((PLAYER_ONE, MoveDir::Down)),
            'A' => Some((PLAYER_ONE, MoveDir::Left)),
            'D' => Some((PLAYER_ONE, MoveDir::Right)),
            'I' => Some((PLAYER_TWO, MoveDir::Up)),
            'K' => Some((PLAYER_TWO, MoveDir::Down)),
            'J' => Some((PLAYER_TWO, MoveDir::Left)),
            'L' => Some((PLAYER_TWO, MoveDir::Right)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: IVec2,
    pub alive: bool,
    pub score: u32,
    /// Best (smallest) absolute row ever reached
    pub best_abs_row: i64,
    /// Absolute row after the last manual move
    pub last_abs_row: i64,
    /// Moved toward the leading edge by player input this tick
    pub advanced_this_tick: bool,
}

impl Actor {
    /// Fresh actor at `pos` with the progress anchor on its own row
    pub fn spawn(pos: IVec2, world_head: u64) -> Self {
        let abs = world_head as i64 + i64::from(pos.y);
        Self {
            pos,
            alive: true,
            score: 0,
            best_abs_row: abs,
            last_abs_row: abs,
            advanced_this_tick: false,
        }
    }

    pub fn abs_row(&self, world_head: u64) -> i64 {
        world_head as i64 + i64::from(self.pos.y)
    }

    /// One clamped step. Returns false when the grid edge blocks the move.
    pub fn step(&mut self, dir: MoveDir, width: usize, height: usize) -> bool {
        let target = self.pos + dir.delta();
        let max = IVec2::new(width as i32 - 1, height as i32 - 1);
        let clamped = target.clamp(IVec2::ZERO, max.max(IVec2::ZERO));
        if clamped == self.pos {
            return false;
        }
        self.pos = clamped;
        true
    }

    /// Ride a log one column, wrapping around the lane edges
    pub fn carry(&mut self, dir: Direction, width: usize) {
        if width == 0 {
            return;
        }
        self.pos.x = (self.pos.x + dir.dx()).rem_euclid(width as i32);
    }

    /// Apply the scoring rule after a successful manual move. Returns whether a point was scored.
    pub fn record_progress(&mut self, world_head: u64) -> bool {
        let abs_now = self.abs_row(world_head);
        self.last_abs_row = abs_now;
        if self.advanced_this_tick && abs_now < self.best_abs_row {
            self.best_abs_row = abs_now;
            self.score += 1;
            return true;
        }
        false
    }

    /// The map rose one lane: push the actor down and shift its bookkeeping by
    /// the same amount its absolute row moved, so no points change hands
    pub fn rebase_for_scroll(&mut self, old_head: u64) {
        let before = self.abs_row(old_head);
        self.pos.y += 1;
        let shift = self.abs_row(old_head + 1) - before;
        self.best_abs_row += shift;
        self.last_abs_row += shift;
    }

    /// Anchor progress on the current row (respawn)
    pub fn reset_anchor(&mut self, world_head: u64) {
        let abs = self.abs_row(world_head);
        self.best_abs_row = abs;
        self.last_abs_row = abs;
    }
}
