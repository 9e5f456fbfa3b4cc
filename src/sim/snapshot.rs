//! Render-ready read-out of a [`GameState`]
//!
//! Drivers never reach into the simulation internals to draw a frame; they
//! take a [`Snapshot`] and either serialize it or turn it into text.

use glam::IVec2;
use serde::Serialize;

use super::actor::{ActorId, PLAYER_ONE};
use super::lane::{Cell, Direction, LaneKind};
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneView {
    pub kind: LaneKind,
    pub direction: Direction,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub id: ActorId,
    pub pos: IVec2,
    pub alive: bool,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub world_head: u64,
    /// Top lane first
    pub lanes: Vec<LaneView>,
    pub actors: Vec<ActorView>,
    pub phase: GamePhase,
    pub lives: u8,
    pub respawn_timer: f32,
    pub two_player: bool,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let lanes = self
            .world
            .lanes()
            .map(|lane| LaneView {
                kind: lane.kind(),
                direction: lane.direction(),
                cells: lane.cells().collect(),
            })
            .collect();

        let actors = self.actors[..self.active_actors()]
            .iter()
            .enumerate()
            .map(|(id, a)| ActorView {
                id,
                pos: a.pos,
                alive: a.alive,
                score: a.score,
            })
            .collect();

        Snapshot {
            width: self.world.width(),
            height: self.world.height(),
            world_head: self.world.world_head(),
            lanes,
            actors,
            phase: self.phase,
            lives: self.lives,
            respawn_timer: self.respawn_timer,
            two_player: self.two_player,
        }
    }
}

fn cell_glyph(kind: LaneKind, cell: Cell) -> char {
    match (kind, cell) {
        (_, Cell::Vehicle) => '=',
        (_, Cell::Log) => '~',
        (_, Cell::Life) => '+',
        (LaneKind::Ground, Cell::Empty) => ' ',
        (LaneKind::Traffic, Cell::Empty) => '-',
        (LaneKind::Water, Cell::Empty) => '.',
    }
}

fn actor_glyph(id: ActorId) -> char {
    if id == PLAYER_ONE { 'O' } else { 'P' }
}

impl Snapshot {
    /// Bordered ASCII frame followed by a one-line HUD
    pub fn to_text(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .lanes
            .iter()
            .map(|lane| lane.cells.iter().map(|&c| cell_glyph(lane.kind, c)).collect())
            .collect();

        // dead actors are not drawn
        for actor in self.actors.iter().filter(|a| a.alive) {
            let (Ok(x), Ok(y)) = (usize::try_from(actor.pos.x), usize::try_from(actor.pos.y)) else {
                continue;
            };
            if let Some(slot) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *slot = actor_glyph(actor.id);
            }
        }

        let border: String = "#".repeat(self.width + 2);
        let mut out = String::with_capacity((self.width + 3) * (self.height + 3));
        out.push_str(&border);
        out.push('\n');
        for row in rows {
            out.push('#');
            out.extend(row);
            out.push('#');
            out.push('\n');
        }
        out.push_str(&border);
        out.push('\n');
        out.push_str(&self.hud());
        out
    }

    fn hud(&self) -> String {
        let scores = self
            .actors
            .iter()
            .map(|a| format!("P{} {}{}", a.id + 1, a.score, if a.alive { "" } else { " (out)" }))
            .collect::<Vec<_>>()
            .join("  ");

        let status = match self.phase {
            GamePhase::Playing => String::new(),
            GamePhase::Respawning => format!("  respawn in {:.1}s", self.respawn_timer.max(0.0)),
            GamePhase::GameOver => "  GAME OVER".to_string(),
        };

        if self.two_player {
            format!("{scores}  lane {}{status}", self.world_head)
        } else {
            format!("{scores}  lives {}  lane {}{status}", self.lives, self.world_head)
        }
    }
}
