//! Game state and core simulation types
//!
//! Everything one run needs lives on [`GameState`]; there is no hidden
//! process-wide state, so any number of simulations can run side by side.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, PLAYER_ONE, PLAYER_TWO};
use super::collision::Collision;
use super::lane::{Cell, LaneKind};
use super::world::World;
use crate::highscores::ScoreEntry;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen after a non-final death (single-player)
    Respawning,
    /// Run ended
    GameOver,
}

/// Notable things that happened, drained by the driver each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Scrolled { world_head: u64 },
    Scored { actor: ActorId, score: u32 },
    Died { actor: ActorId, cause: Collision },
    Respawning { lives_left: u8 },
    Respawned,
    LifeCollected { lives: u8 },
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Sanitized balance in effect for this run
    pub tuning: Tuning,
    pub world: World,
    /// Player one and player two; only the first is active in single-player
    pub actors: [Actor; 2],
    pub two_player: bool,
    pub phase: GamePhase,
    pub paused: bool,
    /// Single-player lives (unused in two-player)
    pub lives: u8,
    /// Seconds left in the respawn freeze
    pub respawn_timer: f32,
    /// Ticks since the last scroll
    pub scroll_timer: u32,
    /// Scrolls since the last life pickup was placed
    pub scrolls_since_pickup: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// New run with default balance on a grid `width` columns wide
    pub fn with_width(width: usize, seed: u64) -> Self {
        Self::with_tuning(Tuning::with_width(width), seed)
    }

    /// New run with custom balance
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let world = World::new(&tuning, seed);
        let spawn = IVec2::new(tuning.spawn_col() as i32, tuning.spawn_row() as i32);

        let primary = Actor::spawn(spawn, world.world_head());
        let mut secondary = primary.clone();
        secondary.alive = false;

        log::info!(
            "New run: seed={} grid={}x{} lives={}",
            seed,
            tuning.width,
            tuning.height,
            tuning.starting_lives
        );

        Self {
            seed,
            lives: tuning.starting_lives,
            tuning,
            world,
            actors: [primary, secondary],
            two_player: false,
            phase: GamePhase::Playing,
            paused: false,
            respawn_timer: 0.0,
            scroll_timer: 0,
            scrolls_since_pickup: 0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Tear down and start over with the same balance and player mode
    pub fn reset(&mut self) {
        let seed = self.world.generator_mut().next_seed();
        let two_player = self.two_player;
        *self = Self::with_tuning(self.tuning.clone(), seed);
        self.set_two_player(two_player);
    }

    /// Switch between one and two actors. Enabling copies player one's
    /// position and progress anchor onto player two with a zero score.
    pub fn set_two_player(&mut self, enabled: bool) {
        if enabled == self.two_player {
            return;
        }
        if self.phase == GamePhase::GameOver {
            log::info!("Ignoring player-mode switch after game over");
            return;
        }
        self.two_player = enabled;

        if enabled {
            // lives/respawn and pickups are single-player only
            if self.phase == GamePhase::Respawning {
                self.finish_respawn();
            }
            if let Some(pos) = self.world.find_pickup() {
                if let Some(lane) = self.world.lane_mut(pos.y) {
                    lane.set_cell(pos.x, Cell::Empty);
                }
            }
            self.actors[PLAYER_TWO] = Actor {
                score: 0,
                advanced_this_tick: false,
                ..self.actors[PLAYER_ONE].clone()
            };
            log::info!("Two-player mode enabled");
        } else {
            self.actors[PLAYER_TWO].alive = false;
            log::info!("Two-player mode disabled");
            self.update_game_over();
        }
    }

    /// Number of actors taking part
    pub fn active_actors(&self) -> usize {
        if self.two_player { 2 } else { 1 }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors[..self.active_actors()].get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let n = self.active_actors();
        self.actors[..n].get_mut(id)
    }

    pub fn get_position(&self, id: ActorId) -> Option<IVec2> {
        self.actor(id).map(|a| a.pos)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actor(id).is_some_and(|a| a.alive)
    }

    pub fn get_score(&self, id: ActorId) -> Option<u32> {
        self.actor(id).map(|a| a.score)
    }

    pub fn get_lives(&self) -> u8 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Two-player reporting: the higher score wins, ties have no winner
    pub fn winner(&self) -> Option<ActorId> {
        if !self.two_player {
            return None;
        }
        let (a, b) = (self.actors[PLAYER_ONE].score, self.actors[PLAYER_TWO].score);
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(PLAYER_ONE),
            std::cmp::Ordering::Less => Some(PLAYER_TWO),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Score-table entry for an actor's result
    pub fn result_entry(&self, id: ActorId, name: &str) -> Option<ScoreEntry> {
        self.get_score(id).map(|score| ScoreEntry::new(name, score))
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Default spawn cell
    pub fn spawn_pos(&self) -> IVec2 {
        IVec2::new(self.tuning.spawn_col() as i32, self.tuning.spawn_row() as i32)
    }

    /// Spawn cell on a Ground lane: the default row if it is Ground, else the
    /// nearest Ground row below, then above. If the map has none, the spawn
    /// lane is turned into Ground.
    pub fn safe_spawn_pos(&mut self) -> IVec2 {
        let preferred = self.spawn_pos();
        let height = self.world.height() as i32;
        let is_ground = |world: &World, y: i32| world.lane(y).is_some_and(|l| l.kind() == LaneKind::Ground);

        let row = (preferred.y..height)
            .chain((0..preferred.y).rev())
            .find(|&y| is_ground(&self.world, y));

        match row {
            Some(y) => IVec2::new(preferred.x, y),
            None => {
                let ground = self.world.generator_mut().ground();
                self.world.replace_lane(preferred.y as usize, ground);
                preferred
            }
        }
    }

    /// Enter the respawn freeze: actor goes back to a safe cell with a fresh progress anchor
    pub(crate) fn begin_respawn(&mut self) {
        let pos = self.safe_spawn_pos();
        let head = self.world.world_head();
        let actor = &mut self.actors[PLAYER_ONE];
        actor.pos = pos;
        actor.advanced_this_tick = false;
        actor.reset_anchor(head);

        self.phase = GamePhase::Respawning;
        self.respawn_timer = self.tuning.respawn_seconds;
        self.events.push(GameEvent::Respawning { lives_left: self.lives });
        log::info!("Respawning ({} lives left)", self.lives);
    }

    /// Leave the respawn freeze, re-anchoring progress on the current row
    pub(crate) fn finish_respawn(&mut self) {
        let head = self.world.world_head();
        self.actors[PLAYER_ONE].reset_anchor(head);
        self.respawn_timer = 0.0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Respawned);
        log::info!("Respawned");
    }

    /// Enter GameOver once every active actor is dead
    pub(crate) fn update_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if self.actors[..self.active_actors()].iter().all(|a| !a.alive) {
            self.enter_game_over();
        }
    }

    pub(crate) fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!(
            "Game over: scores {:?}",
            self.actors[..self.active_actors()].iter().map(|a| a.score).collect::<Vec<_>>()
        );
    }
}
