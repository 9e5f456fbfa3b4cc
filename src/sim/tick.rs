//! Fixed timestep simulation tick
//!
//! One tick: optional scroll (every `scroll_interval_ticks`), then lane
//! advancement with log carry, then collision checks. Player input arrives
//! between ticks through [`handle_move`].

use glam::IVec2;

use super::actor::{ActorId, MoveDir};
use super::collision::{Collision, check_cell};
use super::lane::{Cell, Direction, LaneKind};
use super::state::{GameEvent, GamePhase, GameState};

/// Advance the game state by one fixed timestep (`dt` seconds of wall-clock time)
pub fn tick(state: &mut GameState, dt: f32) {
    if state.paused || state.phase == GamePhase::GameOver {
        return;
    }

    if state.phase == GamePhase::Respawning {
        state.respawn_timer -= dt;
        if state.respawn_timer <= 0.0 {
            state.finish_respawn();
        }
        return;
    }

    state.time_ticks += 1;

    state.scroll_timer += 1;
    if state.scroll_timer >= state.tuning.scroll_interval_ticks {
        state.scroll_timer = 0;
        scroll(state);
    }

    if state.phase == GamePhase::Playing {
        advance_and_resolve(state);
    }

    for actor in &mut state.actors {
        actor.advanced_this_tick = false;
    }
}

/// One discrete move for one actor. Unknown actors, dead actors, and moves
/// while paused, respawning or after game over are ignored.
pub fn handle_move(state: &mut GameState, id: ActorId, dir: MoveDir) {
    if state.paused || state.phase != GamePhase::Playing {
        return;
    }
    let (width, height) = (state.world.width(), state.world.height());
    let head = state.world.world_head();

    let Some(actor) = state.actor_mut(id) else {
        return;
    };
    if !actor.alive {
        return;
    }
    // one upward step per actor per tick
    if dir == MoveDir::Up && actor.advanced_this_tick {
        return;
    }
    let before = actor.pos;
    if !actor.step(dir, width, height) {
        return;
    }
    let pos = actor.pos;

    let collision = check_cell(&state.world, pos);
    if collision.is_fatal() {
        kill(state, id, collision, before);
        return;
    }

    let actor = &mut state.actors[id];
    if dir == MoveDir::Up {
        actor.advanced_this_tick = true;
    }
    if actor.record_progress(head) {
        let score = actor.score;
        state.events.push(GameEvent::Scored { actor: id, score });
    }

    collect_pickup(state, pos);
}

/// Driver-requested end of run. Idempotent.
pub fn end_game(state: &mut GameState) {
    state.enter_game_over();
}

/// While paused, ticks and moves are ignored
pub fn set_paused(state: &mut GameState, paused: bool) {
    if state.paused != paused {
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }
    state.paused = paused;
}

/// Retire the bottom lane and push every living actor down with the map
fn scroll(state: &mut GameState) {
    let old_head = state.world.world_head();
    state.world.scroll_down();
    state.events.push(GameEvent::Scrolled {
        world_head: state.world.world_head(),
    });

    for id in 0..state.active_actors() {
        if !state.actors[id].alive || state.phase != GamePhase::Playing {
            continue;
        }
        let before = state.actors[id].pos;
        state.actors[id].rebase_for_scroll(old_head);
        let collision = check_cell(&state.world, state.actors[id].pos);
        if collision.is_fatal() {
            kill(state, id, collision, before);
        }
    }

    maybe_spawn_pickup(state);
}

/// Rotate lanes, carry log riders, then check every living actor
fn advance_and_resolve(state: &mut GameState) {
    // decided before rotation: the log under the actor is about to move
    let carries: Vec<Option<Direction>> = (0..state.active_actors())
        .map(|id| {
            let actor = &state.actors[id];
            if !actor.alive {
                return None;
            }
            let lane = state.world.lane(actor.pos.y)?;
            let riding = lane.kind() == LaneKind::Water && lane.cell(actor.pos.x) == Cell::Log;
            (riding && lane.will_advance()).then(|| lane.direction())
        })
        .collect();

    state.world.advance_lanes();

    let width = state.world.width();
    for (id, carry) in carries.into_iter().enumerate() {
        if !state.actors[id].alive || state.phase != GamePhase::Playing {
            continue;
        }
        let before = state.actors[id].pos;
        if let Some(dir) = carry {
            state.actors[id].carry(dir, width);
        }
        let collision = check_cell(&state.world, state.actors[id].pos);
        if collision.is_fatal() {
            kill(state, id, collision, before);
        }
    }
}

/// Handle a fatal collision: roll the actor back to `restore`, then respawn
/// (single-player with lives to spare) or mark it dead
fn kill(state: &mut GameState, id: ActorId, cause: Collision, restore: IVec2) {
    state.actors[id].pos = restore;
    state.events.push(GameEvent::Died { actor: id, cause });
    log::info!("Actor {id} died: {cause:?} at {restore}");

    if !state.two_player && state.lives > 1 {
        state.lives -= 1;
        state.begin_respawn();
        return;
    }

    state.actors[id].alive = false;
    if !state.two_player {
        state.lives = 0;
    }
    state.update_game_over();
}

fn collect_pickup(state: &mut GameState, pos: IVec2) {
    if state.two_player {
        return;
    }
    let Some(lane) = state.world.lane_mut(pos.y) else {
        return;
    };
    if lane.cell(pos.x) != Cell::Life {
        return;
    }
    lane.set_cell(pos.x, Cell::Empty);
    state.lives = state.lives.saturating_add(1).min(state.tuning.max_lives);
    state.events.push(GameEvent::LifeCollected { lives: state.lives });
    log::info!("Life collected ({} lives)", state.lives);
}

fn maybe_spawn_pickup(state: &mut GameState) {
    if state.two_player {
        return;
    }
    state.scrolls_since_pickup += 1;
    if state.scrolls_since_pickup < state.tuning.pickup_interval_scrolls {
        return;
    }
    if state.world.find_pickup().is_some() {
        return;
    }
    if let Some(x) = state.world.place_pickup() {
        state.scrolls_since_pickup = 0;
        log::debug!("Life pickup placed at column {x}");
    }
}
