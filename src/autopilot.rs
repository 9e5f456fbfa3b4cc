//! Demo-mode player
//!
//! Looks exactly one tick ahead: a cell is worth stepping onto when it is
//! safe now and will still be safe after the coming lane advance (and scroll,
//! if one is due). Greedy, but good enough to keep an attract screen alive.

use glam::IVec2;

use crate::sim::{ActorId, Cell, GamePhase, GameState, LaneKind, MoveDir, check_cell};

/// Pick the next move for `id`. `None` means stay put (or the actor cannot act).
pub fn choose_move(state: &GameState, id: ActorId) -> Option<MoveDir> {
    if state.paused || state.phase != GamePhase::Playing {
        return None;
    }
    let actor = state.actor(id).filter(|a| a.alive)?;
    let pos = actor.pos;

    if safe_next_tick(state, pos + MoveDir::Up.delta()) {
        return Some(MoveDir::Up);
    }

    // sidestep toward a column whose lane above looks passable
    let mut sides: Vec<(MoveDir, bool)> = [MoveDir::Left, MoveDir::Right]
        .into_iter()
        .map(|dir| (dir, pos + dir.delta()))
        .filter(|&(_, target)| safe_next_tick(state, target))
        .map(|(dir, target)| (dir, safe_next_tick(state, target + MoveDir::Up.delta())))
        .collect();
    // stable: Left wins ties
    sides.sort_by_key(|&(_, opens_up)| !opens_up);

    let stay_safe = safe_next_tick(state, pos);
    match sides.first() {
        Some(&(dir, true)) => Some(dir),
        Some(&(dir, false)) if !stay_safe => Some(dir),
        _ if stay_safe => None,
        _ => safe_next_tick(state, pos + MoveDir::Down.delta()).then_some(MoveDir::Down),
    }
}

/// Would an actor standing on `pos` right now survive the next tick?
fn safe_next_tick(state: &GameState, pos: IVec2) -> bool {
    let world = &state.world;
    if check_cell(world, pos).is_fatal() {
        return false;
    }
    let scroll_due = state.scroll_timer + 1 >= state.tuning.scroll_interval_ticks;
    if scroll_due && pos.y + 1 >= world.height() as i32 {
        return false;
    }
    let Some(lane) = world.lane(pos.y) else {
        return false;
    };
    match lane.kind() {
        LaneKind::Ground => true,
        LaneKind::Traffic => lane.cell_after_advance(pos.x) == Cell::Empty,
        // riders move with their log
        LaneKind::Water => lane.cell(pos.x) == Cell::Log,
    }
}
