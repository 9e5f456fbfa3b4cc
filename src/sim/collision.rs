//! Collision rules for a grid position
//!
//! Ground is always safe, a vehicle under the actor is fatal, and on a river
//! anything but a log is fatal, with one exception: a Right-moving river that
//! rotated this tick does not drown an actor in its last column. A log that
//! just wrapped off the right edge must not kill its rider.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::lane::{Cell, Direction, Lane, LaneKind};
use super::world::World;

/// Outcome of checking a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Safe,
    OutOfBounds,
    Vehicle,
    Drowned,
}

impl Collision {
    pub fn is_fatal(self) -> bool {
        self != Collision::Safe
    }
}

/// Check what standing on `pos` means right now
pub fn check_cell(world: &World, pos: IVec2) -> Collision {
    if !world.in_bounds(pos) {
        return Collision::OutOfBounds;
    }
    match world.lane(pos.y) {
        Some(lane) => check_lane(lane, pos.x, world.width()),
        None => Collision::OutOfBounds,
    }
}

fn check_lane(lane: &Lane, x: i32, width: usize) -> Collision {
    match lane.kind() {
        LaneKind::Ground => Collision::Safe,
        LaneKind::Traffic => {
            if lane.cell(x) == Cell::Empty {
                Collision::Safe
            } else {
                Collision::Vehicle
            }
        }
        LaneKind::Water => {
            if lane.cell(x) == Cell::Log || right_edge_exception(lane, x, width) {
                Collision::Safe
            } else {
                Collision::Drowned
            }
        }
    }
}

fn right_edge_exception(lane: &Lane, x: i32, width: usize) -> bool {
    lane.advanced_this_tick() && lane.direction() == Direction::Right && x == width as i32 - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn world_with(y: usize, lane: Lane) -> World {
        let tuning = Tuning {
            width: 6,
            height: 4,
            ..Tuning::default()
        };
        let mut world = World::new(&tuning, 1);
        world.replace_lane(y, lane);
        world
    }

    #[test]
    fn test_out_of_bounds() {
        let world = world_with(0, Lane::ground(6));
        assert_eq!(check_cell(&world, IVec2::new(-1, 0)), Collision::OutOfBounds);
        assert_eq!(check_cell(&world, IVec2::new(6, 0)), Collision::OutOfBounds);
        assert_eq!(check_cell(&world, IVec2::new(0, 4)), Collision::OutOfBounds);
        assert_eq!(check_cell(&world, IVec2::new(0, -1)), Collision::OutOfBounds);
    }

    #[test]
    fn test_ground_is_safe() {
        let world = world_with(1, Lane::ground(6));
        for x in 0..6 {
            assert_eq!(check_cell(&world, IVec2::new(x, 1)), Collision::Safe);
        }
    }

    #[test]
    fn test_traffic() {
        let lane = Lane::from_pattern(LaneKind::Traffic, "==....", Direction::Left, 3);
        let world = world_with(0, lane);
        assert_eq!(check_cell(&world, IVec2::new(1, 0)), Collision::Vehicle);
        assert_eq!(check_cell(&world, IVec2::new(2, 0)), Collision::Safe);
    }

    #[test]
    fn test_water() {
        let lane = Lane::from_pattern(LaneKind::Water, "~~....", Direction::Left, 3);
        let world = world_with(0, lane);
        assert_eq!(check_cell(&world, IVec2::new(0, 0)), Collision::Safe);
        assert_eq!(check_cell(&world, IVec2::new(3, 0)), Collision::Drowned);
        assert!(check_cell(&world, IVec2::new(5, 0)).is_fatal());
    }

    #[test]
    fn test_right_edge_exception_only_after_right_rotation() {
        // log at the last column wraps to column 0 on rotation
        let mut lane = Lane::from_pattern(LaneKind::Water, ".....~", Direction::Right, 1);
        lane.advance();
        assert!(lane.advanced_this_tick());
        assert_eq!(lane.cell(5), Cell::Empty);
        let world = world_with(0, lane);
        assert_eq!(check_cell(&world, IVec2::new(5, 0)), Collision::Safe);
        assert_eq!(check_cell(&world, IVec2::new(4, 0)), Collision::Drowned);

        // same shape, not rotated this tick
        let lane = Lane::from_pattern(LaneKind::Water, "~.....", Direction::Right, 1);
        let world = world_with(0, lane);
        assert_eq!(check_cell(&world, IVec2::new(5, 0)), Collision::Drowned);

        // left-moving lane never gets the exception
        let mut lane = Lane::from_pattern(LaneKind::Water, ".~....", Direction::Left, 1);
        lane.advance();
        assert!(lane.advanced_this_tick());
        let world = world_with(0, lane);
        assert_eq!(check_cell(&world, IVec2::new(0, 0)), Collision::Safe);
        assert_eq!(check_cell(&world, IVec2::new(5, 0)), Collision::Drowned);
    }
}
