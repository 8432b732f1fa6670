use std::collections::{HashSet, VecDeque};

use crate::game::Position;

/// Flood fill from `start` over every in-bounds cell that is not a wall.
///
/// Boxes are ignored on purpose: the result separates the structural floor
/// from the decorative exterior and never changes during play. `start` is
/// always part of the result; if it is a wall or off the grid the fill
/// stops there.
pub fn flood_fill(
    width: i32,
    height: i32,
    walls: &HashSet<Position>,
    start: Position,
) -> HashSet<Position> {
    let is_open = |pos: Position| {
        pos.x >= 0 && pos.y >= 0 && pos.x < width && pos.y < height && !walls.contains(&pos)
    };

    let mut reachable = HashSet::new();
    let mut queue = VecDeque::new();

    reachable.insert(start);
    if is_open(start) {
        queue.push_back(start);
    }

    while let Some(pos) = queue.pop_front() {
        for (_, next) in pos.neighbors() {
            if is_open(next) && reachable.insert(next) {
                queue.push_back(next);
            }
        }
    }

    reachable
}
