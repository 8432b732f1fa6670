//! Point-and-click movement.
//!
//! A click is resolved into a full shortest path, but only the first step of
//! that path is ever taken: a push changes which cells are open, so the rest
//! of the path is recomputed on the next click.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::game::{Direction, Level, Position};

/// Breadth-first shortest path from `from` to `to` through open cells
/// (no walls, no boxes).
///
/// Neighbours are expanded Up, Down, Left, Right, so the path returned for a
/// given level state is always the same. Returns an empty path when
/// `from == to` and `None` when `to` is blocked or cut off.
pub fn shortest_path(level: &Level, from: Position, to: Position) -> Option<Vec<Direction>> {
    if from == to {
        return Some(Vec::new());
    }
    if !level.is_open(to) {
        return None;
    }

    let mut visited = HashSet::new();
    let mut parents: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut queue = VecDeque::new();

    visited.insert(from);
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            return Some(unwind_path(&parents, from, to));
        }

        for (dir, next) in pos.neighbors() {
            if level.is_open(next) && visited.insert(next) {
                parents.insert(next, (pos, dir));
                queue.push_back(next);
            }
        }
    }

    None
}

fn unwind_path(
    parents: &HashMap<Position, (Position, Direction)>,
    from: Position,
    to: Position,
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut pos = to;
    while pos != from {
        let (prev, dir) = parents[&pos];
        path.push(dir);
        pos = prev;
    }
    path.reverse();
    path
}

fn first_step(level: &Level, to: Position) -> Option<Direction> {
    shortest_path(level, level.player(), to)?.first().copied()
}

impl Level {
    /// Work out which single step a click on `target` asks for, if any.
    ///
    /// - Clicking the player, a wall or anything off the grid does nothing.
    /// - Clicking a box next to the player pushes it.
    /// - Clicking a distant box walks towards a free side of the box. Sides
    ///   are checked Up, Down, Left, Right; a free side the player cannot
    ///   reach is skipped rather than ending the search, so the first
    ///   reachable free side wins.
    /// - Clicking any other cell walks towards it.
    pub fn resolve_click(&self, target: Position) -> Option<Direction> {
        if self.is_won() || target == self.player() || self.is_wall_at(target) {
            return None;
        }

        if self.has_box_at(target) {
            if let Some(dir) = self.player().direction_to(target) {
                return Some(dir);
            }
            return target
                .neighbors()
                .into_iter()
                .filter(|&(_, side)| self.is_open(side))
                .find_map(|(_, side)| first_step(self, side));
        }

        first_step(self, target)
    }

    /// Handle a click on cell `(x, y)`: at most one [`Level::try_move`].
    ///
    /// Returns whether the player moved.
    pub fn handle_click(&mut self, x: i32, y: i32) -> bool {
        let target = Position::new(x, y);
        match self.resolve_click(target) {
            Some(dir) => {
                trace!(%target, %dir, "click resolved");
                self.try_move(dir)
            }
            None => {
                trace!(%target, "click ignored");
                false
            }
        }
    }
}
