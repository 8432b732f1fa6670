use std::collections::HashSet;
use std::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use crate::legend::{Legend, Role};
use crate::reachability::flood_fill;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Canonical neighbour order. Flood fill, BFS expansion and the box-approach
/// fallback all enumerate directions in this order.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// A grid cell. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The cell one step away in `direction`. May leave the grid.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours in canonical order.
    pub fn neighbors(self) -> ArrayVec<(Direction, Position), 4> {
        ALL_DIRECTIONS
            .iter()
            .map(|&dir| (dir, self.step(dir)))
            .collect()
    }

    /// Direction from `self` to `other` if the two cells are orthogonally adjacent.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        self.neighbors()
            .into_iter()
            .find(|&(_, pos)| pos == other)
            .map(|(dir, _)| dir)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Won,
}

/// One puzzle instance: fixed walls and goals, mutable player and boxes.
///
/// Only [`Level::try_move`] mutates a level; everything else is fixed when
/// the level is parsed. Restarting means parsing the source again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    width: i32,
    height: i32,
    walls: HashSet<Position>,
    goals: HashSet<Position>,
    boxes: HashSet<Position>,
    player: Position,
    reachable: HashSet<Position>,
    move_count: usize,
    state: PlayState,
    player_missing: bool,
    legend: Legend,
}

impl Level {
    /// Parse a level block using the standard XSB legend.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - `.` = Goal
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on goal
    /// - `+` = Player on goal
    /// - anything else = Floor
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_legend(text, &Legend::default())
    }

    /// Parse a level block with a caller-supplied legend.
    ///
    /// Parsing never fails. Rows shorter than the widest row are floor past
    /// their end. If several player glyphs appear the last one wins; if none
    /// appears the player is placed at `(0, 0)` and [`Level::player_missing`]
    /// reports it.
    pub fn from_text_with_legend(text: &str, legend: &Legend) -> Self {
        let lines: Vec<&str> = text.lines().collect();

        let height = lines.len() as i32;
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as i32;

        let mut walls = HashSet::new();
        let mut goals = HashSet::new();
        let mut boxes = HashSet::new();
        let mut player = None;

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match legend.classify(ch) {
                    Role::Wall => {
                        walls.insert(pos);
                    }
                    Role::Player => player = Some(pos),
                    Role::PlayerOnGoal => {
                        player = Some(pos);
                        goals.insert(pos);
                    }
                    Role::Box => {
                        boxes.insert(pos);
                    }
                    Role::BoxOnGoal => {
                        boxes.insert(pos);
                        goals.insert(pos);
                    }
                    Role::Goal => {
                        goals.insert(pos);
                    }
                    Role::Floor => {}
                }
            }
        }

        let player_missing = player.is_none();
        if player_missing {
            warn!(width, height, "level has no player glyph, placing player at (0, 0)");
        }
        let player = player.unwrap_or_default();
        let reachable = flood_fill(width, height, &walls, player);

        debug!(
            width,
            height,
            boxes = boxes.len(),
            goals = goals.len(),
            reachable = reachable.len(),
            "parsed level"
        );

        Level {
            width,
            height,
            walls,
            goals,
            boxes,
            player,
            reachable,
            move_count: 0,
            state: PlayState::Playing,
            player_missing,
            legend: legend.clone(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn boxes(&self) -> &HashSet<Position> {
        &self.boxes
    }

    pub fn goals(&self) -> &HashSet<Position> {
        &self.goals
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == PlayState::Won
    }

    /// True when the source had no player glyph and the player was defaulted
    /// to `(0, 0)`. Such a level is playable but almost certainly not what
    /// its author meant.
    pub fn player_missing(&self) -> bool {
        self.player_missing
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Cells outside the grid count as walls.
    pub fn has_wall(&self, x: i32, y: i32) -> bool {
        self.is_wall_at(Position::new(x, y))
    }

    pub fn has_box(&self, x: i32, y: i32) -> bool {
        self.boxes.contains(&Position::new(x, y))
    }

    pub fn is_goal(&self, x: i32, y: i32) -> bool {
        self.goals.contains(&Position::new(x, y))
    }

    /// Whether the cell is connected to the player's starting cell. Only
    /// meant for choosing decorative "outside" glyphs.
    pub fn is_reachable(&self, x: i32, y: i32) -> bool {
        self.reachable.contains(&Position::new(x, y))
    }

    pub(crate) fn is_wall_at(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.walls.contains(&pos)
    }

    pub(crate) fn has_box_at(&self, pos: Position) -> bool {
        self.boxes.contains(&pos)
    }

    /// Open cells are the ones the pathfinder may walk through.
    pub(crate) fn is_open(&self, pos: Position) -> bool {
        !self.is_wall_at(pos) && !self.has_box_at(pos)
    }

    fn all_boxes_on_goals(&self) -> bool {
        self.boxes.iter().all(|pos| self.goals.contains(pos))
    }

    /// Move the box at `from` to `to`. The caller has checked that `to` is
    /// free.
    fn relocate_box(&mut self, from: Position, to: Position) {
        let removed = self.boxes.remove(&from);
        debug_assert!(removed, "no box at {}", from);
        self.boxes.insert(to);
    }

    /// Step the player one cell, pushing a box if one is in the way.
    ///
    /// Returns false and leaves the level untouched if the level is already
    /// won, the step runs into a wall, or the pushed box would land on a wall
    /// or another box.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        if self.is_won() {
            return false;
        }

        let target = self.player.step(direction);
        if self.is_wall_at(target) {
            trace!(%direction, player = %self.player, "move blocked by wall");
            return false;
        }

        if self.has_box_at(target) {
            let box_target = target.step(direction);
            if !self.is_open(box_target) {
                trace!(%direction, from = %target, "push blocked");
                return false;
            }
            self.relocate_box(target, box_target);
        }

        self.player = target;
        self.move_count += 1;
        trace!(%direction, player = %self.player, moves = self.move_count, "moved");

        if self.all_boxes_on_goals() {
            self.state = PlayState::Won;
            debug!(moves = self.move_count, "level won");
        }

        true
    }

    fn role_at(&self, pos: Position) -> Role {
        let on_goal = self.goals.contains(&pos);
        if pos == self.player {
            if on_goal { Role::PlayerOnGoal } else { Role::Player }
        } else if self.boxes.contains(&pos) {
            if on_goal { Role::BoxOnGoal } else { Role::Box }
        } else if self.walls.contains(&pos) {
            Role::Wall
        } else if on_goal {
            Role::Goal
        } else {
            Role::Floor
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let line: String = (0..self.width)
                .map(|x| self.legend.glyph_for(self.role_at(Position::new(x, y))))
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
