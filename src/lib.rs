//! Sokoban engine for the Stone Garden demo.
//!
//! Parses semicolon-separated XSB level packs, tracks per-level grid state,
//! applies push rules, and resolves clicks into single steps. Rendering and
//! input translation belong to the host.

pub mod error;
pub mod game;
pub mod legend;
pub mod levels;
pub mod pathfind;
pub mod reachability;

pub use error::{LegendError, LevelError};
pub use game::{ALL_DIRECTIONS, Direction, Level, PlayState, Position};
pub use legend::{Legend, Role};
pub use levels::{LevelPack, split_pack};
pub use pathfind::shortest_path;
