use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::LevelError;
use crate::game::{Direction, Level};
use crate::legend::Legend;

fn is_separator(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

fn flush_block(blocks: &mut Vec<String>, current: &mut Vec<&str>) {
    if current.iter().any(|line| !line.trim().is_empty()) {
        blocks.push(current.join("\n"));
    }
    current.clear();
}

/// Split a level pack into its level blocks.
///
/// Lines whose first non-space character is `;` separate levels (and carry
/// titles or comments). Everything between two separators is one level,
/// kept verbatim: blank lines and trailing spaces inside a block are part of
/// the drawing. Blocks with nothing but whitespace are dropped, so leading
/// and trailing comments or back-to-back separators never yield empty
/// levels.
pub fn split_pack(contents: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in contents.lines() {
        if is_separator(line) {
            flush_block(&mut blocks, &mut current);
        } else {
            current.push(line);
        }
    }
    flush_block(&mut blocks, &mut current);

    blocks
}

/// An ordered set of level sources with one of them loaded for play.
///
/// Navigation always re-parses the selected source, so moving to another
/// level (or restarting) throws away every move made so far.
#[derive(Debug, Clone)]
pub struct LevelPack {
    sources: Vec<String>,
    legend: Legend,
    current_index: usize,
    level: Option<Level>,
}

impl LevelPack {
    /// Parse a pack with the standard XSB legend and load its first level.
    pub fn from_text(contents: &str) -> Self {
        Self::from_text_with_legend(contents, Legend::default())
    }

    pub fn from_text_with_legend(contents: &str, legend: Legend) -> Self {
        let sources = split_pack(contents);
        let level = sources
            .first()
            .map(|source| Level::from_text_with_legend(source, &legend));
        debug!(levels = sources.len(), "loaded level pack");

        LevelPack {
            sources,
            legend,
            current_index: 0,
            level,
        }
    }

    /// Read and parse a level pack file.
    pub fn from_file(path: impl AsRef<Path>, legend: Legend) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_text_with_legend(&contents, legend))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Raw source of the selected level.
    pub fn source(&self) -> Option<&str> {
        self.sources.get(self.current_index).map(String::as_str)
    }

    /// The level being played, `None` only for an empty pack.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    fn load(&mut self, index: usize) -> bool {
        let Some(source) = self.sources.get(index) else {
            return false;
        };
        self.current_index = index;
        self.level = Some(Level::from_text_with_legend(source, &self.legend));
        debug!(index, total = self.sources.len(), "loaded level");
        true
    }

    /// Advance to the next level, wrapping to the first.
    pub fn load_next_level(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.load((self.current_index + 1) % self.len())
    }

    /// Go back to the previous level, wrapping to the last.
    pub fn load_prev_level(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.load((self.current_index + self.len() - 1) % self.len())
    }

    /// Re-parse the selected level from scratch.
    pub fn restart_level(&mut self) -> bool {
        self.load(self.current_index)
    }

    /// Jump to level `index` (0-indexed). Out of range is a no-op.
    pub fn select_level(&mut self, index: usize) -> bool {
        self.load(index)
    }

    pub fn try_move(&mut self, direction: Direction) -> bool {
        self.level
            .as_mut()
            .is_some_and(|level| level.try_move(direction))
    }

    pub fn handle_click(&mut self, x: i32, y: i32) -> bool {
        self.level
            .as_mut()
            .is_some_and(|level| level.handle_click(x, y))
    }

    pub fn is_won(&self) -> bool {
        self.level.as_ref().is_some_and(Level::is_won)
    }

    pub fn move_count(&self) -> usize {
        self.level.as_ref().map_or(0, Level::move_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::legend::Role;

    #[test]
    fn test_split_pack_basic() {
        let level1 = "####\n\
                      # .#\n\
                      #  ###\n\
                      #*@  #\n\
                      #  $ #\n\
                      #  ###\n\
                      ####";

        let level2 = "######\n\
                      #    #\n\
                      # #@ #\n\
                      # $* #\n\
                      # .* #\n\
                      #    #\n\
                      ######";

        let contents = format!("; 1\n{}\n; 2\n{}\n", level1, level2);
        let blocks = split_pack(&contents);

        assert_eq!(blocks, vec![level1.to_string(), level2.to_string()]);
    }

    #[test]
    fn test_split_pack_two_levels() {
        let blocks = split_pack("; 1\n###\n#@#\n###\n;\n; 2\n####\n#@$#\n####");
        assert_eq!(blocks, vec!["###\n#@#\n###", "####\n#@$#\n####"]);
    }

    #[test]
    fn test_split_pack_indented_separator() {
        let blocks = split_pack("###\n#@#\n   ; comment\n####\n#@ #");
        assert_eq!(blocks, vec!["###\n#@#", "####\n#@ #"]);
    }

    #[test]
    fn test_split_pack_preserves_blank_lines_and_spaces() {
        let blocks = split_pack(";\n####  \n\n#@ #\n;");
        assert_eq!(blocks, vec!["####  \n\n#@ #"]);
    }

    #[test]
    fn test_split_pack_no_content() {
        assert!(split_pack("").is_empty());
        assert!(split_pack("; title\n; author\n").is_empty());
        assert!(split_pack("; 1\n\n   \n; 2\n").is_empty());
    }

    #[test]
    fn test_split_pack_crlf() {
        let blocks = split_pack("; 1\r\n###\r\n#@#\r\n###\r\n");
        assert_eq!(blocks, vec!["###\n#@#\n###"]);
    }

    #[test]
    fn test_next_wraps_around() {
        let mut pack = LevelPack::from_text("; 1\n###\n#@#\n###\n;\n; 2\n####\n#@$#\n####");

        assert_eq!(pack.len(), 2);
        assert_eq!(pack.current_index(), 0);
        assert!(pack.load_next_level());
        assert_eq!(pack.current_index(), 1);
        assert!(pack.level().unwrap().has_box(2, 1));
        assert!(pack.load_next_level());
        assert_eq!(pack.current_index(), 0);
        assert_eq!(pack.level().unwrap().boxes().len(), 0);
    }

    #[test]
    fn test_prev_wraps_around() {
        let mut pack = LevelPack::from_text(";\n#@#\n;\n#@ #\n;\n#@  #\n");
        assert_eq!(pack.len(), 3);
        assert!(pack.load_prev_level());
        assert_eq!(pack.current_index(), 2);
        assert!(pack.load_prev_level());
        assert_eq!(pack.current_index(), 1);
        assert_eq!(pack.source(), Some("#@ #"));
    }

    #[test]
    fn test_restart_resets_state() {
        let mut pack = LevelPack::from_text("; 1\n######\n#@$ .#\n######");
        assert!(pack.try_move(Direction::Right));
        assert_eq!(pack.move_count(), 1);

        assert!(pack.restart_level());
        assert_eq!(pack.current_index(), 0);
        assert_eq!(pack.move_count(), 0);
        let level = pack.level().unwrap();
        assert_eq!(level.player(), Position::new(1, 1));
        assert!(level.has_box(2, 1));
    }

    #[test]
    fn test_navigation_resets_won() {
        let mut pack = LevelPack::from_text("#####\n#@$.#\n#####\n;\n####\n#@ #\n####");
        assert!(pack.try_move(Direction::Right));
        assert!(pack.is_won());
        assert!(!pack.try_move(Direction::Left));

        assert!(pack.load_next_level());
        assert!(pack.load_prev_level());
        assert!(!pack.is_won());
        assert_eq!(pack.move_count(), 0);
        assert!(pack.level().unwrap().has_box(2, 1));
    }

    #[test]
    fn test_select_level() {
        let mut pack = LevelPack::from_text(";\n#@#\n;\n#@ #\n");
        assert!(pack.select_level(1));
        assert_eq!(pack.current_index(), 1);
        assert!(!pack.select_level(2));
        assert_eq!(pack.current_index(), 1);
    }

    #[test]
    fn test_empty_pack_is_noop() {
        let mut pack = LevelPack::from_text("; nothing here\n");
        assert!(pack.is_empty());
        assert!(pack.level().is_none());
        assert!(!pack.load_next_level());
        assert!(!pack.load_prev_level());
        assert!(!pack.restart_level());
        assert!(!pack.try_move(Direction::Up));
        assert!(!pack.handle_click(1, 1));
        assert!(!pack.is_won());
        assert_eq!(pack.move_count(), 0);
        assert_eq!(pack.current_index(), 0);
    }

    #[test]
    fn test_pack_click_forwards() {
        let mut pack = LevelPack::from_text("######\n#@   #\n######");
        assert!(pack.handle_click(4, 1));
        assert_eq!(pack.level().unwrap().player(), Position::new(2, 1));
    }

    #[test]
    fn test_pack_legend() {
        let legend = Legend::default().with_glyph('o', Role::Box);
        let mut pack = LevelPack::from_text_with_legend(";\n#####\n#@o.#\n#####", legend);
        assert!(pack.level().unwrap().has_box(2, 1));
        assert!(pack.try_move(Direction::Right));
        assert!(pack.is_won());

        // The legend survives navigation
        assert!(pack.restart_level());
        assert!(pack.level().unwrap().has_box(2, 1));
    }

    #[test]
    fn test_from_file_no_file() {
        let result = LevelPack::from_file("nonexistent_file.xsb", Legend::default());
        assert!(matches!(result, Err(LevelError::Io(_))));
    }
}
