//! Errors for the fallible edges of the engine: loading pack files and
//! reading legend overrides. Play itself never fails.

use std::io;

use thiserror::Error;

use crate::legend::Role;

/// Error type for level pack loading.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid legend: {0}")]
    Legend(#[from] LegendError),
}

/// Error type for legend override strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LegendError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("glyph must be exactly one character, got '{0}'")]
    InvalidGlyph(String),

    #[error("expected role=glyph, got '{0}'")]
    MalformedPair(String),

    #[error("glyph '{glyph}' is already used for {role}")]
    GlyphInUse { glyph: char, role: Role },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_error_converts() {
        let err = LevelError::from(LegendError::UnknownRole("lava".to_string()));
        assert!(matches!(err, LevelError::Legend(LegendError::UnknownRole(_))));
        assert_eq!(err.to_string(), "Invalid legend: unknown role 'lava'");
    }

    #[test]
    fn test_glyph_in_use_message() {
        let err = LegendError::GlyphInUse {
            glyph: '@',
            role: Role::Player,
        };
        assert_eq!(err.to_string(), "glyph '@' is already used for player");
    }
}
