use std::collections::HashMap;
use std::fmt;

use crate::error::LegendError;

/// What a single glyph in a level block stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Wall,
    Player,
    PlayerOnGoal,
    Box,
    BoxOnGoal,
    Goal,
    Floor,
}

const ALL_ROLES: [Role; 7] = [
    Role::Wall,
    Role::Player,
    Role::PlayerOnGoal,
    Role::Box,
    Role::BoxOnGoal,
    Role::Goal,
    Role::Floor,
];

impl Role {
    /// Name used in legend override strings (`wall=#,box=$`).
    pub fn name(&self) -> &'static str {
        match self {
            Role::Wall => "wall",
            Role::Player => "player",
            Role::PlayerOnGoal => "player-on-goal",
            Role::Box => "box",
            Role::BoxOnGoal => "box-on-goal",
            Role::Goal => "goal",
            Role::Floor => "floor",
        }
    }

    fn from_name(name: &str) -> Option<Role> {
        ALL_ROLES.iter().copied().find(|role| role.name() == name)
    }

    fn xsb_glyph(&self) -> char {
        match self {
            Role::Wall => '#',
            Role::Player => '@',
            Role::PlayerOnGoal => '+',
            Role::Box => '$',
            Role::BoxOnGoal => '*',
            Role::Goal => '.',
            Role::Floor => ' ',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Glyph-to-role mapping used when parsing level blocks.
///
/// Any character without an entry is floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    roles: HashMap<char, Role>,
}

impl Default for Legend {
    /// The standard XSB legend: `#` wall, `@` player, `$` box, `.` goal,
    /// `*` box on goal, `+` player on goal.
    fn default() -> Self {
        let roles = ALL_ROLES
            .iter()
            .filter(|role| **role != Role::Floor)
            .map(|role| (role.xsb_glyph(), *role))
            .collect();
        Legend { roles }
    }
}

impl Legend {
    /// Map `glyph` to `role`, replacing whatever it meant before.
    ///
    /// No collision checks happen here: a role left without a glyph is
    /// written back out with its XSB glyph, which may now mean something
    /// else. Use [`Legend::parse_overrides`] for untrusted input.
    pub fn with_glyph(mut self, glyph: char, role: Role) -> Self {
        if role == Role::Floor {
            self.roles.remove(&glyph);
        } else {
            self.roles.insert(glyph, role);
        }
        self
    }

    /// Build a legend from the default plus comma-separated `role=glyph`
    /// overrides, e.g. `"wall=X,box=o"`.
    ///
    /// Overriding a role drops its previous glyphs, so `wall=X` makes `#`
    /// plain floor. A glyph that still belongs to another role is rejected,
    /// which keeps every role's output glyph unambiguous.
    pub fn parse_overrides(spec: &str) -> Result<Self, LegendError> {
        let mut legend = Legend::default();

        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, glyph) = pair
                .split_once('=')
                .ok_or_else(|| LegendError::MalformedPair(pair.to_string()))?;

            let role = Role::from_name(name.trim())
                .ok_or_else(|| LegendError::UnknownRole(name.trim().to_string()))?;

            let mut chars = glyph.chars();
            let glyph = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return Err(LegendError::InvalidGlyph(glyph.to_string())),
            };

            legend.roles.retain(|_, r| *r != role);
            if let Some(&taken_by) = legend.roles.get(&glyph) {
                return Err(LegendError::GlyphInUse {
                    glyph,
                    role: taken_by,
                });
            }
            legend = legend.with_glyph(glyph, role);
        }

        Ok(legend)
    }

    /// Classify a single character.
    pub fn classify(&self, ch: char) -> Role {
        self.roles.get(&ch).copied().unwrap_or(Role::Floor)
    }

    /// Glyph used to write `role` back out. Floor is always a space.
    pub fn glyph_for(&self, role: Role) -> char {
        if role == Role::Floor {
            return ' ';
        }
        // Smallest glyph wins so the choice doesn't depend on map order
        self.roles
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(ch, _)| *ch)
            .min()
            .unwrap_or_else(|| role.xsb_glyph())
    }
}
