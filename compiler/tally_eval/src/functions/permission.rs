//! Caller permission levels.

use std::fmt;
use std::str::FromStr;

use tally_value::errors::unknown_permission;
use tally_value::EvalError;

/// Who may call a function. Ordered: a caller may invoke anything at or
/// below its own level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    #[default]
    Player,
    Trusted,
    GameMaster,
}

impl PermissionLevel {
    pub const fn name(self) -> &'static str {
        match self {
            PermissionLevel::Player => "player",
            PermissionLevel::Trusted => "trusted",
            PermissionLevel::GameMaster => "gamemaster",
        }
    }

    /// Whether a caller at this level may invoke something requiring `required`.
    pub fn allows(self, required: PermissionLevel) -> bool {
        self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PermissionLevel {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" => Ok(PermissionLevel::Player),
            "trusted" => Ok(PermissionLevel::Trusted),
            "gamemaster" | "game_master" | "gm" => Ok(PermissionLevel::GameMaster),
            _ => Err(unknown_permission(s)),
        }
    }
}
