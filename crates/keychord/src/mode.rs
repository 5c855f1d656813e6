//! Modal editing modes.

use serde::{Deserialize, Serialize};

/// The active editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Insert mode - keys type text.
    #[default]
    Insert,
    /// Normal mode - keys are commands.
    Normal,
    /// Visual mode - character selection.
    Visual,
    /// Visual block mode - rectangular selection.
    VisualBlock,
}

impl Mode {
    pub fn is_insert(&self) -> bool {
        matches!(self, Mode::Insert)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }

    /// True for both visual variants.
    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualBlock)
    }

    /// Returns the mode name for display.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Insert => "INSERT",
            Mode::Normal => "NORMAL",
            Mode::Visual => "VISUAL",
            Mode::VisualBlock => "V-BLOCK",
        }
    }
}
