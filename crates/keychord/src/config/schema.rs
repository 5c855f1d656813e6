//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor settings
    pub editor: EditorConfig,
    /// Keymap customizations
    pub keymap: KeymapConfig,
}

/// Editor-related settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Mode the editor starts in
    pub initial_mode: Mode,
    /// Show part-typed command keys in the status line
    pub show_pending_keys: bool,
    /// Lines moved by half-page motions
    pub half_page_lines: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_mode: Mode::Insert,
            show_pending_keys: true,
            half_page_lines: 10,
        }
    }
}

/// Keymap customization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// Start from the built-in normal mode commands
    pub use_defaults: bool,
    /// Extra or overriding command bindings
    pub bindings: Vec<CustomKeyBinding>,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            bindings: Vec::new(),
        }
    }
}

/// A custom command binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomKeyBinding {
    /// Key sequence (e.g., "d d", "ctrl+r", "g shift+g")
    pub keys: String,
    /// Action name registered by the host
    pub action: String,
    /// Optional description for help display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
