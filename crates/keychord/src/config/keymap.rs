//! Command set: the ordered `(key sequence, action name)` table a
//! [`CommandTrie`] is built from.

use crate::action::ActionRegistry;
use crate::error::Result;
use crate::token::{format_sequence, parse_sequence, Token};
use crate::trie::CommandTrie;

use super::schema::KeymapConfig;

/// Built-in normal mode commands, in registration order.
const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    // Motion
    ("h", "move_left"),
    ("j", "move_down"),
    ("k", "move_up"),
    ("l", "move_right"),
    ("w", "word_forward"),
    ("b", "word_back"),
    ("0", "line_start"),
    ("shift+4", "line_end"),
    ("g g", "document_start"),
    ("shift+g", "document_end"),
    ("ctrl+d", "half_page_down"),
    ("ctrl+u", "half_page_up"),
    // Editing
    ("x", "delete_char"),
    ("d d", "delete_line"),
    ("shift+d", "delete_to_end"),
    ("o", "open_line_below"),
    ("shift+o", "open_line_above"),
    ("y y", "yank_line"),
    ("p", "paste_after"),
    // History
    ("u", "undo"),
    ("ctrl+r", "redo"),
    // File
    ("ctrl+s", "write"),
    // Help
    ("space h", "show_help"),
];

/// One entry of the command set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub sequence: Vec<Token>,
    pub action: String,
    pub description: Option<String>,
}

impl KeyBinding {
    /// Parse `keys` (e.g. "ctrl+r") into a binding for `action`.
    pub fn parse(keys: &str, action: impl Into<String>) -> Result<Self> {
        Ok(Self {
            sequence: parse_sequence(keys)?,
            action: action.into(),
            description: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl std::fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", format_sequence(&self.sequence), self.action)
    }
}

/// An ordered registration table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Append a binding parsed from `keys`.
    pub fn bind(&mut self, keys: &str, action: &str) -> Result<()> {
        self.push(KeyBinding::parse(keys, action)?);
        Ok(())
    }

    pub fn push(&mut self, binding: KeyBinding) {
        self.bindings.push(binding);
    }

    /// Remove every binding for exactly `sequence`.
    pub fn unbind(&mut self, sequence: &[Token]) {
        self.bindings.retain(|b| b.sequence != sequence);
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Action name bound to exactly `sequence`, first binding wins.
    pub fn get(&self, sequence: &[Token]) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.sequence == sequence)
            .map(|b| b.action.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Action names the default command set refers to.
    pub fn default_action_names() -> impl Iterator<Item = &'static str> {
        DEFAULT_BINDINGS.iter().map(|(_, action)| *action)
    }

    /// Create the default normal mode command set.
    pub fn default_normal_keymap() -> Result<Self> {
        let mut km = Self::new();
        for (keys, action) in DEFAULT_BINDINGS {
            km.bind(keys, action)?;
        }
        Ok(km)
    }

    /// Build the command set described by a config section.
    ///
    /// A configured sequence replaces a default bound to the same sequence.
    /// Two configured bindings for the same sequence are left in place so
    /// that [`Keymap::build`] rejects them.
    pub fn from_config(config: &KeymapConfig) -> Result<Self> {
        let mut km = if config.use_defaults {
            Self::default_normal_keymap()?
        } else {
            Self::new()
        };

        let mut custom = Vec::with_capacity(config.bindings.len());
        for entry in &config.bindings {
            let mut binding = KeyBinding::parse(&entry.keys, entry.action.as_str())?;
            binding.description = entry.description.clone();
            custom.push(binding);
        }

        for binding in &custom {
            km.unbind(&binding.sequence);
        }
        km.bindings.extend(custom);

        Ok(km)
    }

    /// Resolve action names against `actions` and register every binding.
    ///
    /// Fails on the first unknown action name or duplicate sequence.
    pub fn build<C>(&self, actions: &ActionRegistry<C>) -> Result<CommandTrie> {
        let mut trie = CommandTrie::new();
        for binding in &self.bindings {
            let id = actions.resolve(&binding.action)?;
            trie.register(&binding.sequence, id)?;
        }
        tracing::debug!(commands = trie.len(), "built command trie");
        Ok(trie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomKeyBinding;
    use crate::error::Error;
    use crate::trie::Lookup;

    fn registry_with(names: &[&str]) -> ActionRegistry<()> {
        let mut registry = ActionRegistry::new();
        for name in names {
            registry.register(*name, |_| {}).unwrap();
        }
        registry
    }

    fn full_registry() -> ActionRegistry<()> {
        let names: Vec<&str> = Keymap::default_action_names().collect();
        registry_with(&names)
    }

    #[test]
    fn test_default_keymap_parses_every_entry() {
        let km = Keymap::default_normal_keymap().unwrap();
        assert_eq!(km.len(), DEFAULT_BINDINGS.len());
        assert_eq!(km.get(&[Token::J]), Some("move_down"));
        assert_eq!(km.get(&[Token::D, Token::D]), Some("delete_line"));
        assert_eq!(km.get(&[Token::Control, Token::R]), Some("redo"));
        assert_eq!(km.get(&[Token::Shift, Token::Num4]), Some("line_end"));
    }

    #[test]
    fn test_default_keymap_builds() {
        let registry = full_registry();
        let trie = Keymap::default_normal_keymap().unwrap().build(&registry).unwrap();
        assert_eq!(trie.len(), DEFAULT_BINDINGS.len());
        assert_eq!(
            trie.lookup(&[Token::G, Token::G]),
            Lookup::Exact(registry.id("document_start").unwrap())
        );
        assert_eq!(trie.lookup(&[Token::Control]), Lookup::Prefix);
    }

    #[test]
    fn test_build_unknown_action() {
        let mut km = Keymap::new();
        km.bind("q", "record_macro").unwrap();
        let err = km.build(&registry_with(&["undo"])).unwrap_err();
        assert_eq!(err, Error::UnknownAction("record_macro".to_string()));
    }

    #[test]
    fn test_build_duplicate_sequence() {
        let mut km = Keymap::new();
        km.bind("h", "move_left").unwrap();
        km.bind("h", "undo").unwrap();
        let err = km.build(&registry_with(&["move_left", "undo"])).unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand { .. }));
    }

    #[test]
    fn test_bind_invalid_keys() {
        let mut km = Keymap::new();
        assert!(km.bind("", "undo").is_err());
        assert!(km.bind("ctrl+nope", "undo").is_err());
        assert!(km.is_empty());
    }

    #[test]
    fn test_config_overrides_default_sequence() {
        let config = KeymapConfig {
            use_defaults: true,
            bindings: vec![CustomKeyBinding {
                keys: "j".to_string(),
                action: "half_page_down".to_string(),
                description: Some("Faster".to_string()),
            }],
        };
        let km = Keymap::from_config(&config).unwrap();
        assert_eq!(km.len(), DEFAULT_BINDINGS.len());
        assert_eq!(km.get(&[Token::J]), Some("half_page_down"));
        assert!(km.build(&full_registry()).is_ok());
    }

    #[test]
    fn test_config_without_defaults() {
        let config = KeymapConfig {
            use_defaults: false,
            bindings: vec![CustomKeyBinding {
                keys: "ctrl+shift+z".to_string(),
                action: "redo".to_string(),
                description: None,
            }],
        };
        let km = Keymap::from_config(&config).unwrap();
        assert_eq!(km.len(), 1);
        assert_eq!(
            km.bindings()[0].sequence,
            vec![Token::Shift, Token::Control, Token::Z]
        );
    }

    #[test]
    fn test_config_duplicates_rejected_at_build() {
        let entry = |action: &str| CustomKeyBinding {
            keys: "q q".to_string(),
            action: action.to_string(),
            description: None,
        };
        let config = KeymapConfig {
            use_defaults: false,
            bindings: vec![entry("undo"), entry("redo")],
        };
        let km = Keymap::from_config(&config).unwrap();
        assert_eq!(km.len(), 2);
        assert!(matches!(
            km.build(&registry_with(&["undo", "redo"])),
            Err(Error::DuplicateCommand { .. })
        ));
    }

    #[test]
    fn test_binding_display() {
        let binding = KeyBinding::parse("ctrl+r", "redo").unwrap();
        assert_eq!(binding.to_string(), "Ctrl R -> redo");
    }
}
