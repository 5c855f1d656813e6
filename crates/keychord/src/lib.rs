//! Keystroke sequence recognition for modal text editing.
//!
//! Commands are key sequences (`d d`, `ctrl+r`, `g g`) registered in a
//! [`CommandTrie`]. A [`SequenceMatcher`] walks the trie one [`Token`] at a
//! time, and a [`ModalDispatcher`] decides per key whether to switch mode,
//! feed the matcher, or let the host handle the key.
//!
//! ```ignore
//! let mut actions = ActionRegistry::new();
//! actions.register("delete_line", |editor: &mut Editor| editor.delete_line())?;
//!
//! let trie = Keymap::default_normal_keymap()?.build(&actions)?;
//! let mut dispatcher = ModalDispatcher::new(Arc::new(trie), Arc::new(actions));
//!
//! if !dispatcher.handle_key(translate(&key), &mut editor).is_dispatched() {
//!     editor.insert(key);
//! }
//! ```

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod mode;
pub mod token;
pub mod translate;
pub mod trie;

pub use action::{ActionId, ActionRegistry};
pub use config::{Config, KeyBinding, Keymap};
pub use dispatcher::{Dispatch, EditingSurface, ModalDispatcher};
pub use error::{Error, Result};
pub use matcher::SequenceMatcher;
pub use mode::Mode;
pub use token::{format_sequence, parse_sequence, Modifiers, Token};
pub use translate::translate;
pub use trie::{CommandTrie, Lookup, NodeId, TrieNode};
