//! Errors raised while building a command set.
//!
//! Everything here is a configuration-time fault. Matching and dispatch
//! never fail: a key that breaks a sequence is an ordinary "no match".

use thiserror::Error;

use crate::action::ActionId;
use crate::token::{format_sequence, Token};

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The exact same key sequence was registered twice.
    #[error("command already registered for `{}`", format_sequence(.sequence))]
    DuplicateCommand {
        sequence: Vec<Token>,
        existing: ActionId,
    },

    /// A command needs at least one key.
    #[error("invalid key sequence: {0}")]
    InvalidSequence(String),

    /// A key name in a sequence string was not recognized.
    #[error("unknown key `{0}`")]
    UnknownKey(String),

    /// An action name was registered twice in the same registry.
    #[error("action `{0}` is already registered")]
    DuplicateAction(String),

    /// A binding refers to an action the host never registered.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// An action handle that the registry never issued.
    #[error("action handle {0:?} does not belong to this registry")]
    UnknownActionId(ActionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_command_message_renders_sequence() {
        let err = Error::DuplicateCommand {
            sequence: vec![Token::D, Token::D],
            existing: ActionId::from_index(0),
        };
        assert_eq!(err.to_string(), "command already registered for `D D`");
    }

    #[test]
    fn test_unknown_key_message() {
        let err = Error::UnknownKey("hyper".to_string());
        assert_eq!(err.to_string(), "unknown key `hyper`");
    }
}
