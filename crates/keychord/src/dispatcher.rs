//! Modal key dispatcher.
//!
//! Decides per key whether to switch mode, feed the sequence matcher, or
//! let the host handle the key itself. Matched actions are invoked against
//! the host's editing context.
//!
//! # Transitions
//!
//! - Insert + `Esc` -> Normal (caret narrowed to one position)
//! - Normal + `I` -> Insert (selection collapsed)
//! - Normal + `A` -> Insert (caret moved right, then collapsed)
//!
//! Visual modes are only entered through [`ModalDispatcher::set_mode`] and
//! pass every key through.

use std::sync::Arc;

use crate::action::{ActionId, ActionRegistry};
use crate::matcher::SequenceMatcher;
use crate::mode::Mode;
use crate::token::{Modifiers, Token};
use crate::trie::CommandTrie;

/// Side effects a mode change has on the host's editable surface.
pub trait EditingSurface {
    /// Narrow the selection to the single position under the caret.
    fn select_caret(&mut self);
    /// Collapse the selection to an insertion point.
    fn collapse_selection(&mut self);
    /// Move the caret one position right.
    fn move_right(&mut self);
}

/// What the host should do with the key it just passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The key was consumed; suppress default handling.
    Dispatched,
    /// The key was not handled; apply default handling.
    Passthrough,
}

impl Dispatch {
    pub fn is_dispatched(self) -> bool {
        matches!(self, Dispatch::Dispatched)
    }
}

/// Mode state machine in front of a [`SequenceMatcher`].
pub struct ModalDispatcher<C> {
    mode: Mode,
    matcher: SequenceMatcher,
    actions: Arc<ActionRegistry<C>>,
}

impl<C: EditingSurface> ModalDispatcher<C> {
    /// Create a dispatcher in [`Mode::Insert`].
    pub fn new(trie: Arc<CommandTrie>, actions: Arc<ActionRegistry<C>>) -> Self {
        Self {
            mode: Mode::default(),
            matcher: SequenceMatcher::new(trie),
            actions,
        }
    }

    /// Start in a different mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode without side effects on the surface.
    ///
    /// This is the entry point for modes no key transition reaches
    /// (Visual, VisualBlock). Any part-typed sequence is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = self.mode.label(), to = mode.label(), "mode change");
            self.mode = mode;
        }
        self.matcher.reset();
    }

    /// Tokens of the command sequence in progress.
    pub fn pending(&self) -> &[Token] {
        self.matcher.pending()
    }

    pub fn matcher(&self) -> &SequenceMatcher {
        &self.matcher
    }

    pub fn actions(&self) -> &ActionRegistry<C> {
        &self.actions
    }

    /// Handle the output of [`crate::translate`]. Keys with no token pass through.
    pub fn handle_key(&mut self, key: Option<(Token, Modifiers)>, context: &mut C) -> Dispatch {
        match key {
            Some((token, modifiers)) => self.handle(token, modifiers, context),
            None => Dispatch::Passthrough,
        }
    }

    /// Handle one key press.
    pub fn handle(&mut self, token: Token, modifiers: Modifiers, context: &mut C) -> Dispatch {
        match (self.mode, token) {
            (Mode::Insert, Token::Escape) => {
                self.set_mode(Mode::Normal);
                context.select_caret();
                Dispatch::Dispatched
            }
            (Mode::Normal, Token::I) => {
                self.set_mode(Mode::Insert);
                context.collapse_selection();
                Dispatch::Dispatched
            }
            (Mode::Normal, Token::A) => {
                self.set_mode(Mode::Insert);
                context.move_right();
                context.collapse_selection();
                Dispatch::Dispatched
            }
            (Mode::Normal, _) => {
                for key in modifiers.tokens().chain(std::iter::once(token)) {
                    if let Some(action) = self.matcher.consume(key) {
                        self.invoke(action, context);
                    }
                }
                context.select_caret();
                Dispatch::Dispatched
            }
            _ => Dispatch::Passthrough,
        }
    }

    fn invoke(&self, action: ActionId, context: &mut C) {
        tracing::debug!(action = self.actions.name(action).unwrap_or("?"), "invoking action");
        if let Err(err) = self.actions.invoke(action, context) {
            tracing::error!(%err, "matched action could not be invoked");
        }
    }
}
