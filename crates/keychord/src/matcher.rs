//! Incremental sequence matcher over a [`CommandTrie`].
//!
//! Tokens arrive one at a time. The matcher keeps the set of trie nodes
//! reached by the tokens consumed so far and returns an action as soon as
//! one of them is terminal. A token that leads nowhere discards the whole
//! in-progress sequence; it is not retried from the root.

use std::sync::Arc;

use crate::action::ActionId;
use crate::token::{format_sequence, Token};
use crate::trie::{CommandTrie, NodeId};

/// Per-surface match state. Cloning gives an independent matcher over the
/// same shared trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMatcher {
    trie: Arc<CommandTrie>,
    current: Vec<NodeId>,
    pending: Vec<Token>,
}

impl SequenceMatcher {
    pub fn new(trie: Arc<CommandTrie>) -> Self {
        Self {
            trie,
            current: vec![NodeId::ROOT],
            pending: Vec::new(),
        }
    }

    /// Feed one token.
    ///
    /// Returns the action of the first terminal node reached, resetting to
    /// the root. Returns `None` while a sequence is still in progress, and
    /// also when `token` breaks it (the partial sequence is dropped).
    ///
    /// A terminal node fires the moment it is reached, even if longer
    /// commands extend it.
    pub fn consume(&mut self, token: Token) -> Option<ActionId> {
        let next: Vec<NodeId> = self
            .current
            .iter()
            .filter_map(|node| self.trie.advance(*node, token))
            .collect();
        self.current = next;

        if let Some(action) = self
            .current
            .iter()
            .find_map(|node| self.trie.action_at(*node))
        {
            self.pending.push(token);
            tracing::debug!(
                sequence = %format_sequence(&self.pending),
                action = action.index(),
                "matched command"
            );
            self.reset();
            return Some(action);
        }

        if self.current.is_empty() {
            if !self.pending.is_empty() {
                tracing::trace!(
                    pending = %format_sequence(&self.pending),
                    %token,
                    "sequence broken"
                );
            }
            self.reset();
            return None;
        }

        self.pending.push(token);
        tracing::trace!(pending = %format_sequence(&self.pending), "sequence in progress");
        None
    }

    /// Abandon any part-typed sequence. Calling this repeatedly is the same
    /// as calling it once.
    pub fn reset(&mut self) {
        self.current.clear();
        self.current.push(NodeId::ROOT);
        self.pending.clear();
    }

    /// Tokens consumed by the sequence in progress.
    pub fn pending(&self) -> &[Token] {
        &self.pending
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Nodes reached by the sequence in progress.
    pub fn state(&self) -> &[NodeId] {
        &self.current
    }

    pub fn trie(&self) -> &Arc<CommandTrie> {
        &self.trie
    }
}
