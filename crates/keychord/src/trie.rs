//! Command trie: registered key sequences and the actions they own.
//!
//! Nodes live in an arena owned by [`CommandTrie`] and are addressed by
//! [`NodeId`]. Sequences that share a prefix share nodes. A node is
//! terminal iff it holds an action; terminal nodes may still have
//! children.

use std::collections::BTreeMap;

use crate::action::ActionId;
use crate::error::{Error, Result};
use crate::token::{format_sequence, Token};

/// Index of a node inside its [`CommandTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node. It has no token and never holds an action.
    pub const ROOT: NodeId = NodeId(0);
}

/// One position in a registered command path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieNode {
    token: Option<Token>,
    children: BTreeMap<Token, NodeId>,
    action: Option<ActionId>,
}

impl TrieNode {
    fn new(token: Option<Token>) -> Self {
        Self {
            token,
            children: BTreeMap::new(),
            action: None,
        }
    }

    /// The token that leads to this node; `None` only for the root.
    pub fn token(&self) -> Option<Token> {
        self.token
    }

    pub fn action(&self) -> Option<ActionId> {
        self.action
    }

    pub fn is_terminal(&self) -> bool {
        self.action.is_some()
    }

    /// Child keyed by `token`.
    pub fn child(&self, token: Token) -> Option<NodeId> {
        self.children.get(&token).copied()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Children in token order.
    pub fn children(&self) -> impl Iterator<Item = (Token, NodeId)> + '_ {
        self.children.iter().map(|(token, id)| (*token, *id))
    }
}

/// Result of looking up a complete sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The sequence is registered and nothing extends it.
    Exact(ActionId),
    /// The sequence is registered and also the prefix of longer commands.
    ExactAndPrefix(ActionId),
    /// The sequence only leads to longer commands.
    Prefix,
    /// No registered command starts with this sequence.
    NotFound,
}

/// Tree of registered key sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTrie {
    nodes: Vec<TrieNode>,
    commands: usize,
}

impl CommandTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(None)],
            commands: 0,
        }
    }

    /// Register `sequence` as the trigger for `action`.
    ///
    /// Existing nodes are reused for shared prefixes. Registering the exact
    /// same sequence twice fails with [`Error::DuplicateCommand`] and leaves
    /// the trie untouched.
    pub fn register(&mut self, sequence: &[Token], action: ActionId) -> Result<()> {
        if sequence.is_empty() {
            return Err(Error::InvalidSequence(
                "a command needs at least one key".to_string(),
            ));
        }

        // Walk the existing path first so a duplicate never allocates nodes.
        let mut node = NodeId::ROOT;
        let mut matched = 0;
        for token in sequence {
            match self.advance(node, *token) {
                Some(next) => {
                    node = next;
                    matched += 1;
                }
                None => break,
            }
        }

        if matched == sequence.len() {
            if let Some(existing) = self.nodes[node.0].action {
                return Err(Error::DuplicateCommand {
                    sequence: sequence.to_vec(),
                    existing,
                });
            }
        }

        self.warn_if_shadowed(sequence, matched, node);

        for token in &sequence[matched..] {
            let id = NodeId(self.nodes.len());
            self.nodes.push(TrieNode::new(Some(*token)));
            self.nodes[node.0].children.insert(*token, id);
            node = id;
        }

        self.nodes[node.0].action = Some(action);
        self.commands += 1;

        tracing::debug!(
            sequence = %format_sequence(sequence),
            action = action.index(),
            "registered command"
        );

        Ok(())
    }

    /// Log registrations the first-match-wins policy can never reach.
    fn warn_if_shadowed(&self, sequence: &[Token], matched: usize, last: NodeId) {
        let mut node = NodeId::ROOT;
        for (depth, token) in sequence[..matched].iter().enumerate() {
            let Some(next) = self.advance(node, *token) else {
                break;
            };
            node = next;
            if depth + 1 < sequence.len() && self.nodes[node.0].is_terminal() {
                tracing::warn!(
                    sequence = %format_sequence(sequence),
                    prefix = %format_sequence(&sequence[..=depth]),
                    "command is unreachable: a shorter prefix is already bound"
                );
                return;
            }
        }

        if matched == sequence.len() && self.nodes[last.0].has_children() {
            tracing::warn!(
                sequence = %format_sequence(sequence),
                "command makes longer bindings with this prefix unreachable"
            );
        }
    }

    /// Child of `node` keyed by `token`.
    pub fn advance(&self, node: NodeId, token: Token) -> Option<NodeId> {
        self.nodes.get(node.0)?.child(token)
    }

    pub fn node(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> &TrieNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Action held by `node`, if it is terminal.
    pub fn action_at(&self, node: NodeId) -> Option<ActionId> {
        self.nodes.get(node.0).and_then(TrieNode::action)
    }

    /// Classify a complete sequence.
    pub fn lookup(&self, sequence: &[Token]) -> Lookup {
        let mut node = NodeId::ROOT;
        for token in sequence {
            match self.advance(node, *token) {
                Some(next) => node = next,
                None => return Lookup::NotFound,
            }
        }

        let entry = &self.nodes[node.0];
        match (entry.action, entry.has_children()) {
            (Some(action), false) => Lookup::Exact(action),
            (Some(action), true) => Lookup::ExactAndPrefix(action),
            (None, true) => Lookup::Prefix,
            (None, false) => Lookup::NotFound,
        }
    }

    /// Every registered command in token order.
    pub fn bindings(&self) -> Vec<(Vec<Token>, ActionId)> {
        let mut out = Vec::with_capacity(self.commands);
        let mut path = Vec::new();
        self.collect(NodeId::ROOT, &mut path, &mut out);
        out
    }

    fn collect(&self, node: NodeId, path: &mut Vec<Token>, out: &mut Vec<(Vec<Token>, ActionId)>) {
        let entry = &self.nodes[node.0];
        if let Some(action) = entry.action {
            out.push((path.clone(), action));
        }
        for (token, child) in entry.children() {
            path.push(token);
            self.collect(child, path, out);
            path.pop();
        }
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands == 0
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for CommandTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(n: usize) -> ActionId {
        ActionId::from_index(n)
    }

    #[test]
    fn test_new_trie_has_bare_root() {
        let trie = CommandTrie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.root().token(), None);
        assert_eq!(trie.root().action(), None);
        assert!(!trie.root().has_children());
    }

    #[test]
    fn test_register_single_key() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::H], act(0)).unwrap();

        let h = trie.advance(NodeId::ROOT, Token::H).unwrap();
        assert_eq!(trie.node(h).unwrap().token(), Some(Token::H));
        assert_eq!(trie.action_at(h), Some(act(0)));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_shared_prefix_reuses_node() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::Control, Token::D], act(1)).unwrap();
        trie.register(&[Token::Control, Token::U], act(2)).unwrap();

        // root + Control + D + U
        assert_eq!(trie.node_count(), 4);
        let ctrl = trie.advance(NodeId::ROOT, Token::Control).unwrap();
        assert!(!trie.node(ctrl).unwrap().is_terminal());
        assert_eq!(
            trie.node(ctrl)
                .unwrap()
                .children()
                .map(|(token, _)| token)
                .collect::<Vec<_>>(),
            vec![Token::D, Token::U]
        );
    }

    #[test]
    fn test_duplicate_sequence_rejected() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::H], act(1)).unwrap();

        let err = trie.register(&[Token::H], act(5)).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateCommand {
                sequence: vec![Token::H],
                existing: act(1),
            }
        );
        assert_eq!(trie.lookup(&[Token::H]), Lookup::Exact(act(1)));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), 2);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let mut trie = CommandTrie::new();
        assert!(matches!(
            trie.register(&[], act(0)),
            Err(Error::InvalidSequence(_))
        ));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_prefix_may_also_be_terminal() {
        crate::logging::test();
        let mut trie = CommandTrie::new();
        trie.register(&[Token::D], act(3)).unwrap();
        trie.register(&[Token::D, Token::D], act(4)).unwrap();

        assert_eq!(trie.lookup(&[Token::D]), Lookup::ExactAndPrefix(act(3)));
        assert_eq!(trie.lookup(&[Token::D, Token::D]), Lookup::Exact(act(4)));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_longer_first_then_prefix() {
        crate::logging::test();
        let mut trie = CommandTrie::new();
        trie.register(&[Token::G, Token::G], act(0)).unwrap();
        // Registering the prefix afterwards is allowed, not a duplicate
        trie.register(&[Token::G], act(1)).unwrap();
        assert_eq!(trie.lookup(&[Token::G]), Lookup::ExactAndPrefix(act(1)));
        assert_eq!(trie.node_count(), 3);
    }

    #[test]
    fn test_lookup_classification() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::G, Token::G], act(0)).unwrap();

        assert_eq!(trie.lookup(&[Token::G]), Lookup::Prefix);
        assert_eq!(trie.lookup(&[Token::G, Token::G]), Lookup::Exact(act(0)));
        assert_eq!(trie.lookup(&[Token::G, Token::X]), Lookup::NotFound);
        assert_eq!(trie.lookup(&[Token::X]), Lookup::NotFound);
        assert_eq!(trie.lookup(&[]), Lookup::Prefix);
    }

    #[test]
    fn test_advance_is_exact() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::A, Token::B], act(0)).unwrap();

        let a = trie.advance(NodeId::ROOT, Token::A).unwrap();
        assert!(trie.advance(NodeId::ROOT, Token::B).is_none());
        assert!(trie.advance(a, Token::A).is_none());
        assert!(trie.advance(a, Token::B).is_some());
    }

    #[test]
    fn test_bindings_in_token_order() {
        let mut trie = CommandTrie::new();
        trie.register(&[Token::J], act(0)).unwrap();
        trie.register(&[Token::D, Token::D], act(1)).unwrap();
        trie.register(&[Token::Control, Token::R], act(2)).unwrap();
        trie.register(&[Token::D], act(3)).unwrap();

        let bindings = trie.bindings();
        assert_eq!(
            bindings,
            vec![
                (vec![Token::D], act(3)),
                (vec![Token::D, Token::D], act(1)),
                (vec![Token::J], act(0)),
                (vec![Token::Control, Token::R], act(2)),
            ]
        );
    }
}
