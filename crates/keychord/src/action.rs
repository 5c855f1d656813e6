//! Host-owned action table.
//!
//! The trie never stores callables. Each terminal node holds an
//! [`ActionId`], a stable index into an [`ActionRegistry`] that the host
//! builds at startup and that owns the actual editing closures.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Opaque handle to a registered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(usize);

impl ActionId {
    /// Build a handle from a raw index. Mostly useful in tests and for hosts
    /// that keep their own action tables.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

type ActionFn<C> = Box<dyn Fn(&mut C)>;

struct Entry<C> {
    name: String,
    run: ActionFn<C>,
}

/// Named editing actions invoked against a host context `C`.
pub struct ActionRegistry<C> {
    entries: Vec<Entry<C>>,
    by_name: HashMap<String, ActionId>,
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a named action, returning its handle.
    ///
    /// Names are unique; registering the same name twice is an error.
    pub fn register<F>(&mut self, name: impl Into<String>, run: F) -> Result<ActionId>
    where
        F: Fn(&mut C) + 'static,
    {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateAction(name));
        }

        let id = ActionId(self.entries.len());
        self.by_name.insert(name.clone(), id);
        self.entries.push(Entry {
            name,
            run: Box::new(run),
        });
        Ok(id)
    }

    /// Look up a handle by action name.
    pub fn id(&self, name: &str) -> Option<ActionId> {
        self.by_name.get(name).copied()
    }

    /// Look up a handle by name, failing with [`Error::UnknownAction`].
    pub fn resolve(&self, name: &str) -> Result<ActionId> {
        self.id(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))
    }

    /// Name an action was registered under.
    pub fn name(&self, id: ActionId) -> Option<&str> {
        self.entries.get(id.0).map(|entry| entry.name.as_str())
    }

    /// Run the action once against `context`.
    pub fn invoke(&self, id: ActionId, context: &mut C) -> Result<()> {
        let entry = self.entries.get(id.0).ok_or(Error::UnknownActionId(id))?;
        (entry.run)(context);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered action names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_invoke() {
        let mut registry: ActionRegistry<Vec<&'static str>> = ActionRegistry::new();
        let left = registry.register("move_left", |log| log.push("left")).unwrap();
        let right = registry
            .register("move_right", |log| log.push("right"))
            .unwrap();

        assert_ne!(left, right);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id("move_left"), Some(left));
        assert_eq!(registry.name(right), Some("move_right"));

        let mut log = Vec::new();
        registry.invoke(right, &mut log).unwrap();
        registry.invoke(left, &mut log).unwrap();
        assert_eq!(log, vec!["right", "left"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry: ActionRegistry<u32> = ActionRegistry::new();
        registry.register("undo", |n| *n += 1).unwrap();
        let err = registry.register("undo", |n| *n += 2).unwrap_err();
        assert_eq!(err, Error::DuplicateAction("undo".to_string()));
        assert_eq!(registry.len(), 1);

        // The first registration is the one that runs
        let mut n = 0;
        registry.invoke(registry.id("undo").unwrap(), &mut n).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_unknown_lookups() {
        let registry: ActionRegistry<()> = ActionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.id("nope"), None);
        assert_eq!(
            registry.resolve("nope"),
            Err(Error::UnknownAction("nope".to_string()))
        );

        let stray = ActionId::from_index(3);
        assert_eq!(registry.name(stray), None);
        assert_eq!(
            registry.invoke(stray, &mut ()),
            Err(Error::UnknownActionId(stray))
        );
    }
}
