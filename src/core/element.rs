//! Typed elements and their per-state data slots.

use super::agent::{Agent, Owner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Number of slots an element scoped to a single state carries.
pub const SCOPED_SLOT_COUNT: usize = 2;

/// Discriminant naming an element type ("position", "color", ...).
///
/// Agents are registered against it and resolved once per element.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementType(String);

impl ElementType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed facet of a root, holding one data slot per state.
///
/// Slot `i` belongs to state `i` of the owning root. Only the authoring
/// surface can add or remove slots, so the slot count of a top-level element
/// always follows the root's state count.
pub struct Element<D> {
    kind: ElementType,
    slots: Vec<D>,
    agent: Arc<dyn Agent<D>>,
}

impl<D> Element<D> {
    pub(crate) fn new(kind: ElementType, agent: Arc<dyn Agent<D>>) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            agent,
        }
    }

    pub fn kind(&self) -> &ElementType {
        &self.kind
    }

    /// The agent resolved for this element's type at construction.
    pub fn agent(&self) -> &Arc<dyn Agent<D>> {
        &self.agent
    }

    pub fn slots(&self) -> &[D] {
        &self.slots
    }

    pub fn slot(&self, state: usize) -> Option<&D> {
        self.slots.get(state)
    }

    /// Edit a slot payload in place. The slot count cannot change through here.
    pub fn slot_mut(&mut self, state: usize) -> Option<&mut D> {
        self.slots.get_mut(state)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn remove_slot(&mut self, index: usize) -> D {
        self.slots.remove(index)
    }

    pub(crate) fn swap_slots(&mut self, x: usize, y: usize) {
        self.slots.swap(x, y);
    }
}

impl<D: Default> Element<D> {
    /// Append one default slot and let the agent initialize it.
    pub(crate) fn push_slot(&mut self, owner: Owner<'_>) {
        let mut slot = D::default();
        self.agent.init(owner, self, &mut slot);
        self.slots.push(slot);
    }
}

impl<D: fmt::Debug> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
