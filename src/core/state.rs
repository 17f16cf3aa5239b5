//! Named states and their entry/exit hooks.
//!
//! A state is a named phase of its owning root. It carries an optional
//! phase hook, fired with [`Phase::Exit`] when the root leaves it and
//! [`Phase::Enter`] when the root arrives, plus a private list of elements
//! scoped to that state alone.

use super::element::Element;
use crate::runtime::StateRoot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Which side of a transition a phase hook is observing.
///
/// The discriminants match the wire values hosts historically used
/// (`Enter = 0`, `Exit = 1`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// The root has just arrived in this state.
    Enter = 0,
    /// The root is about to leave this state.
    Exit = 1,
}

impl Phase {
    /// Display name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Exit => "Exit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable identity of a state.
///
/// Positions change under swap and removal; the id travels with the state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateId(Uuid);

impl StateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Entry/exit callback attached to a state.
///
/// Runs mid-transition with shared access only. Follow-up transitions go
/// through [`WeakRoot::request`](crate::runtime::WeakRoot::request).
pub type PhaseHook<D> = Arc<dyn Fn(&StateRoot<D>, Phase) + Send + Sync>;

/// A named state of a [`StateRoot`].
///
/// # Example
///
/// ```rust
/// use switchboard::core::{Phase, StateConfig};
///
/// let mut state: StateConfig<()> = StateConfig::new("Idle");
/// state.on_phase(|root, phase| {
///     if phase == Phase::Enter {
///         println!("{} is now idle", root.name());
///     }
/// });
///
/// assert_eq!(state.name(), "Idle");
/// assert!(state.has_hook());
/// ```
pub struct StateConfig<D> {
    id: StateId,
    name: String,
    elements: Vec<Element<D>>,
    hook: Option<PhaseHook<D>>,
}

impl<D> StateConfig<D> {
    /// Create a state with a fresh id, no hook and no scoped elements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StateId::new(),
            name: name.into(),
            elements: Vec::new(),
            hook: None,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Install the entry/exit hook, replacing any previous one.
    pub fn on_phase<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&StateRoot<D>, Phase) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn clear_hook(&mut self) {
        self.hook = None;
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Elements scoped to this state only. The controller never applies them.
    pub fn elements(&self) -> &[Element<D>] {
        &self.elements
    }

    /// Mutable access to one scoped element's slot payloads.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element<D>> {
        self.elements.get_mut(index)
    }

    pub(crate) fn push_element(&mut self, element: Element<D>) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Invoke the hook, if any.
    pub(crate) fn fire(&self, root: &StateRoot<D>, phase: Phase) {
        if let Some(hook) = &self.hook {
            hook(root, phase);
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for StateConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("elements", &self.elements)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
