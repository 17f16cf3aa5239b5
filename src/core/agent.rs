//! Per-type handlers that interpret element data.
//!
//! An agent owns no data. It establishes defaults for freshly created slots
//! and applies the slot belonging to a target state whenever the root
//! transitions. Whether application snaps or animates is the agent's call;
//! it may consult [`StateRoot::is_smooth`] through the root reference.

use super::element::{Element, ElementType};
use crate::config::RootConfig;
use crate::runtime::StateRoot;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The root a slot is being created for.
#[derive(Clone, Copy, Debug)]
pub struct Owner<'a> {
    /// Identity the built root will carry.
    pub id: Uuid,
    pub config: &'a RootConfig,
}

impl<'a> Owner<'a> {
    pub fn name(&self) -> &'a str {
        &self.config.name
    }
}

/// Handler for one element type.
///
/// `apply` must have taken effect (or scheduled its animation) by the time
/// it returns; the controller treats every transition as synchronous.
///
/// # Example
///
/// ```rust
/// use switchboard::core::{Agent, Element, Owner};
/// use switchboard::StateRoot;
///
/// #[derive(Default, Clone, Debug)]
/// struct Opacity(f32);
///
/// struct OpacityAgent;
///
/// impl Agent<Opacity> for OpacityAgent {
///     fn init(&self, _owner: Owner<'_>, _element: &Element<Opacity>, slot: &mut Opacity) {
///         slot.0 = 1.0;
///     }
///
///     fn apply(&self, root: &StateRoot<Opacity>, element: &Element<Opacity>, state: usize) {
///         if let Some(target) = element.slot(state) {
///             let mode = if root.is_smooth() { "fade" } else { "snap" };
///             println!("{mode} to {}", target.0);
///         }
///     }
/// }
/// ```
pub trait Agent<D>: Send + Sync {
    /// Establish default data for a newly created slot.
    ///
    /// Called exactly once per slot, before the slot is attached to
    /// `element`. The default implementation leaves `D::default()` in place.
    fn init(&self, owner: Owner<'_>, element: &Element<D>, slot: &mut D) {
        let _ = (owner, element, slot);
    }

    /// Apply `element`'s data for `state` to whatever the element represents.
    fn apply(&self, root: &StateRoot<D>, element: &Element<D>, state: usize);
}

/// Lookup from element type to its agent.
pub struct AgentRegistry<D> {
    agents: HashMap<ElementType, Arc<dyn Agent<D>>>,
}

impl<D> AgentRegistry<D> {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register `agent` for `kind`, returning the agent it replaced.
    pub fn register<A>(
        &mut self,
        kind: impl Into<ElementType>,
        agent: A,
    ) -> Option<Arc<dyn Agent<D>>>
    where
        A: Agent<D> + 'static,
    {
        self.register_shared(kind, Arc::new(agent))
    }

    /// Register an agent that is already shared elsewhere.
    pub fn register_shared(
        &mut self,
        kind: impl Into<ElementType>,
        agent: Arc<dyn Agent<D>>,
    ) -> Option<Arc<dyn Agent<D>>> {
        self.agents.insert(kind.into(), agent)
    }

    pub fn resolve(&self, kind: &ElementType) -> Option<Arc<dyn Agent<D>>> {
        self.agents.get(kind).cloned()
    }

    pub fn contains(&self, kind: &ElementType) -> bool {
        self.agents.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl<D> Default for AgentRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for AgentRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.agents.keys()).finish()
    }
}
