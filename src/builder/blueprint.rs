//! The authoring surface.

use super::error::{AuthoringError, BuildError};
use super::layout::{check_layout, LayoutCheck};
use crate::config::RootConfig;
use crate::core::{
    Agent, AgentRegistry, Element, ElementType, Owner, StateConfig, SCOPED_SLOT_COUNT,
};
use crate::runtime::StateRoot;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;
use uuid::Uuid;

/// Freely editable description of a state root.
///
/// Owns the ordered state list and the top-level elements, and keeps every
/// element's slot array the same length as the state list. Each structural
/// operation checks its arguments first and then updates the state list and
/// every slot array together, so a failed call leaves everything untouched.
///
/// Call [`build`](Self::build) to freeze the blueprint into a [`StateRoot`].
///
/// # Example
///
/// ```rust
/// use switchboard::builder::Blueprint;
/// use switchboard::core::{Agent, Element};
/// use switchboard::StateRoot;
///
/// struct Tint;
///
/// impl Agent<u32> for Tint {
///     fn apply(&self, _root: &StateRoot<u32>, element: &Element<u32>, state: usize) {
///         let _rgb = element.slot(state);
///     }
/// }
///
/// let mut blueprint: Blueprint<u32> = Blueprint::named("Badge").agent("tint", Tint);
/// blueprint.add_named_state("Idle");
/// blueprint.add_element("tint", None).unwrap();
/// blueprint.add_named_state("Alert");
///
/// assert_eq!(blueprint.state_names(), vec!["Idle", "Alert"]);
/// assert_eq!(blueprint.elements()[0].slot_count(), 2);
///
/// let root = blueprint.build().unwrap();
/// assert_eq!(root.state_count(), 2);
/// ```
pub struct Blueprint<D> {
    id: Uuid,
    config: RootConfig,
    registry: AgentRegistry<D>,
    states: Vec<StateConfig<D>>,
    elements: Vec<Element<D>>,
}

impl<D> Blueprint<D> {
    pub fn new(config: RootConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            registry: AgentRegistry::new(),
            states: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(RootConfig::named(name))
    }

    pub fn smooth(mut self, smooth: bool) -> Self {
        self.config.smooth = smooth;
        self
    }

    pub fn click_switches_state(mut self, enabled: bool) -> Self {
        self.config.click_switches_state = enabled;
        self
    }

    pub fn set_on_start(mut self, enabled: bool) -> Self {
        self.config.set_on_start = enabled;
        self
    }

    pub fn initial_state(mut self, index: usize) -> Self {
        self.config.initial_state = index;
        self
    }

    /// Register an agent for `kind` (fluent form).
    pub fn agent<A>(mut self, kind: impl Into<ElementType>, agent: A) -> Self
    where
        A: Agent<D> + 'static,
    {
        self.registry.register(kind, agent);
        self
    }

    /// Register an agent for `kind`, returning the agent it replaced.
    ///
    /// Elements created earlier keep the agent they were created with.
    pub fn register_agent<A>(
        &mut self,
        kind: impl Into<ElementType>,
        agent: A,
    ) -> Option<Arc<dyn Agent<D>>>
    where
        A: Agent<D> + 'static,
    {
        self.registry.register(kind, agent)
    }

    pub fn registry(&self) -> &AgentRegistry<D> {
        &self.registry
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    pub fn states(&self) -> &[StateConfig<D>] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Rename a state, attach its hook, or edit its scoped elements.
    pub fn state_mut(&mut self, index: usize) -> Option<&mut StateConfig<D>> {
        self.states.get_mut(index)
    }

    pub fn elements(&self) -> &[Element<D>] {
        &self.elements
    }

    /// Edit a top-level element's slot payloads.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element<D>> {
        self.elements.get_mut(index)
    }

    /// Display names of the states, in order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(StateConfig::name).collect()
    }

    /// Remove the state at `index` and the matching slot of every top-level
    /// element. Returns the removed state.
    ///
    /// Scoped elements leave with their state. The configured initial state
    /// keeps pointing at the same state; if that state is the one removed,
    /// the state taking its position (or the new last state) becomes initial.
    pub fn remove_state(&mut self, index: usize) -> Result<StateConfig<D>, AuthoringError> {
        self.check_index(index)?;

        let removed = self.states.remove(index);
        for element in &mut self.elements {
            element.remove_slot(index);
        }
        let initial = &mut self.config.initial_state;
        if index < *initial {
            *initial -= 1;
        }
        if *initial >= self.states.len() {
            *initial = self.states.len().saturating_sub(1);
        }

        debug!(root = %self.config.name, index, count = self.states.len(), "state removed");
        Ok(removed)
    }

    /// Exchange the states at `x` and `y` and the matching slots of every
    /// top-level element. The initial state moves with its state.
    pub fn swap_state(&mut self, x: usize, y: usize) -> Result<(), AuthoringError> {
        self.check_index(x)?;
        self.check_index(y)?;

        self.states.swap(x, y);
        for element in &mut self.elements {
            element.swap_slots(x, y);
        }
        let initial = &mut self.config.initial_state;
        if *initial == x {
            *initial = y;
        } else if *initial == y {
            *initial = x;
        }

        debug!(root = %self.config.name, x, y, "states swapped");
        Ok(())
    }

    /// Check the layout without building.
    pub fn validate(&self) -> LayoutCheck {
        check_layout(&self.config, &self.states, &self.elements)
    }

    /// Freeze the blueprint into a runtime root.
    ///
    /// No hook, agent or event runs here; call
    /// [`StateRoot::start`] or a transition to apply the first state.
    pub fn build(self) -> Result<StateRoot<D>, BuildError> {
        if let Validation::Failure(violations) = self.validate() {
            return Err(BuildError::InvalidLayout {
                violations: violations.iter().cloned().collect(),
            });
        }

        debug!(
            root = %self.config.name,
            root_id = %self.id,
            states = self.states.len(),
            elements = self.elements.len(),
            "blueprint built"
        );
        Ok(StateRoot::from_parts(
            self.id,
            self.config,
            self.states,
            self.elements,
        ))
    }

    fn owner(&self) -> Owner<'_> {
        Owner {
            id: self.id,
            config: &self.config,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), AuthoringError> {
        if index < self.states.len() {
            Ok(())
        } else {
            Err(AuthoringError::StateIndexOutOfRange {
                index,
                count: self.states.len(),
            })
        }
    }
}

impl<D: Default> Blueprint<D> {
    /// Append a state named after its index, plus one initialized slot on
    /// every top-level element. Returns the new state's index.
    pub fn add_state(&mut self) -> usize {
        let index = self.states.len();
        self.states.push(StateConfig::new(index.to_string()));
        let owner = Owner {
            id: self.id,
            config: &self.config,
        };
        for element in &mut self.elements {
            element.push_slot(owner);
        }

        debug!(root = %self.config.name, index, "state added");
        index
    }

    /// [`add_state`](Self::add_state), then rename the new state.
    pub fn add_named_state(&mut self, name: impl Into<String>) -> usize {
        let index = self.add_state();
        self.states[index].set_name(name);
        index
    }

    /// Append one named state per entry (fluent form).
    pub fn with_states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_named_state(name);
        }
        self
    }

    /// Create an element of type `kind`.
    ///
    /// With no `scope` the element is top-level and gets one initialized
    /// slot per existing state. With `Some(state)` it is appended to that
    /// state's private list with [`SCOPED_SLOT_COUNT`] slots instead.
    /// Returns the element's index within the list it joined.
    pub fn add_element(
        &mut self,
        kind: impl Into<ElementType>,
        scope: Option<usize>,
    ) -> Result<usize, AuthoringError> {
        let kind = kind.into();
        let agent = self
            .registry
            .resolve(&kind)
            .ok_or_else(|| AuthoringError::UnknownElementType(kind.clone()))?;
        if let Some(state) = scope {
            self.check_index(state)?;
        }

        let slots = scope.map_or(self.states.len(), |_| SCOPED_SLOT_COUNT);
        let mut element = Element::new(kind, agent);
        for _ in 0..slots {
            element.push_slot(self.owner());
        }

        debug!(root = %self.config.name, kind = %element.kind(), ?scope, slots, "element added");
        let index = match scope {
            Some(state) => self.states[state].push_element(element),
            None => {
                self.elements.push(element);
                self.elements.len() - 1
            }
        };
        Ok(index)
    }
}

impl<D: fmt::Debug> fmt::Debug for Blueprint<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("states", &self.states)
            .field("elements", &self.elements)
            .finish()
    }
}
