//! Switchboard: a per-object finite-state switchboard
//!
//! A state root owns an ordered list of named states and an ordered list of
//! typed elements (position, color, visibility, text, ...). Every element
//! carries one data slot per state. Switching the root's current state hands
//! each element's slot for that state to the agent registered for the
//! element's type, and fires entry/exit hooks on the states themselves.
//!
//! # Core Concepts
//!
//! - **State**: a named phase with an entry/exit hook via [`StateConfig`]
//! - **Element**: a typed facet with one data slot per state via [`Element`]
//! - **Agent**: the per-type handler that initializes and applies slots
//! - **Blueprint**: the authoring surface that keeps states and slots in step
//! - **StateRoot**: the validated runtime controller and its transition protocol
//!
//! # Example
//!
//! ```rust
//! use switchboard::builder::Blueprint;
//! use switchboard::core::{Agent, Element, Phase};
//! use switchboard::StateRoot;
//!
//! #[derive(Default, Clone, Debug, PartialEq)]
//! struct Look {
//!     visible: bool,
//! }
//!
//! struct Visibility;
//!
//! impl Agent<Look> for Visibility {
//!     fn apply(&self, _root: &StateRoot<Look>, element: &Element<Look>, state: usize) {
//!         let _visible = element.slot(state).map(|look| look.visible);
//!     }
//! }
//!
//! let mut blueprint: Blueprint<Look> = Blueprint::named("Panel")
//!     .agent("visibility", Visibility)
//!     .with_states(["Hidden", "Shown"]);
//! blueprint.add_element("visibility", None).unwrap();
//! blueprint.element_mut(0).unwrap().slot_mut(1).unwrap().visible = true;
//! blueprint
//!     .state_mut(1)
//!     .unwrap()
//!     .on_phase(|_root, phase| assert_eq!(phase, Phase::Enter));
//!
//! let mut root = blueprint.build().unwrap();
//! assert!(root.set_current_state(1, true));
//! assert_eq!(root.current_state_name(), Some("Shown"));
//! assert!(!root.next_state());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use crate::builder::{AuthoringError, Blueprint, BuildError};
pub use crate::config::{ConfigError, RootConfig};
pub use crate::core::{
    Agent, Element, ElementType, EventHub, Owner, Phase, StateChange, StateConfig,
};
pub use crate::runtime::{Button, ClickBinding, Clickable, SharedRoot, StateRoot, WeakRoot};
