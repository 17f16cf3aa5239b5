//! Core data model of a state root.
//!
//! This module contains the leaf types the controller and the authoring
//! surface are built from:
//! - States with their entry/exit hooks via [`StateConfig`]
//! - Typed elements holding one data slot per state via [`Element`]
//! - Per-type handlers via the [`Agent`] trait
//! - The observer registry and published events via [`EventHub`]

mod agent;
mod element;
mod events;
mod state;

pub use agent::{Agent, AgentRegistry, Owner};
pub use element::{Element, ElementType, SCOPED_SLOT_COUNT};
pub use events::{Click, EventHub, Listener, StateChange, SubscriptionId};
pub use state::{Phase, PhaseHook, StateConfig, StateId};
