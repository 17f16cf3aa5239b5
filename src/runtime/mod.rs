//! The live side of a state root.
//!
//! - [`StateRoot`]: the state controller and its transition protocol
//! - [`SharedRoot`]: a root reachable from several places, with queued requests
//! - [`ClickBinding`]: routes clicks of a bound control into the root
//!
//! Everything here runs synchronously on the caller's thread. A transition
//! has fully completed (exit hook, element application, enter hook and
//! notification) by the time the call returns.

mod click;
mod root;
mod shared;

pub use click::{Button, ClickBinding, ClickListener, Clickable};
pub use root::StateRoot;
pub use shared::{Request, SharedRoot, WeakRoot};
