//! Authoring API for state roots.
//!
//! A [`Blueprint`] is edited freely: states are added, removed and
//! reordered, elements are attached, payloads are tweaked. Once the layout
//! is right, [`Blueprint::build`] validates it and produces the runtime
//! [`StateRoot`](crate::StateRoot).

pub mod blueprint;
pub mod error;
pub mod layout;

pub use blueprint::Blueprint;
pub use error::{AuthoringError, BuildError};
pub use layout::{check_layout, LayoutCheck, LayoutViolation};
