//! Errors raised while authoring and building a state root.

use super::layout::LayoutViolation;
use crate::core::ElementType;
use thiserror::Error;

/// Errors from the structural mutation API.
///
/// Every operation validates its arguments before touching anything, so
/// an error always means nothing was changed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthoringError {
    #[error("State index {index} out of range (count: {count})")]
    StateIndexOutOfRange { index: usize, count: usize },

    #[error("No agent registered for element type '{0}'")]
    UnknownElementType(ElementType),
}

/// Errors from [`Blueprint::build`](super::Blueprint::build).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Blueprint layout is invalid: {} violation(s)", .violations.len())]
    InvalidLayout { violations: Vec<LayoutViolation> },
}
