//! Layout validation for blueprints.
//!
//! A blueprint only becomes a runtime root once its states and element
//! slot arrays line up. Checks run through `Validation` so a single pass
//! reports every mismatch instead of stopping at the first one.

use crate::config::RootConfig;
use crate::core::{Element, ElementType, StateConfig, SCOPED_SLOT_COUNT};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One way a layout can break the slot/state correspondence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutViolation {
    #[error("Element {element} ('{kind}') has {found} slots, expected {expected}")]
    SlotCountMismatch {
        element: usize,
        kind: ElementType,
        expected: usize,
        found: usize,
    },

    #[error("Element {element} scoped to state {state} has {found} slots, expected {expected}")]
    ScopedSlotCountMismatch {
        state: usize,
        element: usize,
        expected: usize,
        found: usize,
    },

    #[error("Initial state {index} out of range (count: {count})")]
    InitialStateOutOfRange { index: usize, count: usize },
}

/// Result of checking a layout.
pub type LayoutCheck = Validation<(), NonEmptyVec<LayoutViolation>>;

/// Check every invariant a runtime root relies on, accumulating ALL
/// violations.
pub fn check_layout<D>(
    config: &RootConfig,
    states: &[StateConfig<D>],
    elements: &[Element<D>],
) -> LayoutCheck {
    let mut checks: Vec<LayoutCheck> = Vec::new();

    for (index, element) in elements.iter().enumerate() {
        checks.push(require(element.slot_count() == states.len(), || {
            LayoutViolation::SlotCountMismatch {
                element: index,
                kind: element.kind().clone(),
                expected: states.len(),
                found: element.slot_count(),
            }
        }));
    }

    for (state, scoped) in states.iter().enumerate() {
        for (index, element) in scoped.elements().iter().enumerate() {
            checks.push(require(element.slot_count() == SCOPED_SLOT_COUNT, || {
                LayoutViolation::ScopedSlotCountMismatch {
                    state,
                    element: index,
                    expected: SCOPED_SLOT_COUNT,
                    found: element.slot_count(),
                }
            }));
        }
    }

    // An empty root has no meaningful current index to check.
    if !states.is_empty() {
        checks.push(require(config.initial_state < states.len(), || {
            LayoutViolation::InitialStateOutOfRange {
                index: config.initial_state,
                count: states.len(),
            }
        }));
    }

    if checks.is_empty() {
        return Validation::success(());
    }

    Validation::all_vec(checks).map(|_| ())
}

fn require<F>(holds: bool, violation: F) -> LayoutCheck
where
    F: FnOnce() -> LayoutViolation,
{
    if holds {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}
