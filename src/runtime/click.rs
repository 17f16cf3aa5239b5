//! Binding a clickable control to a root.

use super::root::StateRoot;
use super::shared::SharedRoot;
use crate::core::{EventHub, SubscriptionId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Parameterless click callback.
pub type ClickListener = Arc<dyn Fn() + Send + Sync>;

/// Anything that can report clicks.
pub trait Clickable: Send + Sync {
    fn add_listener(&self, listener: ClickListener) -> SubscriptionId;

    /// Returns `false` if `id` was not registered.
    fn remove_listener(&self, id: SubscriptionId) -> bool;
}

/// In-process clickable control.
///
/// Clones share the same listeners, so a clone can be handed to whatever
/// produces the clicks.
#[derive(Clone, Default)]
pub struct Button {
    clicks: EventHub<()>,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one click to every listener.
    pub fn click(&self) {
        self.clicks.emit(&());
    }

    pub fn listener_count(&self) -> usize {
        self.clicks.len()
    }
}

impl Clickable for Button {
    fn add_listener(&self, listener: ClickListener) -> SubscriptionId {
        self.clicks.subscribe(move |_| listener())
    }

    fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.clicks.unsubscribe(id)
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

struct Bound {
    control: Arc<dyn Clickable>,
    listener: SubscriptionId,
}

/// Routes clicks of at most one control into [`StateRoot::click`].
///
/// Rebinding unregisters from the previous control before registering on
/// the new one, and dropping the binding unregisters too, so a control never
/// holds more than one listener from a binding and never calls into a
/// binding that is gone.
///
/// Clicks go through [`SharedRoot::request`]: a click that arrives while the
/// root is dispatching, whether from one of its own subscribers or from
/// another thread, runs once that dispatch is over.
///
/// # Example
///
/// ```rust
/// use switchboard::builder::Blueprint;
/// use switchboard::runtime::{Button, ClickBinding, SharedRoot};
/// use std::sync::Arc;
///
/// let mut blueprint: Blueprint<()> = Blueprint::named("Toggle").click_switches_state(true);
/// blueprint.add_named_state("Off");
/// blueprint.add_named_state("On");
/// let root = SharedRoot::new(blueprint.build().unwrap());
///
/// let button = Button::new();
/// let _binding = ClickBinding::with_control(root.clone(), Arc::new(button.clone()));
///
/// button.click();
/// assert_eq!(root.read(|root| root.current_index()), Some(1));
/// button.click();
/// assert_eq!(root.read(|root| root.current_index()), Some(0));
/// ```
pub struct ClickBinding<D> {
    root: SharedRoot<D>,
    bound: Option<Bound>,
}

impl<D: Send + 'static> ClickBinding<D> {
    pub fn new(root: SharedRoot<D>) -> Self {
        Self { root, bound: None }
    }

    pub fn with_control(root: SharedRoot<D>, control: Arc<dyn Clickable>) -> Self {
        let mut binding = Self::new(root);
        binding.bind(Some(control));
        binding
    }

    /// Point the binding at `control`, or at nothing.
    ///
    /// Binding the control that is already bound does nothing.
    pub fn bind(&mut self, control: Option<Arc<dyn Clickable>>) {
        let unchanged = match (&self.bound, &control) {
            (Some(bound), Some(control)) => Arc::ptr_eq(&bound.control, control),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.unbind();

        if let Some(control) = control {
            let root = self.root.downgrade();
            let listener = control.add_listener(Arc::new(move || root.request(StateRoot::click)));
            debug!(listener = ?listener, "click control bound");
            self.bound = Some(Bound { control, listener });
        }
    }
}

impl<D> ClickBinding<D> {
    /// Remove the listener from the bound control, if any.
    pub fn unbind(&mut self) {
        if let Some(bound) = self.bound.take() {
            bound.control.remove_listener(bound.listener);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn control(&self) -> Option<&Arc<dyn Clickable>> {
        self.bound.as_ref().map(|bound| &bound.control)
    }

    pub fn root(&self) -> &SharedRoot<D> {
        &self.root
    }
}

impl<D> Drop for ClickBinding<D> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<D> fmt::Debug for ClickBinding<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickBinding")
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}
