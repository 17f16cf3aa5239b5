//! A root shared between its owner and whatever drives it.

use super::root::StateRoot;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// A deferred operation on a shared root.
pub type Request<D> = Box<dyn FnOnce(&mut StateRoot<D>) + Send>;

struct Inner<D> {
    root: Mutex<StateRoot<D>>,
    pending: Mutex<VecDeque<Request<D>>>,
}

/// Cloneable handle to a root used from several places at once.
///
/// Every mutation goes through [`request`](Self::request). Requests run in
/// arrival order, one at a time. A request made while another one is being
/// dispatched (from a hook, an agent or a subscriber of the same root, or
/// from another thread) is queued and runs right after the current one
/// finishes, on the thread that is dispatching. Nothing here blocks on the
/// root, so a transition started from inside a transition cannot deadlock.
///
/// # Example
///
/// ```rust
/// use switchboard::builder::Blueprint;
/// use switchboard::runtime::SharedRoot;
///
/// let mut blueprint: Blueprint<()> = Blueprint::named("Stepper");
/// blueprint.add_state();
/// blueprint.add_state();
/// blueprint.add_state();
/// let shared = SharedRoot::new(blueprint.build().unwrap());
///
/// // Arriving at 1 immediately asks for 2.
/// let handle = shared.downgrade();
/// shared.read(|root| {
///     root.on_state_change().subscribe(move |change| {
///         if change.to == 1 {
///             handle.request(|root| {
///                 root.set_state(2);
///             });
///         }
///     })
/// });
///
/// shared.request(|root| {
///     root.set_state(1);
/// });
/// assert_eq!(shared.read(|root| root.current_index()), Some(2));
/// ```
pub struct SharedRoot<D> {
    inner: Arc<Inner<D>>,
}

impl<D> SharedRoot<D> {
    pub fn new(root: StateRoot<D>) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: Mutex::new(root),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Non-owning handle, for hooks and subscribers of this same root.
    pub fn downgrade(&self) -> WeakRoot<D> {
        WeakRoot {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Run `request` against the root, now or after the dispatch in
    /// progress.
    pub fn request<F>(&self, request: F)
    where
        F: FnOnce(&mut StateRoot<D>) + Send + 'static,
    {
        self.inner.pending.lock().push_back(Box::new(request));
        self.drain();
    }

    /// Look at the root. Returns `None` while a request is being dispatched.
    pub fn read<R>(&self, read: impl FnOnce(&StateRoot<D>) -> R) -> Option<R> {
        let root = self.inner.root.try_lock()?;
        Some(read(&*root))
    }

    /// Requests waiting behind the dispatch in progress.
    pub fn pending(&self) -> usize {
        self.inner.pending.lock().len()
    }

    fn drain(&self) {
        loop {
            let Some(mut root) = self.inner.root.try_lock() else {
                // Whoever holds the root picks the request up before letting go.
                debug!(queued = self.pending(), "root busy, request queued");
                return;
            };
            loop {
                let next = self.inner.pending.lock().pop_front();
                match next {
                    Some(request) => request(&mut *root),
                    None => break,
                }
            }
            drop(root);

            // A request may have been queued between the last pop and the unlock.
            if self.inner.pending.lock().is_empty() {
                return;
            }
        }
    }
}

impl<D> Clone for SharedRoot<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> fmt::Debug for SharedRoot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRoot")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Weak counterpart of [`SharedRoot`].
///
/// Capturing a `SharedRoot` inside one of the root's own subscribers would
/// keep the root alive forever; capture this instead.
pub struct WeakRoot<D> {
    inner: Weak<Inner<D>>,
}

impl<D> WeakRoot<D> {
    pub fn upgrade(&self) -> Option<SharedRoot<D>> {
        self.inner.upgrade().map(|inner| SharedRoot { inner })
    }

    /// [`SharedRoot::request`], or nothing if the root is gone.
    pub fn request<F>(&self, request: F)
    where
        F: FnOnce(&mut StateRoot<D>) + Send + 'static,
    {
        if let Some(shared) = self.upgrade() {
            shared.request(request);
        }
    }
}

impl<D> Clone for WeakRoot<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<D> fmt::Debug for WeakRoot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRoot")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
