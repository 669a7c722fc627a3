//! Publish/subscribe primitive used for workspace and project notifications.
//!
//! An [`Observable`] is a cheap, clonable handle to a subscriber list. Every
//! clone publishes to the same subscribers. An [`Observer`] binds one callback
//! to any number of publishers and releases all of those subscriptions when
//! it is disconnected or dropped.
//!
//! Delivery is synchronous and ordered by subscription time. A failing
//! callback stops the broadcast and its error is handed back to whoever
//! called [`Observable::notify`]; the remaining subscribers are not called.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::Result;

/// Shared subscriber callback.
pub type Callback<E> = Rc<dyn Fn(&E) -> Result<()>>;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscribers<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<E>)>,
}

/// A publisher of `E` notifications.
pub struct Observable<E> {
    inner: Rc<RefCell<Subscribers<E>>>,
}

impl<E> Clone for Observable<E> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<E> Default for Observable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observable<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> Observable<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Rc::new(RefCell::new(Subscribers { next_id: 0, entries: Vec::new() })) }
    }

    /// Register `callback`; it is called for every later [`notify`](Self::notify).
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) -> Result<()> + 'static,
    {
        self.subscribe_shared(Rc::new(callback))
    }

    /// Register an already shared callback.
    pub fn subscribe_shared(&self, callback: Callback<E>) -> SubscriptionId {
        let mut subs = self.inner.borrow_mut();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.entries.push((id, callback));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.borrow_mut();
        let before = subs.entries.len();
        subs.entries.retain(|(entry_id, _)| *entry_id != id);
        subs.entries.len() != before
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Deliver `event` to every subscriber in subscription order.
    ///
    /// The subscriber list is captured before delivery starts, so callbacks
    /// may subscribe or unsubscribe without affecting the current broadcast.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a callback.
    pub fn notify(&self, event: &E) -> Result<()> {
        let snapshot: Vec<Callback<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event)?;
        }
        Ok(())
    }

    /// Whether two handles publish to the same subscriber list.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn downgrade(&self) -> Weak<RefCell<Subscribers<E>>> {
        Rc::downgrade(&self.inner)
    }
}

/// One callback attached to many publishers.
pub struct Observer<E> {
    callback: Callback<E>,
    targets: Vec<(Weak<RefCell<Subscribers<E>>>, SubscriptionId)>,
}

impl<E> Observer<E> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E) -> Result<()> + 'static,
    {
        Self { callback: Rc::new(callback), targets: Vec::new() }
    }

    /// Subscribe to `target`. Observing the same publisher twice is a no-op
    /// and returns `false`.
    pub fn observe(&mut self, target: &Observable<E>) -> bool {
        self.prune();
        if self.position(target).is_some() {
            return false;
        }
        let id = target.subscribe_shared(Rc::clone(&self.callback));
        self.targets.push((target.downgrade(), id));
        true
    }

    /// Stop observing `target`. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, target: &Observable<E>) -> bool {
        self.prune();
        let Some(index) = self.position(target) else {
            return false;
        };
        let (_, id) = self.targets.remove(index);
        target.unsubscribe(id);
        true
    }

    /// Unsubscribe from every observed publisher that is still alive.
    pub fn disconnect(&mut self) {
        for (weak, id) in self.targets.drain(..) {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        }
    }

    /// Number of observed publishers that are still alive.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.iter().filter(|(weak, _)| weak.strong_count() > 0).count()
    }

    /// Forget publishers that have been dropped.
    fn prune(&mut self) {
        self.targets.retain(|(weak, _)| weak.strong_count() > 0);
    }

    fn position(&self, target: &Observable<E>) -> Option<usize> {
        let ptr = Rc::as_ptr(&target.inner);
        self.targets.iter().position(|(weak, _)| std::ptr::eq(weak.as_ptr(), ptr))
    }
}

impl<E> Drop for Observer<E> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
