//! Change notification.
//!
//! Every node carries an [`Observable`] holding its local observers. A
//! change to a node is delivered to that node's observers first and then
//! forwarded to each ancestor up to the schema root, so observing the
//! schema sees every change in the tree. Delivery is synchronous and
//! carries no payload beyond the identity of the observed node; observers
//! re-read whatever state they need from the schema they are handed.

use crate::graph::{NodeId, Schema};
use std::fmt;
use std::rc::Rc;

/// Receiver of change notifications.
///
/// Observers run while the mutating call is still in progress and only get a
/// shared borrow of the schema, so they may read but not edit. Follow-up edits
/// have to be queued and applied once the mutating call has returned.
pub trait Observer {
    /// Called after a mutation completes on `source` or one of its descendants.
    fn on_change(&self, schema: &Schema, source: NodeId);
}

impl<F> Observer for F
where
    F: Fn(&Schema, NodeId),
{
    fn on_change(&self, schema: &Schema, source: NodeId) {
        self(schema, source)
    }
}

/// Set of observers registered on a single node.
#[derive(Default)]
pub struct Observable {
    observers: Vec<Rc<dyn Observer>>,
}

impl Observable {
    /// Create an observable with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Registering the same observer twice is a no-op.
    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn remove_observer(&mut self, observer: &Rc<dyn Observer>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        self.observers.len() != before
    }

    /// Check if the observer is registered.
    pub fn contains(&self, observer: &Rc<dyn Observer>) -> bool {
        self.observers.iter().any(|o| same_observer(o, observer))
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify local observers only.
    pub(crate) fn notify(&self, schema: &Schema, source: NodeId) {
        for observer in &self.observers {
            observer.on_change(schema, source);
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers.len())
            .finish()
    }
}

// Identity is the data pointer; vtable pointers may differ across codegen units.
fn same_observer(a: &Rc<dyn Observer>, b: &Rc<dyn Observer>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
