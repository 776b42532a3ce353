//! Reactive Cell - State that re-renders its readers.
//!
//! A cell remembers every render context that read it. Writing the cell
//! re-renders each of those components in place, then returns.
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{cell, component, h, Document, Renderer};
//!
//! let renderer = Renderer::new(Document::new());
//! let counter = cell(0);
//!
//! let c = counter.clone();
//! let view = component(move || h("p").child("count: ").child(c.get()));
//! renderer.mount(&renderer.backend().body(), &view.into())?;
//!
//! counter.write(1)?; // the <p> is replaced with one reading "count: 1"
//! ```
//!
//! # Subscriptions
//!
//! - Reads inside a component register `render id -> component` once per
//!   context; repeated reads overwrite the same entry.
//! - Reads outside any render are untracked.
//! - Entries are never removed eagerly. A write that cannot find a
//!   subscriber's node in the document drops the entry.
//! - There is no batching: every write re-renders its subscribers before
//!   returning, and a component reading N written cells renders N times.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{error, trace};

use crate::engine::{RenderHost, RenderId, current_context};
use crate::error::RenderError;
use crate::types::{Component, Node};

// =============================================================================
// Subscribers
// =============================================================================

#[derive(Clone)]
struct Subscriber {
    component: Component,
    host: Rc<dyn RenderHost>,
}

/// Insertion-ordered `RenderId -> Subscriber` map.
///
/// Re-inserting an existing id replaces the entry in place.
#[derive(Default)]
struct Subscribers {
    entries: Vec<(RenderId, Subscriber)>,
}

impl Subscribers {
    fn insert(&mut self, id: RenderId, subscriber: Subscriber) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = subscriber,
            None => self.entries.push((id, subscriber)),
        }
    }

    fn remove(&mut self, id: RenderId) {
        self.entries.retain(|(key, _)| *key != id);
    }

    fn snapshot(&self) -> Vec<(RenderId, Subscriber)> {
        self.entries.clone()
    }

    fn ids(&self) -> Vec<RenderId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }
}

// =============================================================================
// Read Result
// =============================================================================

/// Value returned by [`ReactiveCell::read`], with whether the read
/// subscribed the current render context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read<T> {
    pub value: T,
    pub registered: bool,
}

// =============================================================================
// Reactive Cell
// =============================================================================

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Subscribers>,
}

/// A value whose readers re-render when it is written.
///
/// Clones share the same value and subscribers.
pub struct ReactiveCell<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().ids())
            .finish()
    }
}

/// Create a reactive cell.
pub fn cell<T: 'static>(value: T) -> ReactiveCell<T> {
    ReactiveCell::new(value)
}

impl<T: 'static> ReactiveCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Subscribers::default()),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Reading
    // -------------------------------------------------------------------------

    /// Subscribe the active render context, if any.
    ///
    /// Returns whether a context was subscribed.
    pub fn track(&self) -> bool {
        let Some(context) = current_context() else {
            return false;
        };
        trace!(render_id = %context.id, "cell read subscribed context");
        self.inner.subscribers.borrow_mut().insert(
            context.id,
            Subscriber {
                component: context.component,
                host: context.host,
            },
        );
        true
    }

    /// Read the value, subscribing the active render context.
    pub fn read(&self) -> Read<T>
    where
        T: Clone,
    {
        let registered = self.track();
        Read {
            value: self.get_untracked(),
            registered,
        }
    }

    /// Read the value, subscribing the active render context.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.read().value
    }

    /// Borrow the value, subscribing the active render context.
    ///
    /// Do not write this cell from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        self.with_untracked(f)
    }

    /// Read the value without subscribing anything.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Borrow the value without subscribing anything.
    ///
    /// Do not write this cell from inside `f`.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    // -------------------------------------------------------------------------
    // Writing
    // -------------------------------------------------------------------------

    /// Replace the value and re-render every subscriber still in the document.
    ///
    /// Subscribers whose node can no longer be found are dropped. All
    /// subscribers are processed even if some fail; the first failure is
    /// returned.
    pub fn write(&self, value: T) -> Result<(), RenderError> {
        *self.inner.value.borrow_mut() = value;
        self.notify()
    }

    /// Write `f(&current)`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), RenderError> {
        let next = f(&self.inner.value.borrow());
        self.write(next)
    }

    fn notify(&self) -> Result<(), RenderError> {
        // Re-renders read this cell again, registering new ids; work on a copy.
        let snapshot = self.inner.subscribers.borrow().snapshot();
        let mut first_error = None;

        for (id, subscriber) in snapshot {
            match subscriber.host.rerender(id, &subscriber.component) {
                Ok(true) => {}
                Ok(false) => {
                    trace!(render_id = %id, "pruning stale subscriber");
                    self.inner.subscribers.borrow_mut().remove(id);
                }
                Err(err) => {
                    error!(
                        render_id = %id,
                        component = subscriber.component.name(),
                        error = %err,
                        "re-render failed"
                    );
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    /// Render ids currently subscribed, in registration order.
    pub fn subscriber_ids(&self) -> Vec<RenderId> {
        self.inner.subscribers.borrow().ids()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().entries.len()
    }
}

impl<T: fmt::Display + 'static> From<&ReactiveCell<T>> for Node {
    /// Tracked read rendered as text.
    fn from(cell: &ReactiveCell<T>) -> Self {
        cell.with(|value| Node::text(value))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::engine::{enter_context, reset_registry, RenderContext};

    /// Host that records re-render requests and reports a fixed liveness.
    struct RecordingHost {
        live: bool,
        calls: RefCell<Vec<RenderId>>,
    }

    impl RenderHost for RecordingHost {
        fn rerender(&self, id: RenderId, _component: &Component) -> Result<bool, RenderError> {
            self.calls.borrow_mut().push(id);
            Ok(self.live)
        }
    }

    fn host(live: bool) -> Rc<RecordingHost> {
        Rc::new(RecordingHost {
            live,
            calls: RefCell::new(Vec::new()),
        })
    }

    fn context(id: u64, host: Rc<RecordingHost>) -> RenderContext {
        RenderContext {
            id: RenderId(id),
            component: Component::new(|| ()),
            host,
        }
    }

    #[test]
    fn test_untracked_outside_render() {
        reset_registry();
        let c = cell(5);
        let read = c.read();
        assert_eq!(read, Read { value: 5, registered: false });
        assert_eq!(c.subscriber_count(), 0);
    }

    #[test]
    fn test_repeated_reads_register_once() {
        reset_registry();
        let c = cell("a".to_string());
        let h = host(true);
        {
            let _guard = enter_context(context(3, h.clone()));
            assert!(c.read().registered);
            assert!(c.read().registered);
            c.with(|v| assert_eq!(v, "a"));
        }
        assert_eq!(c.subscriber_ids(), vec![RenderId(3)]);
    }

    #[test]
    fn test_untracked_reads_inside_render() {
        reset_registry();
        let c = cell(1);
        let _guard = enter_context(context(0, host(true)));
        assert_eq!(c.get_untracked(), 1);
        assert_eq!(c.with_untracked(|v| *v + 1), 2);
        assert_eq!(c.subscriber_count(), 0);
    }

    #[test]
    fn test_nested_contexts_register_innermost() {
        reset_registry();
        let c = cell(0);
        let h = host(true);
        let _outer = enter_context(context(1, h.clone()));
        {
            let _inner = enter_context(context(2, h.clone()));
            c.get();
        }
        assert_eq!(c.subscriber_ids(), vec![RenderId(2)]);
    }

    #[test]
    fn test_write_notifies_in_registration_order() {
        reset_registry();
        let c = cell(0);
        let h = host(true);
        for id in [4, 1, 9] {
            let _guard = enter_context(context(id, h.clone()));
            c.get();
        }
        // re-registration keeps the original position
        {
            let _guard = enter_context(context(1, h.clone()));
            c.get();
        }

        c.write(1).unwrap();
        assert_eq!(*h.calls.borrow(), vec![RenderId(4), RenderId(1), RenderId(9)]);
        assert_eq!(c.get_untracked(), 1);
    }

    #[test]
    fn test_write_prunes_stale_subscribers() {
        reset_registry();
        let c = cell(0);
        let stale = host(false);
        let live = host(true);
        {
            let _guard = enter_context(context(0, stale.clone()));
            c.get();
        }
        {
            let _guard = enter_context(context(1, live.clone()));
            c.get();
        }

        c.write(1).unwrap();
        assert_eq!(c.subscriber_ids(), vec![RenderId(1)]);
        assert_eq!(*stale.calls.borrow(), vec![RenderId(0)]);
        assert_eq!(*live.calls.borrow(), vec![RenderId(1)]);

        c.write(2).unwrap();
        assert_eq!(*stale.calls.borrow(), vec![RenderId(0)]);
        assert_eq!(live.calls.borrow().len(), 2);
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_cascade() {
        struct FailingHost;
        impl RenderHost for FailingHost {
            fn rerender(&self, _id: RenderId, _c: &Component) -> Result<bool, RenderError> {
                Err(RenderError::Backend(crate::error::BackendError::Detached))
            }
        }

        reset_registry();
        let c = cell(0);
        let live = host(true);
        {
            let _guard = enter_context(RenderContext {
                id: RenderId(0),
                component: Component::new(|| ()),
                host: Rc::new(FailingHost),
            });
            c.get();
        }
        {
            let _guard = enter_context(context(1, live.clone()));
            c.get();
        }

        let result = c.write(7);
        assert!(result.is_err());
        assert_eq!(*live.calls.borrow(), vec![RenderId(1)]);
        // failures are not stale; the entry stays
        assert_eq!(c.subscriber_ids(), vec![RenderId(0), RenderId(1)]);
    }

    #[test]
    fn test_write_after_untracked_borrow_ends() {
        reset_registry();
        let c = cell(vec![1]);
        let len = c.with_untracked(|v| v.len());
        c.write(vec![1, 2, len + 1]).unwrap();
        c.update(|v| v.iter().map(|n| n * 2).collect()).unwrap();
        assert_eq!(c.get_untracked(), vec![2, 4, 6]);
    }

    #[test]
    fn test_update() {
        let c = cell(2);
        c.update(|v| v * 10).unwrap();
        assert_eq!(c.get(), 20);
    }

    #[test]
    fn test_clones_share_state() {
        reset_registry();
        let a = cell(0);
        let b = a.clone();
        {
            let _guard = enter_context(context(0, host(true)));
            b.get();
        }
        a.write(3).unwrap();
        assert_eq!(b.get_untracked(), 3);
        assert_eq!(a.subscriber_count(), 1);
    }

    #[test]
    fn test_node_from_cell_is_tracked() {
        reset_registry();
        let c = cell(12);
        let touched = Cell::new(false);
        {
            let _guard = enter_context(context(0, host(true)));
            let node = Node::from(&c);
            touched.set(matches!(node, Node::Text(ref s) if s == "12"));
        }
        assert!(touched.get());
        assert_eq!(c.subscriber_count(), 1);
    }
}
