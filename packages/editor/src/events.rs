//! # Typed Event Emitters
//!
//! Single-threaded observer plumbing for command lifecycle events.
//!
//! Every subscription returns a [`Subscription`] token. Listeners may
//! unsubscribe themselves (or others) while an event is being delivered:
//! a listener retired mid-emission is skipped for the rest of that emission
//! and dropped afterwards. Listeners added mid-emission first see the next
//! event.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Token identifying one listener on one emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(Subscription, Listener<E>)>,
    /// Listeners taken out of `listeners` by an emission in progress
    checked_out: Vec<Subscription>,
    /// Checked-out listeners that were unsubscribed during emission
    retired: Vec<Subscription>,
}

/// Cloneable handle to a list of listeners for events of type `E`
pub struct Emitter<E> {
    inner: Rc<RefCell<Registry<E>>>,
}

/// Non-owning handle, for listeners that need to reach their own emitter
pub struct WeakEmitter<E> {
    inner: Weak<RefCell<Registry<E>>>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Clone for WeakEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
                checked_out: Vec::new(),
                retired: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let subscription = Subscription(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Remove a listener; returns `false` if it was not subscribed
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(sub, _)| *sub != subscription);
        if registry.listeners.len() != before {
            return true;
        }
        if registry.checked_out.contains(&subscription) && !registry.retired.contains(&subscription) {
            registry.retired.push(subscription);
            return true;
        }
        false
    }

    /// Deliver `event` to every listener, in subscription order
    pub fn emit(&self, event: &E) {
        let mut active = {
            let mut registry = self.inner.borrow_mut();
            let active = std::mem::take(&mut registry.listeners);
            registry
                .checked_out
                .extend(active.iter().map(|(sub, _)| *sub));
            active
        };

        for (subscription, listener) in active.iter_mut() {
            if self.inner.borrow().retired.contains(subscription) {
                continue;
            }
            listener(event);
        }

        let mut registry = self.inner.borrow_mut();
        registry
            .checked_out
            .retain(|sub| !active.iter().any(|(own, _)| own == sub));
        let retired: Vec<Subscription> = active
            .iter()
            .map(|(sub, _)| *sub)
            .filter(|sub| registry.retired.contains(sub))
            .collect();
        registry.retired.retain(|sub| !retired.contains(sub));
        active.retain(|(sub, _)| !retired.contains(sub));

        let added = std::mem::take(&mut registry.listeners);
        active.extend(added);
        registry.listeners = active;
    }

    pub fn listener_count(&self) -> usize {
        let registry = self.inner.borrow();
        registry.listeners.len() + registry.checked_out.len() - registry.retired.len()
    }

    pub fn downgrade(&self) -> WeakEmitter<E> {
        WeakEmitter {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<E: 'static> Emitter<E> {
    /// Subscribe a listener that detaches itself after its first event
    pub fn once(&self, listener: impl FnOnce(&E) + 'static) -> Subscription {
        let own_emitter = self.downgrade();
        let token: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));
        let own_token = Rc::clone(&token);
        let mut listener = Some(listener);

        let subscription = self.subscribe(move |event| {
            if let (Some(subscription), Some(emitter)) = (own_token.get(), own_emitter.upgrade()) {
                emitter.unsubscribe(subscription);
            }
            if let Some(listener) = listener.take() {
                listener(event);
            }
        });
        token.set(Some(subscription));
        subscription
    }
}

impl<E> WeakEmitter<E> {
    pub fn upgrade(&self) -> Option<Emitter<E>> {
        self.inner.upgrade().map(|inner| Emitter { inner })
    }
}
