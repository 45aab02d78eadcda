//! Synchronous position broadcast from predators to prey
//!
//! [`ProximityBus::publish`] calls every subscriber, in subscription order,
//! before it returns. Nothing is buffered between calls.
//!
//! Each subscription is owned through a [`Subscription`] handle. Dropping the
//! handle removes the callback, so a behavior that owns its handle stops
//! receiving positions the moment its entity is destroyed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::math::Vec3;

type Callback = Rc<RefCell<dyn FnMut(Vec3)>>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

/// Publish/subscribe channel for predator positions
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct ProximityBus {
    inner: Rc<RefCell<BusInner>>,
}

impl ProximityBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it stays registered while the handle lives
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(Vec3) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, callback));

        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `position` to every current subscriber
    ///
    /// Returns the number of callbacks invoked. Subscriptions added or
    /// released by a callback take effect from the next publish.
    pub fn publish(&self, position: Vec3) -> usize {
        let snapshot: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in &snapshot {
            // A callback that is already running (publish from inside itself) is skipped
            if let Ok(mut running) = callback.try_borrow_mut() {
                (&mut *running)(position);
            }
        }
        snapshot.len()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl std::fmt::Debug for ProximityBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle owning one bus subscription
///
/// Dropping it unsubscribes. The handle does not keep the bus alive.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// Release the subscription explicitly
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// True while the bus exists and still holds this subscription
    pub fn is_active(&self) -> bool {
        self.bus.upgrade().is_some_and(|bus| {
            bus.borrow().subscribers.iter().any(|(id, _)| *id == self.id)
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if let Ok(mut inner) = bus.try_borrow_mut() {
                inner.subscribers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<(u32, Vec3)>>>, tag: u32) -> impl FnMut(Vec3) + 'static {
        let log = Rc::clone(log);
        move |position| log.borrow_mut().push((tag, position))
    }

    #[test]
    fn test_publish_reaches_all_in_order() {
        let bus = ProximityBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _a = bus.subscribe(recorder(&log, 1));
        let _b = bus.subscribe(recorder(&log, 2));

        let position = Vec3::new(10.0, 0.0, 10.0);
        assert_eq!(bus.publish(position), 2);

        let log = log.borrow();
        assert_eq!(log.as_slice(), &[(1, position), (2, position)]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = ProximityBus::new();
        assert_eq!(bus.publish(Vec3::zeros()), 0);
    }

    #[test]
    fn test_dropped_subscription_is_never_called() {
        let bus = ProximityBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let keep = bus.subscribe(recorder(&log, 1));
        let gone = bus.subscribe(recorder(&log, 2));

        drop(gone);
        bus.publish(Vec3::zeros());

        assert_eq!(bus.subscriber_count(), 1);
        assert!(log.borrow().iter().all(|(tag, _)| *tag == 1));
        assert!(keep.is_active());
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let bus = ProximityBus::new();
        let subscription = bus.subscribe(|_| {});
        assert_eq!(bus.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = ProximityBus::new();
        let subscription = bus.subscribe(|_| {});
        drop(bus);

        // Dropping after the bus is gone is a no-op
        assert!(!subscription.is_active());
        drop(subscription);
    }

    #[test]
    fn test_unsubscribe_from_inside_callback() {
        let bus = ProximityBus::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let inner_slot = Rc::clone(&slot);
        let inner_calls = Rc::clone(&calls);
        let subscription = bus.subscribe(move |_| {
            *inner_calls.borrow_mut() += 1;
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        bus.publish(Vec3::zeros());
        bus.publish(Vec3::zeros());

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
