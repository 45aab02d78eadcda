//! Event system following Game Engine Architecture Ch 16.8
//!
//! Two channels live here:
//! - [`ProximityBus`]: same-tick position broadcast between behaviors
//! - [`EventSystem`]: scene notifications for an outside presentation layer
//!   (info popups, population readouts). Handlers return true to consume.

pub mod proximity;

use std::collections::HashMap;

use crate::scene::{EntityId, EntityKind};

pub use proximity::{ProximityBus, Subscription};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// An entity should be described by name
    Describe,
    /// A pointer ray crossed several entities at once
    DescribeMany,
    /// Selection membership changed
    SelectionChanged,
    /// An entity joined the scene
    Spawned,
    /// An entity left the scene
    Removed,
}

/// Scene notification
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Show information about one entity
    Describe {
        /// Entity being described
        entity: EntityId,
        /// Display name
        name: String,
    },

    /// Show information about every entity under the pointer
    DescribeMany {
        /// Display names, nearest first
        names: Vec<String>,
    },

    /// Selection toggled
    SelectionChanged {
        /// Toggled entity
        entity: EntityId,
        /// Membership after the toggle
        selected: bool,
    },

    /// Entity added to the registry
    Spawned {
        /// New entity
        entity: EntityId,
        /// Its kind
        kind: EntityKind,
    },

    /// Entity removed from the registry
    Removed {
        /// Former entity
        entity: EntityId,
        /// Its kind
        kind: EntityKind,
    },
}

impl SceneEvent {
    /// Type used for handler routing
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Describe { .. } => EventType::Describe,
            Self::DescribeMany { .. } => EventType::DescribeMany,
            Self::SelectionChanged { .. } => EventType::SelectionChanged,
            Self::Spawned { .. } => EventType::Spawned,
            Self::Removed { .. } => EventType::Removed,
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &SceneEvent) -> bool;
}

impl<F: FnMut(&SceneEvent) -> bool> EventHandler for F {
    fn on_event(&mut self, event: &SceneEvent) -> bool {
        self(event)
    }
}

/// Event queue with per-type handler registration
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<SceneEvent>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: SceneEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch all pending events, returning how many were delivered
    pub fn dispatch(&mut self) -> usize {
        let queued = std::mem::take(&mut self.queue);
        let count = queued.len();
        for event in &queued {
            self.dispatch_event(event);
        }
        count
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &SceneEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn some_entity() -> EntityId {
        EntityId::from(KeyData::from_ffi(1))
    }

    fn recording(consume: bool, log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Box<dyn EventHandler> {
        let log = Rc::clone(log);
        Box::new(move |event: &SceneEvent| {
            if let SceneEvent::Describe { name, .. } = event {
                log.borrow_mut().push(format!("{tag}:{name}"));
            }
            consume
        })
    }

    #[test]
    fn test_immediate_dispatch() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        system.register_handler(EventType::Describe, recording(false, &log, "a"));

        system.send(SceneEvent::Describe { entity: some_entity(), name: "hare".into() });
        assert_eq!(system.pending(), 1);
        assert_eq!(system.dispatch(), 1);

        assert_eq!(log.borrow().as_slice(), &["a:hare".to_string()]);
        assert_eq!(system.pending(), 0);
    }

    #[test]
    fn test_event_consumption() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        // First handler consumes, second never sees it
        system.register_handler(EventType::Describe, recording(true, &log, "first"));
        system.register_handler(EventType::Describe, recording(false, &log, "second"));

        system.send(SceneEvent::Describe { entity: some_entity(), name: "tree".into() });
        system.dispatch();

        assert_eq!(log.borrow().as_slice(), &["first:tree".to_string()]);
    }

    #[test]
    fn test_unrouted_events_are_dropped() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        system.register_handler(EventType::Describe, recording(false, &log, "a"));

        system.send(SceneEvent::Removed { entity: some_entity(), kind: EntityKind::Grass });
        system.dispatch();

        assert!(log.borrow().is_empty());
    }
}
