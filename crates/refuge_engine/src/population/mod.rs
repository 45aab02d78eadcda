//! Population counts driven from outside the scene
//!
//! A [`PopulationBridge`] exposes named counts (`hawks`, `hares`, `cedars`,
//! `bushes`) and notifies when one changes. [`PopulationSync`] turns those
//! numbers into [`SceneRegistry::reconcile_count`] calls. Notifications are
//! queued and applied between ticks, never from inside the bridge callback.
//!
//! [`GrowthRule`] adds trees as simulated days pass.
//!
//! [`SceneRegistry::reconcile_count`]: crate::scene::SceneRegistry::reconcile_count

mod growth;
mod sync;

use std::collections::HashMap;

use crate::config::InitialPopulation;

pub use growth::GrowthRule;
pub use sync::{PopulationChange, PopulationSync};

/// Callback invoked with a key's new count
pub type CountCallback = Box<dyn FnMut(u32)>;

/// External source of population targets
pub trait PopulationBridge {
    /// Current counts for `keys`, in the same order; unknown keys read as 0
    fn get_counts(&self, keys: &[&str]) -> Vec<u32>;

    /// Register a callback fired whenever `key` changes
    fn on_count_change(&mut self, key: &str, callback: CountCallback);
}

/// In-process bridge holding counts in a map
#[derive(Default)]
pub struct MemoryBridge {
    counts: HashMap<String, u32>,
    listeners: HashMap<String, Vec<CountCallback>>,
}

impl MemoryBridge {
    /// Create an empty bridge
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge seeded with the configured starting population
    pub fn with_initial(initial: &InitialPopulation) -> Self {
        let mut bridge = Self::new();
        bridge.counts.insert("hawks".to_string(), initial.hawks);
        bridge.counts.insert("hares".to_string(), initial.hares);
        bridge.counts.insert("cedars".to_string(), initial.cedars);
        bridge.counts.insert("bushes".to_string(), initial.bushes);
        bridge
    }

    /// Set a count and notify its listeners
    pub fn set(&mut self, key: &str, count: u32) {
        self.counts.insert(key.to_string(), count);
        if let Some(listeners) = self.listeners.get_mut(key) {
            for listener in listeners.iter_mut() {
                listener(count);
            }
        }
    }

    /// Current count of `key`
    pub fn get(&self, key: &str) -> Option<u32> {
        self.counts.get(key).copied()
    }

    /// Number of callbacks registered for `key`
    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.get(key).map_or(0, Vec::len)
    }
}

impl PopulationBridge for MemoryBridge {
    fn get_counts(&self, keys: &[&str]) -> Vec<u32> {
        keys.iter()
            .map(|key| self.counts.get(*key).copied().unwrap_or(0))
            .collect()
    }

    fn on_count_change(&mut self, key: &str, callback: CountCallback) {
        self.listeners.entry(key.to_string()).or_default().push(callback);
    }
}
