//! Keeping the scene in step with bridge counts

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, info, warn};

use super::PopulationBridge;
use crate::scene::{EntityKind, ReconcileReport, SceneRegistry, SceneResult};

/// Bridge keys and the kinds they drive
const DEFAULT_BINDINGS: [(&str, EntityKind); 4] = [
    ("hawks", EntityKind::Hawk),
    ("hares", EntityKind::Hare),
    ("cedars", EntityKind::Tree),
    ("bushes", EntityKind::Bush),
];

/// A count change waiting to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationChange {
    /// Kind whose target moved
    pub kind: EntityKind,

    /// New target count
    pub count: u32,
}

/// Reconciles registry counts against a population bridge
pub struct PopulationSync {
    bindings: Vec<(String, EntityKind)>,
    pending: Rc<RefCell<VecDeque<PopulationChange>>>,
}

impl Default for PopulationSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PopulationSync {
    /// Create a sync with the standard key bindings
    pub fn new() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(key, kind)| ((*key).to_string(), *kind))
                .collect(),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Bind an extra bridge key to a kind tag
    ///
    /// Unknown tags are logged and ignored.
    pub fn bind(&mut self, key: &str, tag: &str) -> bool {
        match tag.parse::<EntityKind>() {
            Ok(kind) => {
                self.bindings.retain(|(bound, _)| bound != key);
                self.bindings.push((key.to_string(), kind));
                true
            }
            Err(err) => {
                warn!("population key '{key}' not bound: {err}");
                false
            }
        }
    }

    /// Kind driven by `key`
    pub fn kind_for_key(&self, key: &str) -> Option<EntityKind> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == key)
            .map(|(_, kind)| *kind)
    }

    /// Register change callbacks for every bound key
    pub fn connect(&self, bridge: &mut dyn PopulationBridge) {
        for (key, kind) in &self.bindings {
            let pending = Rc::downgrade(&self.pending);
            let kind = *kind;
            bridge.on_count_change(
                key,
                Box::new(move |count| match pending.upgrade() {
                    Some(pending) => pending.borrow_mut().push_back(PopulationChange { kind, count }),
                    None => warn!("population sync gone, {kind} -> {count} dropped"),
                }),
            );
        }
        debug!("population sync connected to {} keys", self.bindings.len());
    }

    /// Reconcile every bound kind against the bridge's current counts
    pub fn initial_pass(
        &self,
        bridge: &dyn PopulationBridge,
        registry: &mut SceneRegistry,
    ) -> SceneResult<Vec<ReconcileReport>> {
        let keys: Vec<&str> = self.bindings.iter().map(|(key, _)| key.as_str()).collect();
        let counts = bridge.get_counts(&keys);

        let mut reports = Vec::with_capacity(counts.len());
        for ((_, kind), count) in self.bindings.iter().zip(counts) {
            reports.push(registry.reconcile_count(*kind, count as usize)?);
        }
        info!("initial population applied for {} kinds", reports.len());
        Ok(reports)
    }

    /// Queue a change directly, bypassing the bridge
    pub fn push(&self, change: PopulationChange) {
        self.pending.borrow_mut().push_back(change);
    }

    /// Apply every queued change in arrival order
    pub fn apply_pending(&self, registry: &mut SceneRegistry) -> SceneResult<Vec<ReconcileReport>> {
        let mut reports = Vec::new();
        // Pop one at a time so no borrow is held while reconciling
        loop {
            let Some(change) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            reports.push(registry.reconcile_count(change.kind, change.count as usize)?);
        }
        Ok(reports)
    }
}
