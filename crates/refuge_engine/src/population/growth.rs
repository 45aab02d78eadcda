//! Tree growth on the simulated calendar

use log::debug;

use crate::config::GrowthConfig;
use crate::factory::EntityConfig;
use crate::foundation::time::SimulatedClock;
use crate::scene::{EntityKind, SceneRegistry, SceneResult};

/// Adds one tree per elapsed growth interval
///
/// A forest needs at least `floor` trees to spread and stops at `ceiling`.
#[derive(Debug, Clone)]
pub struct GrowthRule {
    interval_days: u32,
    floor: usize,
    ceiling: usize,
    next_day: u32,
}

impl GrowthRule {
    /// Create a rule from configuration
    pub fn new(config: &GrowthConfig) -> Self {
        let interval_days = config.interval_days.max(1);
        Self {
            interval_days,
            floor: config.floor as usize,
            ceiling: config.ceiling as usize,
            next_day: interval_days,
        }
    }

    /// Day on which the next growth check happens
    pub fn next_day(&self) -> u32 {
        self.next_day
    }

    /// Run every growth check that has come due, returning trees planted
    pub fn apply(&mut self, clock: &dyn SimulatedClock, registry: &mut SceneRegistry) -> SceneResult<usize> {
        let today = clock.current_day();
        let mut planted = 0;

        while today >= self.next_day {
            let trees = registry.count_of_kind(EntityKind::Tree);
            if (self.floor..self.ceiling).contains(&trees) {
                registry.spawn_kind(EntityKind::Tree, &EntityConfig::default())?;
                planted += 1;
                debug!("day {}: tree planted ({} total)", self.next_day, trees + 1);
            }
            self.next_day += self.interval_days;
        }
        Ok(planted)
    }
}

impl Default for GrowthRule {
    fn default() -> Self {
        Self::new(&GrowthConfig::default())
    }
}
