//! Simulation tuning loaded from TOML or RON
//!
//! Every section carries defaults so a partial file only overrides what it
//! names.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ground plane dimensions
    pub ground: GroundConfig,

    /// Seed for entity placement; entropy-seeded when absent
    pub seed: Option<u64>,

    /// Counts used when the population bridge has no value for a key
    pub initial: InitialPopulation,

    /// Hare tuning
    pub prey: PreyConfig,

    /// Hawk tuning
    pub predator: PredatorConfig,

    /// Tree growth rule
    pub growth: GrowthConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ground: GroundConfig::default(),
            seed: None,
            initial: InitialPopulation::default(),
            prey: PreyConfig::default(),
            predator: PredatorConfig::default(),
            growth: GrowthConfig::default(),
        }
    }
}

impl Config for SimulationConfig {}

impl SimulationConfig {
    /// Builder: fixed placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: ground dimensions
    pub fn with_ground(mut self, width: f32, depth: f32) -> Self {
        self.ground = GroundConfig { width, depth };
        self
    }

    /// Check ranges that deserialization alone cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.ground.width) || !positive(self.ground.depth) {
            return Err(ConfigError::Invalid {
                field: "ground",
                reason: format!("dimensions must be finite and positive, got {}x{}", self.ground.width, self.ground.depth),
            });
        }
        if !non_negative(self.prey.flee_threshold) {
            return Err(ConfigError::Invalid {
                field: "prey.flee_threshold",
                reason: "must be finite and not negative".to_string(),
            });
        }
        if !non_negative(self.prey.patrol_leg_duration) || !non_negative(self.prey.flee_duration) {
            return Err(ConfigError::Invalid {
                field: "prey",
                reason: "durations must be finite and not negative".to_string(),
            });
        }
        if self.growth.interval_days == 0 {
            return Err(ConfigError::Invalid {
                field: "growth.interval_days",
                reason: "must be at least one day".to_string(),
            });
        }
        if self.growth.floor > self.growth.ceiling {
            return Err(ConfigError::Invalid {
                field: "growth",
                reason: format!("floor {} exceeds ceiling {}", self.growth.floor, self.growth.ceiling),
            });
        }
        if !positive(self.growth.seconds_per_day) {
            return Err(ConfigError::Invalid {
                field: "growth.seconds_per_day",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Rejects NaN along with zero, negatives and infinities
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Ground plane dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Extent along X
    pub width: f32,

    /// Extent along Z
    pub depth: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self { width: 100.0, depth: 100.0 }
    }
}

impl GroundConfig {
    /// Fraction of each half-extent that random placement may use
    pub const SPAWN_MARGIN: f32 = 0.95;

    /// Half-extents (x, z) random placement stays within
    pub fn spawn_extent(&self) -> (f32, f32) {
        (
            self.width / 2.0 * Self::SPAWN_MARGIN,
            self.depth / 2.0 * Self::SPAWN_MARGIN,
        )
    }
}

/// Starting counts per population key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialPopulation {
    /// Hawks
    pub hawks: u32,

    /// Hares
    pub hares: u32,

    /// Trees
    pub cedars: u32,

    /// Bushes
    pub bushes: u32,

    /// Grass tufts scattered over the ground
    pub grass: u32,
}

impl Default for InitialPopulation {
    fn default() -> Self {
        Self {
            hawks: 1,
            hares: 4,
            cedars: 5,
            bushes: 5,
            grass: 500,
        }
    }
}

/// Hare tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyConfig {
    /// A hawk closer than this starts a flight
    pub flee_threshold: f32,

    /// Seconds to reach the refuge tree
    pub flee_duration: f32,

    /// Seconds per patrol leg
    pub patrol_leg_duration: f32,

    /// Grass within this radius is eaten
    pub graze_radius: f32,

    /// Seconds between grazing passes; zero grazes every tick
    pub graze_interval: f32,
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            flee_threshold: 500.0,
            flee_duration: 10.0,
            patrol_leg_duration: 1.0,
            graze_radius: 8.0,
            graze_interval: 0.0,
        }
    }
}

/// Hawk tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    /// Flight height
    pub altitude: f32,

    /// Half-width of the square patrol circuit around the spawn point
    pub patrol_radius: f32,

    /// Seconds per circuit leg
    pub leg_duration: f32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            altitude: 30.0,
            patrol_radius: 20.0,
            leg_duration: 2.0,
        }
    }
}

/// Periodic tree growth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Simulated days between growth checks
    pub interval_days: u32,

    /// Growth needs at least this many trees
    pub floor: u32,

    /// Growth stops at this many trees
    pub ceiling: u32,

    /// Simulation seconds per simulated day
    pub seconds_per_day: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            interval_days: 1,
            floor: 2,
            ceiling: 15,
            seconds_per_day: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_validate() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            seed = 7

            [prey]
            flee_threshold = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_relative_eq!(config.prey.flee_threshold, 120.0);
        // Untouched fields fall back to defaults
        assert_relative_eq!(config.prey.flee_duration, 10.0);
        assert_eq!(config.growth.ceiling, 15);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SimulationConfig::default().with_seed(3).with_ground(1000.0, 1000.0);
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: SimulationConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_inverted_growth_bounds() {
        let mut config = SimulationConfig::default();
        config.growth.floor = 20;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "growth", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let config = SimulationConfig::default().with_ground(f32::NAN, 100.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "ground", .. })
        ));

        let config = SimulationConfig::default().with_ground(100.0, f32::INFINITY);
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.prey.flee_threshold = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "prey.flee_threshold", .. })
        ));
    }

    #[test]
    fn test_spawn_extent() {
        let ground = GroundConfig { width: 100.0, depth: 40.0 };
        let (x, z) = ground.spawn_extent();
        assert_relative_eq!(x, 47.5);
        assert_relative_eq!(z, 19.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SimulationConfig::load_from_file("settings.yaml");
        // Missing file surfaces as IO before the extension is checked
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
