//! Training configuration. A [Config] is read from JSON, may be overridden by `ASTEROIDS_*`
//! environment variables, and must pass [Config::validate] before anything is simulated.

use crate::{
    constants::{
        DEFAULT_ACTION_THRESHOLD, DEFAULT_SENSOR_COUNT, DEFAULT_STARTING_LIVES,
        DEFAULT_WORLD_SIZE,
    },
    error::ConfigError,
};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Ray sensors around the ship. Controllers receive `sensor_count + 1` inputs.
    pub sensor_count: usize,
    /// Controller outputs at or above this value switch their action on
    pub action_threshold: f64,
    pub world_width: f64,
    pub world_height: f64,
    pub starting_lives: u32,
    /// Controllers per generation
    pub population: usize,
    /// Seed for every world of a run. Unseeded runs draw one from `/dev/urandom`.
    pub seed: Option<u64>,
    /// Ends an episode after this many ticks even if the ship is still alive
    pub tick_limit: Option<u64>,
    /// Size of the evaluation pool, defaulting to the available parallelism
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor_count: DEFAULT_SENSOR_COUNT,
            action_threshold: DEFAULT_ACTION_THRESHOLD,
            world_width: DEFAULT_WORLD_SIZE,
            world_height: DEFAULT_WORLD_SIZE,
            starting_lives: DEFAULT_STARTING_LIVES,
            population: 150,
            seed: None,
            tick_limit: None,
            workers: None,
        }
    }
}

impl Config {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_str(&fs::read_to_string(path)?)
    }

    /// Apply `ASTEROIDS_*` overrides from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply `ASTEROIDS_*` overrides found by `lookup`
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        override_with(&lookup, "ASTEROIDS_SENSOR_COUNT", &mut self.sensor_count)?;
        override_with(&lookup, "ASTEROIDS_ACTION_THRESHOLD", &mut self.action_threshold)?;
        override_with(&lookup, "ASTEROIDS_WORLD_WIDTH", &mut self.world_width)?;
        override_with(&lookup, "ASTEROIDS_WORLD_HEIGHT", &mut self.world_height)?;
        override_with(&lookup, "ASTEROIDS_STARTING_LIVES", &mut self.starting_lives)?;
        override_with(&lookup, "ASTEROIDS_POPULATION", &mut self.population)?;
        override_some(&lookup, "ASTEROIDS_SEED", &mut self.seed)?;
        override_some(&lookup, "ASTEROIDS_TICK_LIMIT", &mut self.tick_limit)?;
        override_some(&lookup, "ASTEROIDS_WORKERS", &mut self.workers)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_count == 0 {
            return Err(ConfigError::NoSensors);
        }
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if !self.action_threshold.is_finite() {
            return Err(ConfigError::Threshold(self.action_threshold));
        }
        let positive = |v: f64| v.is_finite() && v > 0.;
        if !positive(self.world_width) || !positive(self.world_height) {
            return Err(ConfigError::WorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.workers == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }

    /// Width of the observation vector handed to a controller
    #[inline]
    pub fn inputs(&self) -> usize {
        self.sensor_count + 1
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value })
}

fn override_with<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(key) {
        *slot = parse(key, value)?;
    }
    Ok(())
}

fn override_some<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    slot: &mut Option<T>,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(key) {
        *slot = Some(parse(key, value)?);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::new_t;
    use std::collections::HashMap;

    #[test]
    fn test_default_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(9, config.inputs());
        assert_eq!(3, config.starting_lives);
        assert_eq!(0.8, config.action_threshold);
    }

    #[test]
    fn test_from_str_partial() {
        let config = Config::from_str(r#"{"sensorCount": 16, "worldWidth": 640, "seed": 3}"#)
            .unwrap();
        assert_eq!(16, config.sensor_count);
        assert_eq!(640., config.world_width);
        assert_eq!(800., config.world_height);
        assert_eq!(Some(3), config.seed);
        assert_eq!(None, config.tick_limit);
    }

    #[test]
    fn test_from_str_malformed() {
        assert!(matches!(
            Config::from_str(r#"{"sensorCount": "many"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(matches!(
            new_t!(Config, sensor_count = 0).validate(),
            Err(ConfigError::NoSensors)
        ));
        assert!(matches!(
            new_t!(Config, population = 0).validate(),
            Err(ConfigError::EmptyPopulation)
        ));
        assert!(matches!(
            new_t!(Config, starting_lives = 0).validate(),
            Err(ConfigError::NoLives)
        ));
        assert!(matches!(
            new_t!(Config, action_threshold = f64::NAN).validate(),
            Err(ConfigError::Threshold(_))
        ));
        assert!(matches!(
            new_t!(Config, world_height = 0.).validate(),
            Err(ConfigError::WorldSize { .. })
        ));
        assert!(matches!(
            new_t!(Config, workers = Some(0)).validate(),
            Err(ConfigError::NoWorkers)
        ));
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("ASTEROIDS_SENSOR_COUNT", "12"),
            ("ASTEROIDS_SEED", " 77 "),
            ("ASTEROIDS_ACTION_THRESHOLD", "0.5"),
        ]);
        let config = Config::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(12, config.sensor_count);
        assert_eq!(Some(77), config.seed);
        assert_eq!(0.5, config.action_threshold);
        assert_eq!(150, config.population);
    }

    #[test]
    fn test_overrides_bad_value() {
        let err = Config::default()
            .with_overrides(|k| (k == "ASTEROIDS_POPULATION").then(|| "-4".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Env {
                key: "ASTEROIDS_POPULATION",
                ..
            }
        ));
    }
}
