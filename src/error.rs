use std::io;
use thiserror::Error;

/// Errors raised by an external collaborator, such as an [Evolver](crate::Evolver)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A configuration that cannot be trained with. Always fatal, and raised before any generation
/// is started.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sensor count must be at least 1")]
    NoSensors,
    #[error("population must not be empty")]
    EmptyPopulation,
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("action threshold must be finite, got {0}")]
    Threshold(f64),
    #[error("world must have a finite, positive size, got {width}x{height}")]
    WorldSize { width: f64, height: f64 },
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("{key} could not be parsed from {value:?}")]
    Env { key: &'static str, value: String },
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An entity was given a direction of zero length
    #[error("degenerate {0} direction")]
    Degenerate(&'static str),
    #[error("asteroid health must be between 1 and 3, got {0}")]
    Health(u8),
    #[error("controller produced {got} outputs, expected {expected}")]
    ActionWidth { expected: usize, got: usize },
    /// An episode panicked mid-simulation
    #[error("episode fault: {0}")]
    Fault(String),
    #[error("evolution failed: {0}")]
    Evolve(#[source] BoxError),
    #[error("seed source unavailable: {0}")]
    Seed(#[from] io::Error),
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
