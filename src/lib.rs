#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

pub mod brain;
pub mod config;
pub mod constants;
pub mod controller;
pub mod driver;
pub mod error;
pub mod eval;
pub mod geometry;
pub mod macros;
pub mod random;
pub mod scenario;
pub mod world;

pub use brain::{Actions, Brain};
pub use config::Config;
pub use controller::{activate, Controller, Perceptron};
pub use driver::{keyboard, Driver, Frame, Key, KeyEvent, Keyboard};
pub use error::{BoxError, ConfigError, Error};
pub use eval::{AbortHandle, Evaluator, Outcome, Report};
pub use geometry::Vector2;
pub use random::{SeedStream, WyRng};
pub use scenario::{train, EvolutionTarget, Evolver, Generation};
pub use world::{Command, Pilot, Score, State, World};
