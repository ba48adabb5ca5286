//! Centralized tuning for the arena.
//!
//! Every value here is measured in world units or ticks. Parameters a training run may want to
//! change live in [Config](crate::config::Config) instead.

use core::f64::consts::PI;

// ============================================================================
// Asteroid Parameters
// ============================================================================

/// Asteroids spawned whenever the field has been cleared
pub const ASTEROID_BATCH: usize = 5;

/// Health of a freshly spawned asteroid
pub const ASTEROID_START_HEALTH: u8 = 3;

/// Children produced when an asteroid with health > 1 is destroyed
pub const ASTEROID_CHILDREN: usize = 2;

/// Radius gained per point of health
pub const ASTEROID_RADIUS_PER_HP: f64 = 15.;

/// Speed of an asteroid with no health, reduced by [ASTEROID_VELOCITY_STEP] per point of health
pub const ASTEROID_BASE_VELOCITY: f64 = 2.25;

pub const ASTEROID_VELOCITY_STEP: f64 = 0.25;

/// Half-width of the uniform jitter added to each axis of a child's velocity
pub const ASTEROID_SPLIT_JITTER: f64 = 0.5;

/// Worth of the smallest asteroid
pub const ASTEROID_HIGHEST_SCORE: u32 = 3;

pub const ASTEROID_SCORE_PER_HP: u32 = 1;

// ============================================================================
// Bullet Parameters
// ============================================================================

/// Ticks a bullet survives for
pub const BULLET_TTL: u64 = 175;

pub const BULLET_RADIUS: f64 = 1.;

pub const BULLET_VELOCITY: f64 = 3.;

// ============================================================================
// Ship Parameters
// ============================================================================

/// Ticks between shots
pub const SHIP_RELOAD_TICKS: u64 = 4;

/// Heading of a freshly (re)spawned ship, pointing up the screen
pub const SHIP_DEFAULT_ROTATION: f64 = -PI / 2.;

/// Spin applied while turning, 5 degrees per tick
pub const SHIP_ROTATION_PER_TICK: f64 = 5. * PI / 180.;

/// Ticks after (re)spawning during which asteroids pass through the ship
pub const SHIP_IMMUNITY_TICKS: u64 = 88;

pub const SHIP_MAX_SPEED: f64 = 2.;

/// Half-length of the hull outline
pub const SHIP_HULL_SIZE: f64 = 10.;

// ============================================================================
// Geometry
// ============================================================================

/// Absolute tolerance when deciding whether a projected point lies on a segment
pub const SEGMENT_TOLERANCE: f64 = 0.1;

/// Distance a sensor probe advances per step
pub const SENSOR_STEP: f64 = 1.;

// ============================================================================
// Controller Interface
// ============================================================================

/// Outputs a controller must produce: shoot, boost, turn left, turn right
pub const ACTION_COUNT: usize = 4;

pub const DEFAULT_ACTION_THRESHOLD: f64 = 0.8;

pub const DEFAULT_SENSOR_COUNT: usize = 8;

pub const DEFAULT_STARTING_LIVES: u32 = 3;

pub const DEFAULT_WORLD_SIZE: f64 = 800.;

/// Ticks per second of the presentation loop
pub const DEFAULT_TICK_RATE: u32 = 60;
