use super::{ship::Segment, Bounds, Entity};
use crate::{
    constants::{
        ASTEROID_BASE_VELOCITY, ASTEROID_CHILDREN, ASTEROID_HIGHEST_SCORE,
        ASTEROID_RADIUS_PER_HP, ASTEROID_SCORE_PER_HP, ASTEROID_SPLIT_JITTER,
        ASTEROID_START_HEALTH, ASTEROID_VELOCITY_STEP,
    },
    error::Error,
    geometry::{circle_overlap, segment_circle_intersect, Vector2},
};
use core::f64::consts::TAU;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    position: Vector2,
    velocity: Vector2,
    health: u8,
}

impl Asteroid {
    /// An asteroid moving along `direction` at the speed its health allows
    pub fn new(position: Vector2, direction: Vector2, health: u8) -> Result<Self, Error> {
        if !(1..=ASTEROID_START_HEALTH).contains(&health) {
            return Err(Error::Health(health));
        }
        let direction = direction
            .try_normalise()
            .ok_or(Error::Degenerate("asteroid"))?;
        Ok(Self {
            position,
            velocity: direction * Self::speed(health),
            health,
        })
    }

    /// A full health asteroid at a random spot in `area`, drifting somewhere between +x and +y
    pub fn random(rng: &mut impl Rng, area: &Bounds) -> Self {
        Self {
            position: Vector2::new(
                rng.random::<f64>() * area.width,
                rng.random::<f64>() * area.height,
            ),
            velocity: spawn_direction(rng) * Self::speed(ASTEROID_START_HEALTH),
            health: ASTEROID_START_HEALTH,
        }
    }

    /// Bigger asteroids are slower
    #[inline]
    pub fn speed(health: u8) -> f64 {
        ASTEROID_BASE_VELOCITY - ASTEROID_VELOCITY_STEP * health as f64
    }

    #[inline]
    pub fn health(&self) -> u8 {
        self.health
    }

    #[inline]
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Points awarded for destroying this asteroid. The smallest are worth the most.
    #[inline]
    pub fn worth(&self) -> u32 {
        ASTEROID_HIGHEST_SCORE - (self.health as u32 - 1) * ASTEROID_SCORE_PER_HP
    }

    /// Children left behind when this asteroid is destroyed. They carry on in the parent's
    /// direction at their own speed, each knocked off course by an independent jitter.
    pub fn split(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        if self.health <= 1 {
            return Vec::new();
        }

        let health = self.health - 1;
        let direction = self
            .velocity
            .try_normalise()
            .unwrap_or_else(|| random_direction(rng));

        (0..ASTEROID_CHILDREN)
            .map(|_| {
                let mut velocity = direction * Self::speed(health);
                velocity.offset(Vector2::new(
                    rng.random_range(-ASTEROID_SPLIT_JITTER..ASTEROID_SPLIT_JITTER),
                    rng.random_range(-ASTEROID_SPLIT_JITTER..ASTEROID_SPLIT_JITTER),
                ));
                Asteroid {
                    position: self.position,
                    velocity,
                    health,
                }
            })
            .collect()
    }

    /// Whether `point` is inside this asteroid
    #[inline]
    pub fn contains(&self, point: &Vector2) -> bool {
        circle_overlap(&self.position, self.radius(), point, 0.)
    }

    /// Whether any segment of a ship's hull touches this asteroid
    pub fn hits_hull(&self, hull: &[Segment]) -> bool {
        hull.iter()
            .any(|(l1, l2)| segment_circle_intersect(&self.position, self.radius(), l1, l2))
    }
}

impl Entity for Asteroid {
    fn update(&mut self, bounds: &Bounds) {
        self.position.offset(self.velocity);
        bounds.wrap(&mut self.position);
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.health as f64 * ASTEROID_RADIUS_PER_HP
    }
}

/// A unit vector built from two draws in `[0, 1)`. The zero draw has no heading and is redrawn.
pub fn spawn_direction(rng: &mut impl Rng) -> Vector2 {
    loop {
        let draw = Vector2::new(rng.random(), rng.random());
        if let Some(direction) = draw.try_normalise() {
            return direction;
        }
    }
}

/// A unit vector with a uniformly random heading
pub fn random_direction(rng: &mut impl Rng) -> Vector2 {
    Vector2::from_angle(rng.random::<f64>() * TAU)
}
