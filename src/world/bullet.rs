use super::{asteroid::Asteroid, Bounds, Entity};
use crate::{
    constants::{BULLET_RADIUS, BULLET_TTL, BULLET_VELOCITY},
    error::Error,
    geometry::{circle_overlap, Vector2},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    position: Vector2,
    velocity: Vector2,
    created: u64,
}

impl Bullet {
    /// A bullet at `position` travelling along `direction`, fired on tick `created`
    pub fn new(position: Vector2, direction: Vector2, created: u64) -> Result<Self, Error> {
        let direction = direction.try_normalise().ok_or(Error::Degenerate("bullet"))?;
        Ok(Self::along(position, direction, created))
    }

    /// `unit` must already be normalised
    pub(crate) fn along(position: Vector2, unit: Vector2, created: u64) -> Self {
        Self {
            position,
            velocity: unit * BULLET_VELOCITY,
            created,
        }
    }

    #[inline]
    pub fn age(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.created)
    }

    #[inline]
    pub fn is_dead(&self, tick: u64) -> bool {
        self.age(tick) >= BULLET_TTL
    }

    #[inline]
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn hits(&self, asteroid: &Asteroid) -> bool {
        circle_overlap(
            &self.position,
            BULLET_RADIUS,
            &asteroid.position(),
            asteroid.radius(),
        )
    }
}

impl Entity for Bullet {
    fn update(&mut self, bounds: &Bounds) {
        self.position.offset(self.velocity);
        bounds.wrap(&mut self.position);
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        BULLET_RADIUS
    }
}
