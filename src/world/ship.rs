use super::{bullet::Bullet, Bounds, Command, Entity};
use crate::{
    constants::{
        SHIP_DEFAULT_ROTATION, SHIP_HULL_SIZE, SHIP_IMMUNITY_TICKS, SHIP_MAX_SPEED,
        SHIP_RELOAD_TICKS, SHIP_ROTATION_PER_TICK,
    },
    geometry::Vector2,
};

/// A line segment between two points in world space
pub type Segment = (Vector2, Vector2);

/// Hull outline in ship space, nose along +x
const HULL: [Segment; 3] = [
    (
        Vector2::new(-SHIP_HULL_SIZE, -SHIP_HULL_SIZE),
        Vector2::new(SHIP_HULL_SIZE, 0.),
    ),
    (
        Vector2::new(-SHIP_HULL_SIZE, SHIP_HULL_SIZE),
        Vector2::new(SHIP_HULL_SIZE, 0.),
    ),
    (
        Vector2::new(-SHIP_HULL_SIZE, -SHIP_HULL_SIZE),
        Vector2::new(-SHIP_HULL_SIZE, SHIP_HULL_SIZE),
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    position: Vector2,
    velocity: Vector2,
    acceleration: Vector2,
    rotation: f64,
    spin: f64,
    hull: [Segment; 3],
    shooting: bool,
    last_shot: u64,
    /// Tick the ship last (re)spawned on. Immunity is measured from here.
    immune_since: u64,
}

impl Ship {
    pub fn new(position: Vector2) -> Self {
        let mut ship = Self {
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            rotation: SHIP_DEFAULT_ROTATION,
            spin: 0.,
            hull: HULL,
            shooting: false,
            last_shot: 0,
            immune_since: 0,
        };
        ship.update_hull();
        ship
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Boost => self.boost(),
            Command::BoostOff => self.boost_off(),
            Command::RotateLeft => self.rotate_left(),
            Command::RotateRight => self.rotate_right(),
            Command::StopRotation => self.stop_rotation(),
            Command::StartShooting => self.shooting = true,
            Command::StopShooting => self.shooting = false,
        }
    }

    /// Thrust along the current heading
    pub fn boost(&mut self) {
        self.acceleration = Vector2::from_angle(self.rotation);
    }

    pub fn boost_off(&mut self) {
        self.acceleration = Vector2::ZERO;
    }

    pub fn rotate_left(&mut self) {
        self.spin = -SHIP_ROTATION_PER_TICK;
    }

    pub fn rotate_right(&mut self) {
        self.spin = SHIP_ROTATION_PER_TICK;
    }

    pub fn stop_rotation(&mut self) {
        self.spin = 0.;
    }

    #[inline]
    pub fn can_shoot(&self, tick: u64) -> bool {
        tick.saturating_sub(self.last_shot) >= SHIP_RELOAD_TICKS
    }

    #[inline]
    pub fn is_immune(&self, tick: u64) -> bool {
        tick.saturating_sub(self.immune_since) <= SHIP_IMMUNITY_TICKS
    }

    /// Fire a bullet along the current heading if the trigger is held and the gun has reloaded
    pub fn fire(&mut self, tick: u64) -> Option<Bullet> {
        if !self.shooting || !self.can_shoot(tick) {
            return None;
        }
        self.last_shot = tick;
        Some(Bullet::along(
            self.position,
            Vector2::from_angle(self.rotation),
            tick,
        ))
    }

    /// Respawn at `center` with no momentum, immune from `tick`
    pub fn die(&mut self, center: Vector2, tick: u64) {
        self.position = center;
        self.velocity = Vector2::ZERO;
        self.acceleration = Vector2::ZERO;
        self.rotation = SHIP_DEFAULT_ROTATION;
        self.spin = 0.;
        self.last_shot = 0;
        self.immune_since = tick;
        self.update_hull();
    }

    fn update_hull(&mut self) {
        for (segment, (l1, l2)) in self.hull.iter_mut().zip(HULL) {
            *segment = (
                self.position + l1.rotated(self.rotation),
                self.position + l2.rotated(self.rotation),
            );
        }
    }

    #[inline]
    pub fn hull(&self) -> &[Segment; 3] {
        &self.hull
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn spin(&self) -> f64 {
        self.spin
    }

    #[inline]
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> Vector2 {
        self.acceleration
    }

    #[inline]
    pub fn shooting(&self) -> bool {
        self.shooting
    }
}

impl Entity for Ship {
    fn update(&mut self, bounds: &Bounds) {
        self.rotation += self.spin;

        self.velocity.offset(self.acceleration).limit(SHIP_MAX_SPEED);
        self.position.offset(self.velocity);
        bounds.wrap(&mut self.position);

        self.update_hull();
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        SHIP_HULL_SIZE
    }
}
