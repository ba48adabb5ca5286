//! The arena: one ship, a field of asteroids and the bullets between them, advanced one tick at
//! a time. A [World] is fully determined by its [Config], its seed and the commands its [Pilot]
//! issues.

pub mod asteroid;
pub mod bullet;
pub mod score;
pub mod ship;

pub use asteroid::Asteroid;
pub use bullet::Bullet;
pub use score::Score;
pub use ship::{Segment, Ship};

use crate::{
    config::Config,
    constants::ASTEROID_BATCH,
    error::Error,
    geometry::{point_in_bounds, Vector2},
    random::WyRng,
};
use core::mem;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Shared capability of everything that moves through the arena
pub trait Entity {
    /// Advance one tick, wrapping around the edges of `bounds`
    fn update(&mut self, bounds: &Bounds);

    fn position(&self) -> Vector2;

    fn radius(&self) -> f64;
}

/// The rectangle `[0, width) × [0, height)`, whose opposite edges are joined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn wrap(&self, v: &mut Vector2) {
        v.wrap(0., 0., self.width, self.height);
    }

    #[inline]
    pub fn contains(&self, v: &Vector2) -> bool {
        point_in_bounds(v, 0., 0., self.width, self.height)
    }

    /// Like [Bounds::contains], but counting the far edges in. Wrapping parks entities there.
    #[inline]
    pub fn covers(&self, v: &Vector2) -> bool {
        (0. ..=self.width).contains(&v.x) && (0. ..=self.height).contains(&v.y)
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2., self.height / 2.)
    }
}

/// Everything a pilot may ask of the ship. Manual play and controllers issue the same commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Boost,
    BoostOff,
    RotateLeft,
    RotateRight,
    StopRotation,
    StartShooting,
    StopShooting,
}

/// Decides what the ship does each tick, having seen the world as it stands
pub trait Pilot {
    /// Push commands for this tick onto `commands`. They are applied in order.
    fn steer(&mut self, world: &World, commands: &mut Vec<Command>) -> Result<(), Error>;

    /// Points the pilot looked at on its last steer, for drawing alongside the world
    fn sight(&self) -> &[Vector2] {
        &[]
    }
}

/// Leaves the ship to drift
impl Pilot for () {
    fn steer(&mut self, _: &World, _: &mut Vec<Command>) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Running,
    Terminal,
}

#[derive(Debug, Clone)]
pub struct World {
    bounds: Bounds,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    bullets: Vec<Bullet>,
    score: Score,
    tick_limit: Option<u64>,
    rng: WyRng,
    commands: Vec<Command>,
}

impl World {
    pub fn new(config: &Config, rng: WyRng) -> Self {
        let bounds = Bounds::new(config.world_width, config.world_height);
        Self {
            bounds,
            ship: Ship::new(bounds.center()),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            score: Score::new(config.starting_lives),
            tick_limit: config.tick_limit,
            rng,
            commands: Vec::new(),
        }
    }

    pub fn seeded(config: &Config, seed: u64) -> Self {
        Self::new(config, WyRng::seeded(seed))
    }

    /// Advance exactly one tick. A world who has reached [State::Terminal] no longer changes.
    pub fn update(&mut self, pilot: &mut impl Pilot) -> Result<State, Error> {
        if self.is_over() {
            return Ok(State::Terminal);
        }

        self.score.ticks += 1;
        let tick = self.score.ticks;

        if self.asteroids.is_empty() {
            self.spawn_asteroids(ASTEROID_BATCH);
        }

        let mut commands = mem::take(&mut self.commands);
        commands.clear();
        let steered = pilot.steer(self, &mut commands);
        if steered.is_ok() {
            for command in commands.iter() {
                self.ship.apply(*command);
            }
        }
        self.commands = commands;
        steered?;

        self.ship.update(&self.bounds);
        if let Some(bullet) = self.ship.fire(tick) {
            self.bullets.push(bullet);
            self.score.shots_fired += 1;
        }

        for asteroid in self.asteroids.iter_mut() {
            asteroid.update(&self.bounds);
        }

        self.bullets.retain(|bullet| !bullet.is_dead(tick));
        for bullet in self.bullets.iter_mut() {
            bullet.update(&self.bounds);
        }

        self.resolve_bullets();
        self.resolve_ship(tick);

        trace!(score = ?self.score, "tick");
        Ok(self.state())
    }

    /// Spawn `count` full health asteroids in the top quarter of the arena
    pub fn spawn_asteroids(&mut self, count: usize) {
        let area = Bounds::new(self.bounds.width, self.bounds.height / 4.);
        for _ in 0..count {
            self.asteroids.push(Asteroid::random(&mut self.rng, &area));
        }
    }

    pub fn insert_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn insert_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Each bullet is spent on the first asteroid it overlaps. Fragments join the field only
    /// once every bullet has been checked.
    fn resolve_bullets(&mut self) {
        let asteroids = &mut self.asteroids;
        let score = &mut self.score;
        let rng = &mut self.rng;
        let mut fragments = Vec::new();

        self.bullets.retain(|bullet| {
            match asteroids.iter().position(|asteroid| bullet.hits(asteroid)) {
                Some(idx) => {
                    let asteroid = asteroids.remove(idx);
                    score.shots_hit += 1;
                    score.score += asteroid.worth();
                    fragments.extend(asteroid.split(rng));
                    false
                }
                None => true,
            }
        });

        asteroids.extend(fragments);
    }

    fn resolve_ship(&mut self, tick: u64) {
        if self.ship.is_immune(tick) {
            return;
        }

        let hull = self.ship.hull();
        if self.asteroids.iter().any(|asteroid| asteroid.hits_hull(hull)) {
            self.ship.die(self.bounds.center(), tick);
            self.bullets.clear();
            self.score.lives = self.score.lives.saturating_sub(1);
            debug!(tick, lives = self.score.lives, "ship destroyed");
        }
    }

    pub fn state(&self) -> State {
        let out_of_time = self.tick_limit.is_some_and(|limit| self.score.ticks >= limit);
        if self.score.lives == 0 || out_of_time {
            State::Terminal
        } else {
            State::Running
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state() == State::Terminal
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.score.ticks
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    #[inline]
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    #[inline]
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[inline]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    #[inline]
    pub fn score(&self) -> &Score {
        &self.score
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        constants::{BULLET_TTL, SHIP_IMMUNITY_TICKS},
        new_t,
    };

    fn config() -> Config {
        new_t!(Config, world_width = 800., world_height = 800., starting_lives = 3)
    }

    /// An asteroid parked far from everything, so the field is never refilled
    fn decoy() -> Asteroid {
        Asteroid::new(Vector2::new(700., 100.), Vector2::new(1., 0.), 1).unwrap()
    }

    /// Advance past the spawn immunity without anything happening
    fn outlive_immunity(world: &mut World) {
        for _ in 0..=SHIP_IMMUNITY_TICKS {
            world.asteroids.clear();
            world.insert_asteroid(decoy());
            world.update(&mut ()).unwrap();
        }
        world.asteroids.clear();
    }

    struct Script(Vec<Command>);

    impl Pilot for Script {
        fn steer(&mut self, _: &World, commands: &mut Vec<Command>) -> Result<(), Error> {
            commands.extend(self.0.iter().copied());
            Ok(())
        }
    }

    struct Broken;

    impl Pilot for Broken {
        fn steer(&mut self, _: &World, commands: &mut Vec<Command>) -> Result<(), Error> {
            commands.push(Command::Boost);
            Err(Error::ActionWidth {
                expected: 4,
                got: 0,
            })
        }
    }

    #[test]
    fn test_spawns_batch_in_top_quarter() {
        let mut world = World::seeded(&config(), 11);
        assert!(world.asteroids().is_empty());
        world.update(&mut ()).unwrap();
        assert_eq!(ASTEROID_BATCH, world.asteroids().len());
        for asteroid in world.asteroids() {
            assert_eq!(3, asteroid.health());
            // one tick of drift may have carried it slightly past the quarter line
            assert!(asteroid.position().y <= 200. + 2. || asteroid.position().y >= 798.);
        }
    }

    #[test]
    fn test_seed_replays() {
        let mut l = World::seeded(&config(), 5);
        let mut r = World::seeded(&config(), 5);
        for _ in 0..500 {
            l.update(&mut ()).unwrap();
            r.update(&mut ()).unwrap();
        }
        assert_eq!(l.asteroids(), r.asteroids());
        assert_eq!(l.score(), r.score());
        assert_eq!(l.ship(), r.ship());
    }

    #[test]
    fn test_collision_resets_ship() {
        let mut world = World::seeded(&config(), 1);
        outlive_immunity(&mut world);
        world.ship_mut().apply(Command::Boost);
        world.update(&mut ()).unwrap();
        world.insert_bullet(
            Bullet::new(Vector2::new(50., 700.), Vector2::new(0., 1.), world.tick()).unwrap(),
        );
        assert_ne!(Vector2::ZERO, world.ship().velocity());

        // sitting right on top of the ship's nose
        let nose = world.ship().hull()[0].1;
        world.insert_asteroid(Asteroid::new(nose, Vector2::new(1., 0.), 1).unwrap());
        let lives = world.score().lives;
        world.update(&mut ()).unwrap();

        assert_eq!(lives - 1, world.score().lives);
        assert_eq!(Vector2::ZERO, world.ship().velocity());
        assert_eq!(Vector2::ZERO, world.ship().acceleration());
        assert_eq!(world.bounds().center(), world.ship().position());
        assert!(world.bullets().is_empty());
        assert!(world.ship().is_immune(world.tick()));
    }

    #[test]
    fn test_immune_ship_ignores_asteroids() {
        let mut world = World::seeded(&config(), 2);
        let center = world.bounds().center();
        for _ in 0..SHIP_IMMUNITY_TICKS {
            world.asteroids.clear();
            world.insert_asteroid(Asteroid::new(center, Vector2::new(1., 0.), 3).unwrap());
            world.update(&mut ()).unwrap();
            assert_eq!(3, world.score().lives);
        }
        assert_eq!(SHIP_IMMUNITY_TICKS, world.tick());

        // tick 88 is the last immune tick
        world.asteroids.clear();
        world.insert_asteroid(Asteroid::new(center, Vector2::new(1., 0.), 3).unwrap());
        world.update(&mut ()).unwrap();
        assert_eq!(SHIP_IMMUNITY_TICKS + 1, world.tick());
        assert_eq!(2, world.score().lives);
    }

    #[test]
    fn test_single_death_per_tick() {
        let mut world = World::seeded(&config(), 3);
        outlive_immunity(&mut world);
        let center = world.bounds().center();
        for _ in 0..3 {
            world.insert_asteroid(Asteroid::new(center, Vector2::new(0., 1.), 2).unwrap());
        }
        world.update(&mut ()).unwrap();
        assert_eq!(2, world.score().lives);
    }

    #[test]
    fn test_terminal_when_out_of_lives() {
        let mut world = World::seeded(&new_t!(Config, starting_lives = 1), 4);
        outlive_immunity(&mut world);
        let center = world.bounds().center();
        world.insert_asteroid(Asteroid::new(center, Vector2::new(0., 1.), 3).unwrap());
        assert_eq!(State::Terminal, world.update(&mut ()).unwrap());

        let frozen = world.tick();
        assert_eq!(State::Terminal, world.update(&mut ()).unwrap());
        assert_eq!(frozen, world.tick());
    }

    #[test]
    fn test_terminal_at_tick_limit() {
        let mut world = World::seeded(&new_t!(Config, tick_limit = Some(10)), 4);
        for _ in 0..9 {
            assert_eq!(State::Running, world.update(&mut ()).unwrap());
        }
        assert_eq!(State::Terminal, world.update(&mut ()).unwrap());
        assert_eq!(10, world.tick());
    }

    #[test]
    fn test_bullet_splits_asteroid() {
        let mut world = World::seeded(&config(), 6);
        world.insert_asteroid(decoy());
        let target = Asteroid::new(Vector2::new(100., 600.), Vector2::new(0., 1.), 3).unwrap();
        let aim = target.position() + target.velocity();
        world.insert_asteroid(target);
        // two bullets on the same asteroid: only the first is spent, the second flies on
        world.insert_bullet(Bullet::new(aim, Vector2::new(1., 0.), 0).unwrap());
        world.insert_bullet(Bullet::new(aim, Vector2::new(-1., 0.), 0).unwrap());
        world.update(&mut ()).unwrap();

        assert_eq!(1, world.score().shots_hit);
        assert_eq!(1, world.score().score);
        assert_eq!(1, world.bullets().len());
        assert_eq!(3, world.asteroids().len());
        assert_eq!(2, world.asteroids().iter().filter(|a| a.health() == 2).count());
    }

    #[test]
    fn test_bullet_spent_on_first_asteroid() {
        let mut world = World::seeded(&config(), 6);
        let spot = Vector2::new(100., 600.);
        let first = Asteroid::new(spot, Vector2::new(0., 1.), 1).unwrap();
        let second = Asteroid::new(spot, Vector2::new(1., 0.), 1).unwrap();
        let aim = first.position() + first.velocity();
        world.insert_asteroid(first);
        world.insert_asteroid(second.clone());
        // after moving, the bullet overlaps both asteroids
        world.insert_bullet(Bullet::new(aim, Vector2::new(1., 0.), 0).unwrap());
        world.update(&mut ()).unwrap();

        assert_eq!(1, world.score().shots_hit);
        assert_eq!(3, world.score().score);
        assert!(world.bullets().is_empty());
        assert_eq!(1, world.asteroids().len());
        assert_eq!(second.velocity(), world.asteroids()[0].velocity());
    }

    #[test]
    fn test_bullets_expire() {
        let mut world = World::seeded(&config(), 7);
        world.insert_asteroid(decoy());
        world.insert_bullet(Bullet::new(Vector2::new(10., 790.), Vector2::new(1., 0.), 0).unwrap());
        for _ in 0..BULLET_TTL - 1 {
            world.asteroids.clear();
            world.insert_asteroid(decoy());
            world.update(&mut ()).unwrap();
        }
        assert_eq!(1, world.bullets().len());
        world.update(&mut ()).unwrap();
        assert!(world.bullets().is_empty());
    }

    #[test]
    fn test_firing_counts_shots() {
        let mut world = World::seeded(&config(), 8);
        let mut pilot = Script(vec![Command::StartShooting]);
        for _ in 0..8 {
            world.asteroids.clear();
            world.insert_asteroid(decoy());
            world.update(&mut pilot).unwrap();
        }
        // reload gates shots to ticks 4 and 8
        assert_eq!(2, world.score().shots_fired);
        assert_eq!(2, world.bullets().len());
    }

    #[test]
    fn test_pilot_error_applies_nothing() {
        let mut world = World::seeded(&config(), 9);
        assert!(matches!(
            world.update(&mut Broken),
            Err(Error::ActionWidth { .. })
        ));
        assert_eq!(Vector2::ZERO, world.ship().acceleration());
    }
}
