//! The sensory encoder: what a controller sees of the world, and how what it answers becomes
//! ship commands.
//!
//! Each tick the ship looks out along `K` rays spread evenly around its heading. A ray marches
//! outward one unit at a time until it leaves the arena or enters an asteroid, and reports the
//! distance it travelled, or 0 if it saw nothing. One more input tells whether the gun is
//! loaded.

use crate::{
    config::Config,
    constants::{ACTION_COUNT, SENSOR_STEP},
    controller::Controller,
    error::Error,
    geometry::Vector2,
    world::{Command, Entity, Pilot, World},
};
use core::f64::consts::TAU;

/// Actions decoded from one tick of controller output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actions {
    pub shoot: bool,
    pub boost: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl Actions {
    /// Outputs at or above `threshold` switch their action on
    pub fn decode(outputs: &[f64], threshold: f64) -> Result<Self, Error> {
        if outputs.len() != ACTION_COUNT {
            return Err(Error::ActionWidth {
                expected: ACTION_COUNT,
                got: outputs.len(),
            });
        }
        Ok(Self {
            shoot: outputs[0] >= threshold,
            boost: outputs[1] >= threshold,
            turn_left: outputs[2] >= threshold,
            turn_right: outputs[3] >= threshold,
        })
    }

    /// Turning left and right at once is allowed; both commands are issued, left first, so the
    /// right turn is the one that sticks.
    pub fn commands(&self, commands: &mut Vec<Command>) {
        commands.push(if self.shoot {
            Command::StartShooting
        } else {
            Command::StopShooting
        });
        commands.push(if self.boost {
            Command::Boost
        } else {
            Command::BoostOff
        });

        if !self.turn_left && !self.turn_right {
            commands.push(Command::StopRotation);
        } else {
            if self.turn_left {
                commands.push(Command::RotateLeft);
            }
            if self.turn_right {
                commands.push(Command::RotateRight);
            }
        }
    }
}

/// Flies a ship on behalf of a borrowed controller for the length of one episode
pub struct Brain<'c, C: Controller + ?Sized> {
    controller: &'c mut C,
    threshold: f64,
    /// angle between neighbouring rays
    spread: f64,
    inputs: Vec<f64>,
    sight: Vec<Vector2>,
}

impl<'c, C: Controller + ?Sized> Brain<'c, C> {
    pub fn new(controller: &'c mut C, config: &Config) -> Self {
        Self {
            controller,
            threshold: config.action_threshold,
            spread: TAU / config.sensor_count as f64,
            inputs: vec![0.; config.inputs()],
            sight: vec![Vector2::ZERO; config.sensor_count],
        }
    }

    /// Fill the observation vector for the world as it stands
    pub fn sense(&mut self, world: &World) -> &[f64] {
        let ship = world.ship();
        let origin = ship.position();

        self.inputs[0] = if ship.can_shoot(world.tick()) { 1. } else { 0. };

        for (idx, probe) in self.sight.iter_mut().enumerate() {
            let direction = Vector2::from_angle(ship.rotation() + idx as f64 * self.spread);
            *probe = origin;
            self.inputs[idx + 1] = if cast_ray(world, direction, probe) {
                origin.distance(probe)
            } else {
                0.
            };
        }

        &self.inputs
    }

    /// Write the world's current fitness back to the controller
    #[inline]
    pub fn settle(&mut self, world: &World) {
        self.controller.set_fitness(world.score().fitness());
    }

    #[inline]
    pub fn controller(&self) -> &C {
        self.controller
    }
}

impl<C: Controller + ?Sized> Pilot for Brain<'_, C> {
    fn steer(&mut self, world: &World, commands: &mut Vec<Command>) -> Result<(), Error> {
        self.settle(world);
        self.sense(world);
        let outputs = self.controller.observe(&self.inputs);
        Actions::decode(outputs, self.threshold)?.commands(commands);
        Ok(())
    }

    /// Where each ray stopped on the last observation
    fn sight(&self) -> &[Vector2] {
        &self.sight
    }
}

/// March `probe` along `direction` until it enters an asteroid or leaves the arena. Returns
/// whether an asteroid was found, leaving `probe` where the march stopped.
fn cast_ray(world: &World, direction: Vector2, probe: &mut Vector2) -> bool {
    let step = direction * SENSOR_STEP;
    // the origin may sit on a far edge after wrapping
    let mut inside = world.bounds().covers(probe);
    while inside {
        if world.asteroids().iter().any(|asteroid| asteroid.contains(probe)) {
            return true;
        }
        probe.offset(step);
        inside = world.bounds().contains(probe);
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        assert_f64_approx, new_t,
        world::Asteroid,
    };

    /// Answers every observation with the same outputs, and remembers what it saw
    struct Fixed {
        outputs: Vec<f64>,
        seen: Vec<Vec<f64>>,
        fitness: f64,
    }

    impl Fixed {
        fn new(outputs: &[f64]) -> Self {
            Self {
                outputs: outputs.to_vec(),
                seen: Vec::new(),
                fitness: 0.,
            }
        }
    }

    impl Controller for Fixed {
        fn observe(&mut self, input: &[f64]) -> &[f64] {
            self.seen.push(input.to_vec());
            &self.outputs
        }

        fn set_fitness(&mut self, fitness: f64) {
            self.fitness = fitness;
        }

        fn fitness(&self) -> f64 {
            self.fitness
        }
    }

    fn config() -> Config {
        new_t!(Config, sensor_count = 4)
    }

    fn decoded(outputs: &[f64]) -> Vec<Command> {
        let mut commands = Vec::new();
        Actions::decode(outputs, 0.8).unwrap().commands(&mut commands);
        commands
    }

    #[test]
    fn test_decode_threshold_inclusive() {
        assert_eq!(
            vec![Command::StartShooting, Command::Boost, Command::RotateLeft],
            decoded(&[0.8, 0.9, 0.8, 0.79])
        );
        assert_eq!(
            vec![Command::StopShooting, Command::BoostOff, Command::StopRotation],
            decoded(&[0.79, 0., 0.1, 0.2])
        );
    }

    #[test]
    fn test_decode_both_turns_right_wins() {
        let commands = decoded(&[0., 0., 1., 1.]);
        assert_eq!(
            vec![
                Command::StopShooting,
                Command::BoostOff,
                Command::RotateLeft,
                Command::RotateRight
            ],
            commands
        );

        let mut world = World::seeded(&config(), 0);
        for command in commands {
            world.ship_mut().apply(command);
        }
        assert!(world.ship().spin() > 0.);
    }

    #[test]
    fn test_decode_wrong_width() {
        assert!(matches!(
            Actions::decode(&[1., 1., 1.], 0.8),
            Err(Error::ActionWidth {
                expected: 4,
                got: 3
            })
        ));
    }

    #[test]
    fn test_sense_empty_field() {
        let world = World::seeded(&config(), 0);
        let mut controller = Fixed::new(&[0.; 4]);
        let mut brain = Brain::new(&mut controller, &config());
        let inputs = brain.sense(&world).to_vec();
        // tick 0: the gun reloads 4 ticks after the last shot at tick 0
        assert_eq!(vec![0., 0., 0., 0., 0.], inputs);
        for probe in brain.sight() {
            assert!(!world.bounds().contains(probe));
        }
    }

    #[test]
    fn test_sense_hits_asteroid_ahead() {
        let mut world = World::seeded(&config(), 0);
        let origin = world.ship().position();
        // default heading is straight up, first ray looks up
        world.insert_asteroid(
            Asteroid::new(origin - Vector2::new(0., 100.), Vector2::new(1., 0.), 2).unwrap(),
        );
        let mut controller = Fixed::new(&[0.; 4]);
        let mut brain = Brain::new(&mut controller, &config());
        let inputs = brain.sense(&world).to_vec();

        // the asteroid's rim is 70 away, the probe stops on the first step strictly inside
        assert_f64_approx!(inputs[1], 71., tol = 1e-6);
        assert_eq!(0., inputs[2]);
        assert_eq!(0., inputs[3]);
        assert_eq!(0., inputs[4]);
        assert!((brain.sight()[0].y - (origin.y - 71.)).abs() < 1e-6);
    }

    #[test]
    fn test_sense_from_far_edge() {
        let mut world = World::seeded(&config(), 0);
        let edge = Vector2::new(800., 400.);
        world.ship_mut().die(edge, 0);
        assert!(!world.bounds().contains(&world.ship().position()));
        world.insert_asteroid(
            Asteroid::new(Vector2::new(760., 400.), Vector2::new(0., 1.), 1).unwrap(),
        );
        let mut controller = Fixed::new(&[0.; 4]);
        let mut brain = Brain::new(&mut controller, &config());
        let inputs = brain.sense(&world).to_vec();

        // rays look up, right, down and left; the left one crosses the arena to the asteroid
        assert_f64_approx!(inputs[4], 26., tol = 1e-6);
        assert_eq!(0., inputs[1]);
        assert_eq!(0., inputs[2]);
        assert_eq!(0., inputs[3]);
    }

    #[test]
    fn test_sense_gun_loaded() {
        let mut world = World::seeded(&config(), 0);
        for _ in 0..4 {
            world.update(&mut ()).unwrap();
        }
        let mut controller = Fixed::new(&[0.; 4]);
        let mut brain = Brain::new(&mut controller, &config());
        assert_eq!(1., brain.sense(&world)[0]);
    }

    #[test]
    fn test_steer_writes_fitness_then_acts() {
        let mut world = World::seeded(&config(), 3);
        let mut controller = Fixed::new(&[1., 1., 0., 0.]);
        {
            let mut brain = Brain::new(&mut controller, &config());
            for _ in 0..10 {
                world.update(&mut brain).unwrap();
            }
        }
        // fitness is written before acting, so it lags the world by the tick in progress
        assert_eq!(10, controller.seen.len());
        assert_eq!(5, controller.seen[0].len());
        assert!(controller.fitness >= 10.);
        assert!(world.score().shots_fired >= 2);
        assert_ne!(Vector2::ZERO, world.ship().velocity());
    }

    #[test]
    fn test_steer_rejects_wide_output() {
        let mut world = World::seeded(&config(), 3);
        let mut controller = Fixed::new(&[1., 1., 0., 0., 0.]);
        let mut brain = Brain::new(&mut controller, &config());
        assert!(matches!(
            world.update(&mut brain),
            Err(Error::ActionWidth { got: 5, .. })
        ));
    }
}
