//! Real-time play. A [Driver] steps a single world at a fixed tick rate for whoever is watching
//! or flying it, be it a person at the [Keyboard] or a trained controller being replayed.

use crate::{
    config::Config,
    constants::DEFAULT_TICK_RATE,
    error::Error,
    eval::AbortHandle,
    geometry::Vector2,
    random::SeedStream,
    world::{Command, Entity, Pilot, Score, Segment, State, World},
};
use serde::Serialize;
use std::{
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Something round drawn at `position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub position: Vector2,
    pub radius: f64,
}

/// Everything a renderer needs from one tick, copied out under the world's lock so a frame is
/// never torn between two ticks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub state: State,
    pub hull: [Segment; 3],
    pub asteroids: Vec<Sprite>,
    pub bullets: Vec<Vector2>,
    pub score: Score,
    /// Ray endpoints of a sensing pilot, empty for anyone else
    pub sight: Vec<Vector2>,
}

impl Frame {
    pub fn capture(world: &World, pilot: &impl Pilot) -> Self {
        Self {
            tick: world.tick(),
            state: world.state(),
            hull: *world.ship().hull(),
            asteroids: world
                .asteroids()
                .iter()
                .map(|a| Sprite {
                    position: a.position(),
                    radius: a.radius(),
                })
                .collect(),
            bullets: world.bullets().iter().map(|b| b.position()).collect(),
            score: *world.score(),
            sight: pilot.sight().to_vec(),
        }
    }
}

pub struct Driver<P: Pilot> {
    world: Arc<Mutex<World>>,
    pilot: P,
    config: Config,
    seeds: SeedStream,
    period: Option<Duration>,
}

impl<P: Pilot> Driver<P> {
    pub fn new(config: Config, pilot: P) -> Result<Self, Error> {
        config.validate()?;
        let mut seeds = SeedStream::new(config.seed)?;
        let world = World::seeded(&config, seeds.next_seed());
        Ok(Self {
            world: Arc::new(Mutex::new(world)),
            pilot,
            config,
            seeds,
            period: Some(tick_period(DEFAULT_TICK_RATE)),
        })
    }

    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.period = Some(tick_period(hz));
        self
    }

    /// Step as fast as the world can be simulated
    pub fn unpaced(mut self) -> Self {
        self.period = None;
        self
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The world being played, for readers on other threads
    pub fn shared(&self) -> Arc<Mutex<World>> {
        self.world.clone()
    }

    pub fn frame(&self) -> Frame {
        Frame::capture(&self.lock(), &self.pilot)
    }

    #[inline]
    pub fn pilot(&self) -> &P {
        &self.pilot
    }

    #[inline]
    pub fn pilot_mut(&mut self) -> &mut P {
        &mut self.pilot
    }

    /// Advance exactly one tick
    pub fn update(&mut self) -> Result<State, Error> {
        let mut world = self.world.lock().unwrap_or_else(PoisonError::into_inner);
        world.update(&mut self.pilot)
    }

    /// Replace the world with a fresh one drawn from the next seed
    pub fn restart(&mut self) {
        let world = World::seeded(&self.config, self.seeds.next_seed());
        *self.lock() = world;
    }

    /// Play until aborted, or until `episodes` worlds have ended. Each world that ends is replaced
    /// by a fresh one. Returns the final score of every finished episode.
    pub fn run(
        &mut self,
        abort: &AbortHandle,
        episodes: Option<usize>,
    ) -> Result<Vec<Score>, Error> {
        let mut finished = Vec::new();
        let mut deadline = Instant::now();

        while !abort.is_aborted() && episodes.map_or(true, |n| finished.len() < n) {
            if self.update()? == State::Terminal {
                let score = *self.lock().score();
                info!(
                    episode = finished.len(),
                    score = score.score,
                    ticks = score.ticks,
                    accuracy = score.accuracy(),
                    "episode over"
                );
                finished.push(score);
                self.restart();
            }

            if let Some(period) = self.period {
                deadline += period;
                let now = Instant::now();
                match deadline.checked_duration_since(now) {
                    Some(wait) => thread::sleep(wait),
                    None => {
                        debug!(behind = ?(now - deadline), "tick overran");
                        deadline = now;
                    }
                }
            }
        }

        Ok(finished)
    }
}

#[inline]
fn tick_period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Left,
    Right,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

impl KeyEvent {
    pub fn command(self) -> Command {
        match self {
            KeyEvent::Pressed(Key::Up) => Command::Boost,
            KeyEvent::Released(Key::Up) => Command::BoostOff,
            KeyEvent::Pressed(Key::Left) => Command::RotateLeft,
            KeyEvent::Pressed(Key::Right) => Command::RotateRight,
            KeyEvent::Released(Key::Left | Key::Right) => Command::StopRotation,
            KeyEvent::Pressed(Key::Space) => Command::StartShooting,
            KeyEvent::Released(Key::Space) => Command::StopShooting,
        }
    }
}

/// Flies the ship from key events sent by the input thread
#[derive(Debug)]
pub struct Keyboard {
    events: Receiver<KeyEvent>,
}

/// A [Keyboard] pilot and the sender an input loop feeds it through
pub fn keyboard() -> (Sender<KeyEvent>, Keyboard) {
    let (tx, events) = mpsc::channel();
    (tx, Keyboard { events })
}

impl Pilot for Keyboard {
    fn steer(&mut self, _: &World, commands: &mut Vec<Command>) -> Result<(), Error> {
        loop {
            match self.events.try_recv() {
                Ok(event) => commands.push(event.command()),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(()),
            }
        }
    }
}
