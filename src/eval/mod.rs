//! Evaluate a whole generation of controllers at once. Every controller flies its own world to
//! the end of an episode on a bounded pool of workers, and the generation is only over when a
//! [Gate] has seen every episode arrive.

pub mod gate;

pub use gate::{Arrival, Gate};

use crate::{
    brain::Brain,
    config::Config,
    controller::Controller,
    error::{ConfigError, Error},
    random::SeedStream,
    world::{Score, World},
};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};
use tracing::{debug, warn};

/// How an episode ended
#[derive(Debug)]
pub enum Outcome {
    /// The world reached its terminal state, with this final score
    Terminal(Score),
    /// Training was aborted while the episode was pending or in flight
    Aborted,
    /// The episode failed. The controller keeps the last fitness written before the failure.
    Faulted(Error),
}

/// Per-generation tally of episode outcomes, indexed like the controllers evaluated
#[derive(Debug, Default)]
pub struct Report {
    scores: Vec<Option<Score>>,
    terminal: usize,
    aborted: usize,
    faults: Vec<(usize, Error)>,
}

impl Report {
    pub fn new(len: usize) -> Self {
        Self {
            scores: vec![None; len],
            ..Self::default()
        }
    }

    fn record(&mut self, idx: usize, outcome: Outcome) {
        match outcome {
            Outcome::Terminal(score) => {
                if let Some(slot) = self.scores.get_mut(idx) {
                    *slot = Some(score);
                }
                self.terminal += 1;
            }
            Outcome::Aborted => self.aborted += 1,
            Outcome::Faulted(err) => self.faults.push((idx, err)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Final score of each episode who reached its terminal state
    #[inline]
    pub fn scores(&self) -> &[Option<Score>] {
        &self.scores
    }

    #[inline]
    pub fn terminal(&self) -> usize {
        self.terminal
    }

    #[inline]
    pub fn aborted(&self) -> usize {
        self.aborted
    }

    #[inline]
    pub fn faults(&self) -> &[(usize, Error)] {
        &self.faults
    }

    pub fn mean_score(&self) -> f64 {
        let (sum, n) = self
            .scores
            .iter()
            .flatten()
            .fold((0., 0usize), |(sum, n), s| (sum + s.score as f64, n + 1));
        if n == 0 {
            0.
        } else {
            sum / n as f64
        }
    }
}

/// Stops a training run. Pending episodes never start, and in-flight ones stop at their next
/// tick without rolling back the fitness they already wrote.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct Evaluator {
    config: Config,
    seeds: SeedStream,
    abort: AbortHandle,
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl Evaluator {
    /// Validates `config` and starts the worker pool
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let workers = config.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });

        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("episode-{idx}"))
            .build()?;

        debug!(workers, seed = ?config.seed, "evaluator ready");
        Ok(Self {
            seeds: SeedStream::new(config.seed)?,
            config,
            abort: AbortHandle::default(),
            workers,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Fly one episode per controller, returning once every episode has arrived at the gate.
    /// Each controller ends up holding the last fitness its own episode wrote.
    pub fn evaluate_generation<C: Controller + Send>(
        &mut self,
        controllers: &mut [C],
    ) -> Result<Report, Error> {
        if controllers.is_empty() {
            return Err(ConfigError::EmptyPopulation.into());
        }

        // seeds are drawn up front so that a seeded run doesn't depend on scheduling
        let seeds = controllers
            .iter()
            .map(|_| self.seeds.next_seed())
            .collect::<Vec<_>>();
        let gate = Gate::new(controllers.len());
        let config = &self.config;
        let abort = &self.abort;

        #[cfg(feature = "parallel")]
        let report = self.pool.in_place_scope(|scope| {
            for (idx, (controller, seed)) in controllers.iter_mut().zip(seeds).enumerate() {
                let arrival = gate.arrival(idx);
                scope.spawn(move |_| arrival.complete(run_guarded(controller, config, seed, abort)));
            }
            gate.wait()
        });

        #[cfg(not(feature = "parallel"))]
        let report = {
            for (idx, (controller, seed)) in controllers.iter_mut().zip(seeds).enumerate() {
                gate.arrival(idx)
                    .complete(run_guarded(controller, config, seed, abort));
            }
            gate.wait()
        };

        for (idx, err) in report.faults() {
            warn!(controller = idx, error = %err, "episode fault");
        }
        debug!(
            episodes = report.len(),
            terminal = report.terminal(),
            aborted = report.aborted(),
            faults = report.faults().len(),
            mean_score = report.mean_score(),
            "generation evaluated"
        );
        Ok(report)
    }
}

/// Fly one episode for `controller` in a fresh world seeded with `seed`
pub fn run_episode<C: Controller + ?Sized>(
    controller: &mut C,
    config: &Config,
    seed: u64,
    abort: &AbortHandle,
) -> Result<Outcome, Error> {
    let mut world = World::seeded(config, seed);
    let mut brain = Brain::new(controller, config);

    while !world.is_over() {
        if abort.is_aborted() {
            return Ok(Outcome::Aborted);
        }
        world.update(&mut brain)?;
    }

    brain.settle(&world);
    Ok(Outcome::Terminal(*world.score()))
}

fn run_guarded<C: Controller + ?Sized>(
    controller: &mut C,
    config: &Config,
    seed: u64,
    abort: &AbortHandle,
) -> Outcome {
    if abort.is_aborted() {
        return Outcome::Aborted;
    }
    match panic::catch_unwind(AssertUnwindSafe(|| {
        run_episode(controller, config, seed, abort)
    })) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => Outcome::Faulted(err),
        Err(panic) => Outcome::Faulted(Error::Fault(panic_message(panic))),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => msg.to_string(),
            Err(_) => "unknown panic".to_string(),
        },
    }
}
