#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

use asteroids::{
    constants::ACTION_COUNT,
    random::seed_urandom,
    train, AbortHandle, BoxError, Brain, Config, ConfigError, Controller, Driver, Error,
    EvolutionTarget, Evaluator, Evolver, Perceptron, WyRng,
};
use core::ops::ControlFlow;
use rand::Rng;
use rand_distr::StandardNormal;
use std::{env, process::ExitCode};
use tracing::{error, info, warn};

const GENERATIONS: usize = 100;
const TRAINING_TICK_LIMIT: u64 = 10_000;
const REPLAYS: usize = 3;
/// Share of each generation carried over unchanged
const ELITE_P: f64 = 0.2;
/// Share of each generation drawn fresh
const FRESH_P: f64 = 0.1;
const MUTATION_SD: f64 = 0.1;

/// Keeps the fittest perceptrons, breeds perturbed copies of them and tops up with fresh ones
struct Resample {
    genomes: Vec<Perceptron>,
    inputs: usize,
    rng: WyRng,
}

impl Resample {
    fn new(population: usize, inputs: usize, mut rng: WyRng) -> Self {
        let genomes = (0..population)
            .map(|_| Perceptron::random(inputs, ACTION_COUNT, &mut rng))
            .collect();
        Self {
            genomes,
            inputs,
            rng,
        }
    }
}

impl Evolver for Resample {
    type Controller = Perceptron;

    fn genomes(&mut self) -> &mut [Perceptron] {
        &mut self.genomes
    }

    fn evolve(&mut self) -> Result<Perceptron, BoxError> {
        let n = self.genomes.len();
        self.genomes
            .sort_by(|l, r| r.fitness().total_cmp(&l.fitness()));
        let champion = self.genomes.first().cloned().ok_or("empty population")?;

        let elite = ((n as f64 * ELITE_P) as usize).clamp(1, n);
        let fresh = ((n as f64 * FRESH_P) as usize).min(n - elite);
        let mut next = self.genomes[..elite].to_vec();
        while next.len() < n - fresh {
            let mut child = next[self.rng.random_range(0..elite)].clone();
            for w in child.weights_mut() {
                *w += self.rng.sample::<f64, _>(StandardNormal) * MUTATION_SD;
            }
            next.push(child);
        }
        next.extend((0..fresh).map(|_| Perceptron::random(self.inputs, ACTION_COUNT, &mut self.rng)));

        self.genomes = next;
        Ok(champion)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if matches!(env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        error!(%info, ?backtrace, "panic");
    }));
}

fn generations() -> Result<usize, ConfigError> {
    const KEY: &str = "ASTEROIDS_GENERATIONS";
    match env::var(KEY) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Env { key: KEY, value }),
        Err(_) => Ok(GENERATIONS),
    }
}

fn run() -> Result<(), Error> {
    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .with_env()?;
    // training episodes must end even for a ship who never gets hit
    let config = Config {
        tick_limit: config.tick_limit.or(Some(TRAINING_TICK_LIMIT)),
        ..config
    };
    let generations = generations()?;

    let mut evaluator = Evaluator::new(config.clone())?;
    let rng = WyRng::seeded(config.seed.map_or_else(seed_urandom, Ok)?);
    let mut evolver = Resample::new(config.population, config.inputs(), rng);
    info!(
        population = config.population,
        generations,
        workers = evaluator.workers(),
        "training"
    );

    let champion = train(
        &mut evaluator,
        &mut evolver,
        EvolutionTarget::Generation(generations),
        |_| ControlFlow::Continue(()),
    )?;
    let Some(mut champion) = champion else {
        warn!("no generation completed");
        return Ok(());
    };

    info!(fitness = champion.fitness(), "replaying champion");
    let brain = Brain::new(&mut champion, &config);
    let scores = Driver::new(config, brain)?
        .unpaced()
        .run(&AbortHandle::default(), Some(REPLAYS))?;
    for (episode, score) in scores.iter().enumerate() {
        info!(
            episode,
            score = score.score,
            ticks = score.ticks,
            accuracy = score.accuracy(),
            "replay"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "training failed");
            ExitCode::FAILURE
        }
    }
}
