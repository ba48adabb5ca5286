use crate::{
    controller::Controller,
    error::{BoxError, Error},
    eval::{Evaluator, Report},
};
use core::ops::ControlFlow;
use tracing::info;

pub enum EvolutionTarget {
    Fitness(f64),
    Generation(usize),
}

impl EvolutionTarget {
    fn satisfied(&self, champion: f64, generations: usize) -> bool {
        match self {
            Self::Fitness(t) => champion >= *t,
            Self::Generation(t) => *t <= generations,
        }
    }
}

/// The evolutionary half of training, consumed by [train]
pub trait Evolver {
    type Controller: Controller + Send;

    /// The current generation. Its size is fixed until the next call to [Evolver::evolve].
    fn genomes(&mut self) -> &mut [Self::Controller];

    /// Breed the next generation from the fitness written into [Evolver::genomes], returning the
    /// champion of the generation just evaluated
    fn evolve(&mut self) -> Result<Self::Controller, BoxError>;
}

/// What [train] hands its `on_generation` hook once a generation has evolved
#[derive(Debug)]
pub struct Generation<'r> {
    pub idx: usize,
    pub report: &'r Report,
    pub champion: f64,
}

/// Evaluate and evolve until `target` is reached, the hook breaks, or the evaluator is aborted.
/// Returns the last champion, if any generation completed.
pub fn train<E: Evolver>(
    evaluator: &mut Evaluator,
    evolver: &mut E,
    target: EvolutionTarget,
    mut on_generation: impl FnMut(&Generation<'_>) -> ControlFlow<()>,
) -> Result<Option<E::Controller>, Error> {
    let abort = evaluator.abort_handle();
    let mut champion = None;
    let mut idx = 0;

    while !target.satisfied(champion_fitness(&champion), idx) {
        let report = evaluator.evaluate_generation(evolver.genomes())?;
        if abort.is_aborted() || report.aborted() > 0 {
            info!(generation = idx, "training aborted");
            break;
        }

        let best = evolver.evolve().map_err(Error::Evolve)?;
        let generation = Generation {
            idx,
            report: &report,
            champion: best.fitness(),
        };
        info!(
            generation = idx,
            champion = generation.champion,
            mean_score = report.mean_score(),
            faults = report.faults().len(),
            "generation evolved"
        );
        champion = Some(best);
        idx += 1;

        if on_generation(&generation).is_break() {
            break;
        }
    }

    Ok(champion)
}

#[inline]
fn champion_fitness<C: Controller>(champion: &Option<C>) -> f64 {
    champion.as_ref().map_or(f64::MIN, |c| c.fitness())
}
