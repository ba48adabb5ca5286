#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

use asteroids::{constants::ACTION_COUNT, new_t, Config, Evaluator, Perceptron, WyRng};
use criterion::Criterion;

const POPULATION: usize = 32;

fn bench_generation(bench: &mut Criterion) {
    let config = new_t!(
        Config,
        seed = Some(0xA57E),
        tick_limit = Some(500),
        population = POPULATION,
    );
    let mut evaluator = Evaluator::new(config.clone()).unwrap();
    let mut rng = WyRng::seeded(7);
    let mut controllers = (0..POPULATION)
        .map(|_| Perceptron::random(config.inputs(), ACTION_COUNT, &mut rng))
        .collect::<Vec<_>>();

    bench.bench_function("generation-32x500", |b| {
        b.iter(|| {
            evaluator
                .evaluate_generation(&mut controllers)
                .unwrap()
                .terminal()
        })
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(50)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_generation(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
