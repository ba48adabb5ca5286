#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

use asteroids::{constants::ACTION_COUNT, new_t, Brain, Config, Perceptron, World, WyRng};
use criterion::Criterion;

fn bench_world(bench: &mut Criterion) {
    let config = new_t!(Config, tick_limit = Some(1_000), starting_lives = 1_000);
    let mut rng = WyRng::seeded(0xA57E);
    let mut controller = Perceptron::random(config.inputs(), ACTION_COUNT, &mut rng);

    bench.bench_function("world-tick-drift", |b| {
        let mut world = World::seeded(&config, 1);
        b.iter(|| {
            if world.is_over() {
                world = World::seeded(&config, 1);
            }
            world.update(&mut ())
        })
    });

    bench.bench_function("world-episode-1000", |b| {
        b.iter(|| {
            let mut world = World::seeded(&config, 2);
            let mut brain = Brain::new(&mut controller, &config);
            while !world.is_over() {
                world.update(&mut brain).unwrap();
            }
            world.score().fitness()
        })
    });

    bench.bench_function("brain-sense", |b| {
        let mut world = World::seeded(&config, 3);
        for _ in 0..100 {
            world.update(&mut ()).unwrap();
        }
        let mut brain = Brain::new(&mut controller, &config);
        b.iter(|| brain.sense(&world).len())
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(500)
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
    bench_world(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
