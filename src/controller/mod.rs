//! The neural controllers the arena is flown by. The arena only ever sees a [Controller] through
//! its observe/fitness interface; how it turns observations into actions is its own business.

pub mod perceptron;

pub use perceptron::Perceptron;

pub mod activate {
    use core::f64::consts::E;

    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-4.9 * x))
    }

    pub fn identity(x: f64) -> f64 {
        x
    }
}

/// An opaque decision unit. Each controller is flown by exactly one world at a time, and its
/// fitness is the only thing the arena writes back.
pub trait Controller {
    /// Given an observation of `sensor_count + 1` values, produce one value per action:
    /// shoot, boost, turn left, turn right.
    fn observe(&mut self, input: &[f64]) -> &[f64];

    fn set_fitness(&mut self, fitness: f64);

    fn fitness(&self) -> f64;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn observe(&mut self, input: &[f64]) -> &[f64] {
        (**self).observe(input)
    }

    fn set_fitness(&mut self, fitness: f64) {
        (**self).set_fitness(fitness)
    }

    fn fitness(&self) -> f64 {
        (**self).fitness()
    }
}
