use super::{activate::steep_sigmoid, Controller};
use rand::Rng;
use rand_distr::StandardNormal;
use rulinalg::matrix::{BaseMatrix, BaseMatrixMut, Matrix};

/// A single dense layer from sensors (plus a bias neuron) straight to actions.
///
/// Small enough to evolve by perturbing weights directly, which is all the bundled trainer and
/// benches need from a controller.
#[derive(Debug, Clone)]
pub struct Perceptron {
    /// sensory state, with the bias neuron last
    x: Matrix<f64>,
    /// weights indexed as [from, to]
    w: Matrix<f64>,
    y: Matrix<f64>,
    σ: fn(f64) -> f64,
    fitness: f64,
}

impl Perceptron {
    /// `weights` are row major, `(inputs + 1) × outputs`, the last row feeding from the bias
    pub fn new(inputs: usize, outputs: usize, weights: Vec<f64>) -> Self {
        debug_assert_eq!((inputs + 1) * outputs, weights.len());
        let mut x = Matrix::zeros(1, inputs + 1);
        x.mut_data()[inputs] = 1.;
        Self {
            x,
            w: Matrix::new(inputs + 1, outputs, weights),
            y: Matrix::zeros(1, outputs),
            σ: steep_sigmoid,
            fitness: f64::MIN,
        }
    }

    /// Weights drawn from a standard normal distribution
    pub fn random(inputs: usize, outputs: usize, rng: &mut impl Rng) -> Self {
        let weights = (0..(inputs + 1) * outputs)
            .map(|_| rng.sample(StandardNormal))
            .collect();
        Self::new(inputs, outputs, weights)
    }

    pub fn with_activation(mut self, σ: fn(f64) -> f64) -> Self {
        self.σ = σ;
        self
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.x.cols() - 1
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.w.cols()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        self.w.data()
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        self.w.mut_data()
    }
}

impl Controller for Perceptron {
    fn observe(&mut self, input: &[f64]) -> &[f64] {
        debug_assert_eq!(input.len(), self.inputs());
        let n = self.inputs();
        self.x.mut_data()[..n].copy_from_slice(input);
        self.y = (&self.x * &self.w).apply(&self.σ);
        self.y.data()
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }
}
