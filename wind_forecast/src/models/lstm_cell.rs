//! Dense single LSTM cell with a linear read-out

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use wind_math::{sigmoid, tanh};

/// Width of the cell input; the forecaster is univariate
pub const INPUT_SIZE: usize = 1;

/// Scale applied to standard normal draws at initialization
const INIT_SCALE: f64 = 0.1;

/// Gate weights and read-out projection of one cell
///
/// Gate matrices have shape `(INPUT_SIZE + hidden_size, hidden_size)` and are
/// applied as `z · W` where `z` is the input concatenated with the previous
/// hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    forget: Array2<f64>,
    input: Array2<f64>,
    candidate: Array2<f64>,
    output: Array2<f64>,
    projection: Array1<f64>,
}

impl WeightSet {
    /// Small random weights drawn from a seeded generator
    ///
    /// Draw order is forget, input, candidate, output, projection, so a seed
    /// always reproduces the same set.
    pub fn seeded(hidden_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = || rng.sample::<f64, _>(StandardNormal) * INIT_SCALE;
        let shape = (INPUT_SIZE + hidden_size, hidden_size);

        let forget = Array2::from_shape_simple_fn(shape, &mut draw);
        let input = Array2::from_shape_simple_fn(shape, &mut draw);
        let candidate = Array2::from_shape_simple_fn(shape, &mut draw);
        let output = Array2::from_shape_simple_fn(shape, &mut draw);
        let projection = Array1::from_shape_simple_fn(hidden_size, &mut draw);

        Self {
            forget,
            input,
            candidate,
            output,
            projection,
        }
    }

    /// All-zero weights
    pub fn zeros(hidden_size: usize) -> Self {
        let shape = (INPUT_SIZE + hidden_size, hidden_size);
        Self {
            forget: Array2::zeros(shape),
            input: Array2::zeros(shape),
            candidate: Array2::zeros(shape),
            output: Array2::zeros(shape),
            projection: Array1::zeros(hidden_size),
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.projection.len()
    }

    pub fn forget(&self) -> &Array2<f64> {
        &self.forget
    }

    pub fn input(&self) -> &Array2<f64> {
        &self.input
    }

    pub fn candidate(&self) -> &Array2<f64> {
        &self.candidate
    }

    pub fn output(&self) -> &Array2<f64> {
        &self.output
    }

    /// Read-out vector mapping the hidden state to a scalar
    pub fn projection(&self) -> &Array1<f64> {
        &self.projection
    }
}

/// Hidden and cell state carried across the steps of one fold
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    pub hidden: Array1<f64>,
    pub cell: Array1<f64>,
}

impl CellState {
    pub fn zeros(hidden_size: usize) -> Self {
        Self {
            hidden: Array1::zeros(hidden_size),
            cell: Array1::zeros(hidden_size),
        }
    }
}

/// One LSTM-style cell
#[derive(Debug, Clone, PartialEq)]
pub struct LstmCell {
    weights: WeightSet,
}

impl LstmCell {
    pub fn new(weights: WeightSet) -> Self {
        Self { weights }
    }

    pub fn seeded(hidden_size: usize, seed: u64) -> Self {
        Self::new(WeightSet::seeded(hidden_size, seed))
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    /// Advance the state by one input value
    pub fn step(&self, x: f64, state: &CellState) -> CellState {
        let w = &self.weights;
        let z: Array1<f64> = std::iter::once(x)
            .chain(state.hidden.iter().copied())
            .collect();

        let f = z.dot(&w.forget).mapv(sigmoid);
        let i = z.dot(&w.input).mapv(sigmoid);
        let c_hat = z.dot(&w.candidate).mapv(tanh);
        let cell = &f * &state.cell + &i * &c_hat;
        let o = z.dot(&w.output).mapv(sigmoid);
        let hidden = &o * &cell.mapv(tanh);

        CellState { hidden, cell }
    }

    /// Fold a window into the hidden state, starting from zeros
    pub fn fold(&self, window: &[f64]) -> Array1<f64> {
        let mut state = CellState::zeros(self.weights.hidden_size());
        for &x in window {
            state = self.step(x, &state);
        }
        state.hidden
    }

    /// Project the folded window to a scalar
    pub fn predict(&self, window: &[f64]) -> f64 {
        self.fold(window).dot(&self.weights.projection)
    }

    /// Fit the read-out projection by per-example gradient steps.
    ///
    /// Only `projection` moves; the gate matrices are left as initialized.
    /// Examples pair each `lookback` window with the value right after it and
    /// are visited in time order every epoch.
    pub fn fit_readout(
        &mut self,
        series: &[f64],
        epochs: usize,
        lookback: usize,
        learning_rate: f64,
    ) {
        if series.len() <= lookback {
            return;
        }

        let examples: Vec<(&[f64], f64)> = series
            .windows(lookback + 1)
            .map(|w| (&w[..lookback], w[lookback]))
            .collect();

        for _ in 0..epochs {
            for &(window, target) in &examples {
                let hidden = self.fold(window);
                let error = hidden.dot(&self.weights.projection) - target;
                self.weights
                    .projection
                    .scaled_add(-learning_rate * error, &hidden);
            }
        }
    }
}
