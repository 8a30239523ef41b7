use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Ix1, Ix2};
use ndarray_rand::{rand_distr::StandardNormal, RandomExt};
use rand::Rng;

use crate::{
    error::{MlError, Result},
    optimization::AdamState,
};

const WEIGHT_INIT_SCALE: f64 = 0.1;

/// An affine transform `y = W·x + b` with embedded Adam state.
///
/// The layer owns its parameters, the per-batch gradient accumulators of the
/// same shapes, and one Adam moment pair per parameter tensor. The gradient
/// accumulators are exactly zero right after `zero_grad` and right after
/// `update`; the Adam state persists across the layer's whole lifetime.
pub struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,

    weight_gradients: Array2<f64>,
    bias_gradients: Array1<f64>,

    weight_moments: AdamState<Ix2>,
    bias_moments: AdamState<Ix1>,

    // Input remembered by the latest forward, consumed by backward.
    input: Array1<f64>,
}

impl Dense {
    /// Creates a layer with small Gaussian weights drawn from `rng` and a
    /// zero bias.
    pub fn new<R: Rng + ?Sized>(dim_in: usize, dim_out: usize, rng: &mut R) -> Self {
        let mut weights: Array2<f64> = Array2::random_using((dim_out, dim_in), StandardNormal, rng);
        weights *= WEIGHT_INIT_SCALE;

        Self::with_params(weights, Array1::zeros(dim_out))
    }

    /// Creates a layer from pre-estimated parameters.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the bias length does not match the
    /// weight matrix's row count.
    pub fn from_parts(weights: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        if bias.len() != weights.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "dense bias",
                got: bias.len(),
                expected: weights.nrows(),
            });
        }

        Ok(Self::with_params(weights, bias))
    }

    fn with_params(weights: Array2<f64>, bias: Array1<f64>) -> Self {
        let (dim_out, dim_in) = weights.dim();

        Self {
            weight_gradients: Array2::zeros((dim_out, dim_in)),
            bias_gradients: Array1::zeros(dim_out),
            weight_moments: AdamState::zeros((dim_out, dim_in)),
            bias_moments: AdamState::zeros(dim_out),
            input: Array1::zeros(dim_in),
            weights,
            bias,
        }
    }

    /// Computes `W·x + b` and remembers `x` for the backward pass.
    ///
    /// Overwrites the remembered input, so the (forward, backward) pair for
    /// one sample must complete before the next sample starts.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` does not match the input
    /// dimension.
    pub fn forward(&mut self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.weights.ncols() {
            return Err(MlError::ShapeMismatch {
                what: "dense input",
                got: x.len(),
                expected: self.weights.ncols(),
            });
        }

        self.input = x.to_owned();

        Ok(self.weights.dot(&x) + &self.bias)
    }

    /// Accumulates this sample's parameter gradients and returns the gradient
    /// for the previous layer, `Wᵗ·gradient`.
    ///
    /// Contributions are added into the running accumulators; call at most
    /// once per `forward` so a batch's gradients sum correctly.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `gradient` does not match the
    /// output dimension.
    pub fn backward(&mut self, gradient: ArrayView1<f64>) -> Result<Array1<f64>> {
        if gradient.len() != self.weights.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "dense gradient",
                got: gradient.len(),
                expected: self.weights.nrows(),
            });
        }

        self.weight_gradients += &outer_product(gradient, self.input.view());
        self.bias_gradients += &gradient;

        Ok(self.weights.t().dot(&gradient))
    }

    /// Resets both gradient accumulators to zero.
    pub fn zero_grad(&mut self) {
        self.weight_gradients.fill(0.0);
        self.bias_gradients.fill(0.0);
    }

    /// Averages the accumulated gradients over `batch_size`, applies one Adam
    /// step per parameter entry, then clears the accumulators.
    pub fn update(&mut self, learning_rate: f64, t: usize, batch_size: usize) {
        let scale = 1.0 / batch_size as f64;
        self.weight_gradients *= scale;
        self.bias_gradients *= scale;

        self.weight_moments
            .step(&mut self.weights, &self.weight_gradients, learning_rate, t);
        self.bias_moments
            .step(&mut self.bias, &self.bias_gradients, learning_rate, t);

        self.zero_grad();
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> ArrayView1<'_, f64> {
        self.bias.view()
    }

    pub fn weight_gradients(&self) -> ArrayView2<'_, f64> {
        self.weight_gradients.view()
    }

    pub fn bias_gradients(&self) -> ArrayView1<'_, f64> {
        self.bias_gradients.view()
    }
}

fn outer_product(v: ArrayView1<f64>, w: ArrayView1<f64>) -> Array2<f64> {
    let v_reshaped = v.to_shape((1, v.len())).unwrap();
    let w_reshaped = w.to_shape((1, w.len())).unwrap();
    v_reshaped.t().dot(&w_reshaped)
}
