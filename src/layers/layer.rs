use ndarray::{Array1, ArrayView1};
use rand::Rng;

use super::{activation::Activation, dense::Dense};
use crate::{activations::ActFn, error::Result};

/// A unit in the network pipeline.
///
/// Two kinds exist: the parametric affine transform and the non-parametric
/// activation wrapper. The network drives both through the same four
/// operations; `zero_grad` and `update` are no-ops for activations.
pub enum Layer {
    Dense(Dense),
    Activation(Activation),
}
use Layer::*;

impl Layer {
    pub fn dense<R: Rng + ?Sized>(dim_in: usize, dim_out: usize, rng: &mut R) -> Self {
        Self::Dense(Dense::new(dim_in, dim_out, rng))
    }

    pub fn activation(act_fn: ActFn) -> Self {
        Self::Activation(Activation::new(act_fn))
    }

    pub fn forward(&mut self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        match self {
            Dense(l) => l.forward(x),
            Activation(l) => Ok(l.forward(x)),
        }
    }

    pub fn backward(&mut self, gradient: ArrayView1<f64>) -> Result<Array1<f64>> {
        match self {
            Dense(l) => l.backward(gradient),
            Activation(l) => l.backward(gradient),
        }
    }

    pub fn zero_grad(&mut self) {
        match self {
            Dense(l) => l.zero_grad(),
            Activation(_) => {}
        }
    }

    pub fn update(&mut self, learning_rate: f64, t: usize, batch_size: usize) {
        match self {
            Dense(l) => l.update(learning_rate, t, batch_size),
            Activation(_) => {}
        }
    }
}
