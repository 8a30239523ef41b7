use ndarray::{Array1, ArrayView1};

/// The logistic function, shared with logistic regression.
pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn swish(z: f64) -> f64 {
    z / (1.0 + (-z).exp())
}

/// An elementwise nonlinearity with its local derivative.
///
/// `Softmax` is the one vector-level variant: its forward normalizes over
/// the whole input, and its backward is an identity pass-through rather than
/// the softmax Jacobian. That pass-through is only correct because the
/// network seeds backpropagation with `prediction - label`, whose
/// cross-entropy simplification cancels the Jacobian; the two are a matched
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActFn {
    Relu,
    Sigmoid,
    Tanh,
    Swish,
    Softmax,
}
use ActFn::*;

impl ActFn {
    /// Applies the nonlinearity to an input vector.
    pub fn forward(&self, x: ArrayView1<f64>) -> Array1<f64> {
        match self {
            Relu => x.mapv(|z| z.max(0.0)),
            Sigmoid => x.mapv(sigmoid),
            Tanh => x.mapv(f64::tanh),
            Swish => x.mapv(swish),
            Softmax => softmax(x),
        }
    }

    /// Applies the local derivative at `input` to an incoming gradient.
    ///
    /// `input` is the raw (pre-activation) vector the matching `forward` saw.
    pub fn backward(&self, gradient: ArrayView1<f64>, input: ArrayView1<f64>) -> Array1<f64> {
        match self {
            Softmax => gradient.to_owned(),
            _ => {
                let mut gradient = gradient.to_owned();
                gradient.zip_mut_with(&input, |g, &z| *g *= self.derivative(z));
                gradient
            }
        }
    }

    fn derivative(&self, z: f64) -> f64 {
        match self {
            Relu => {
                if z >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Tanh => 1.0 - z.tanh().powi(2),
            Swish => sigmoid(z) + swish(z) * (1.0 - sigmoid(z)),
            // identity pass-through, never evaluated elementwise
            Softmax => 1.0,
        }
    }
}

/// Softmax with the input shifted by its root mean square before
/// exponentiating, so large-magnitude logits do not overflow.
fn softmax(x: ArrayView1<f64>) -> Array1<f64> {
    let normalization = (x.dot(&x) / x.len() as f64).sqrt();

    let exponentials = x.mapv(|z| (z - normalization).exp());
    let sum = exponentials.sum();

    exponentials / sum
}
