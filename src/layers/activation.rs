use ndarray::{Array1, ArrayView1};

use crate::{
    activations::ActFn,
    error::{MlError, Result},
};

/// A non-parametric layer wrapping an activation function.
///
/// The only state is the most recent forward input, kept so backward can
/// evaluate the local derivative at the right point. It is taken on
/// backward, so each backward call must be paired with its own forward.
pub struct Activation {
    act_fn: ActFn,
    input: Option<Array1<f64>>,
}

impl Activation {
    pub fn new(act_fn: ActFn) -> Self {
        Self {
            act_fn,
            input: None,
        }
    }

    /// Applies the activation and remembers the raw input.
    pub fn forward(&mut self, x: ArrayView1<f64>) -> Array1<f64> {
        self.input = Some(x.to_owned());
        self.act_fn.forward(x)
    }

    /// Scales the incoming gradient by the local derivative at the
    /// remembered input.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` if no forward input is remembered,
    /// i.e. backward was called before forward or twice in a row.
    pub fn backward(&mut self, gradient: ArrayView1<f64>) -> Result<Array1<f64>> {
        let input = self
            .input
            .take()
            .ok_or(MlError::InvalidInput("activation backward requires a preceding forward"))?;

        Ok(self.act_fn.backward(gradient, input.view()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn backward_uses_the_remembered_input() {
        let mut layer = Activation::new(ActFn::Relu);
        layer.forward(array![-1.0, 2.0].view());

        let out = layer.backward(array![3.0, 3.0].view()).unwrap();
        assert_eq!(out, array![0.0, 3.0]);
    }

    #[test]
    fn backward_without_forward_is_an_error() {
        let mut layer = Activation::new(ActFn::Sigmoid);
        assert!(layer.backward(array![1.0].view()).is_err());
    }

    #[test]
    fn second_backward_without_a_new_forward_is_an_error() {
        let mut layer = Activation::new(ActFn::Tanh);
        layer.forward(array![0.5].view());
        layer.backward(array![1.0].view()).unwrap();
        assert!(layer.backward(array![1.0].view()).is_err());
    }
}
