use ndarray::{Array, Dimension, ShapeBuilder, Zip};

/// Exponential decay rate for the first raw-moment estimate.
pub const BETA1: f64 = 0.9;

/// Exponential decay rate for the second raw-moment estimate.
pub const BETA2: f64 = 0.999;

/// Denominator guard in the parameter update.
pub const EPSILON: f64 = 1e-8;

/// Per-tensor Adam accumulator state.
///
/// Each parametric layer embeds one `AdamState` per parameter tensor. The
/// moment arrays always share the parameter's shape and live for the layer's
/// entire lifetime.
#[derive(Debug, Clone)]
pub struct AdamState<D: Dimension> {
    first_moment: Array<f64, D>,
    second_moment: Array<f64, D>,
}

impl<D: Dimension> AdamState<D> {
    /// Returns zeroed moment accumulators of the given shape.
    pub fn zeros<Sh>(shape: Sh) -> Self
    where
        Sh: ShapeBuilder<Dim = D> + Clone,
    {
        Self {
            first_moment: Array::zeros(shape.clone()),
            second_moment: Array::zeros(shape),
        }
    }

    /// Applies one bias-corrected adaptive update to every parameter entry.
    ///
    /// `t` is the Adam time step and must be at least 1; the caller is
    /// responsible for supplying a monotonically increasing value. The
    /// network reuses the epoch index as `t` for every batch within that
    /// epoch, which under-counts steps relative to canonical Adam; this is
    /// deliberate (see DESIGN.md).
    pub fn step(
        &mut self,
        params: &mut Array<f64, D>,
        gradient: &Array<f64, D>,
        learning_rate: f64,
        t: usize,
    ) {
        debug_assert!(t >= 1, "Adam time step starts at 1");

        let first_correction = 1.0 - BETA1.powi(t as i32);
        let second_correction = 1.0 - BETA2.powi(t as i32);

        Zip::from(params)
            .and(gradient)
            .and(&mut self.first_moment)
            .and(&mut self.second_moment)
            .for_each(|p, &g, m, v| {
                *m = BETA1 * *m + (1.0 - BETA1) * g;
                *v = BETA2 * *v + (1.0 - BETA2) * g * g;

                let m_hat = *m / first_correction;
                let v_hat = *v / second_correction;

                *p -= learning_rate * m_hat / (v_hat.sqrt() + EPSILON);
            });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn step_matches_the_closed_form_update() {
        let mut state = AdamState::zeros(1);
        let mut params = array![0.5];
        let gradient = array![0.2];
        let learning_rate = 0.01;
        let t = 3;

        state.step(&mut params, &gradient, learning_rate, t);

        let m = (1.0 - BETA1) * 0.2;
        let v = (1.0 - BETA2) * 0.2 * 0.2;
        let m_hat = m / (1.0 - BETA1.powi(t as i32));
        let v_hat = v / (1.0 - BETA2.powi(t as i32));
        let expected = 0.5 - learning_rate * m_hat / (v_hat.sqrt() + EPSILON);

        assert!((params[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn moments_accumulate_across_steps() {
        let mut state = AdamState::zeros(1);
        let mut params = array![1.0];
        let gradient = array![0.1];

        state.step(&mut params, &gradient, 0.001, 1);
        state.step(&mut params, &gradient, 0.001, 2);

        let m1 = (1.0 - BETA1) * 0.1;
        let m2 = BETA1 * m1 + (1.0 - BETA1) * 0.1;
        let v1 = (1.0 - BETA2) * 0.01;
        let v2 = BETA2 * v1 + (1.0 - BETA2) * 0.01;

        let after_first = 1.0
            - 0.001 * (m1 / (1.0 - BETA1.powi(1))) / ((v1 / (1.0 - BETA2.powi(1))).sqrt() + EPSILON);
        let expected = after_first
            - 0.001 * (m2 / (1.0 - BETA1.powi(2))) / ((v2 / (1.0 - BETA2.powi(2))).sqrt() + EPSILON);

        assert!((params[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_gradient_leaves_params_in_place() {
        let mut state = AdamState::zeros((2, 2));
        let mut params = array![[1.0, 2.0], [3.0, 4.0]];
        let gradient = Array::zeros((2, 2));

        state.step(&mut params, &gradient, 0.1, 1);

        assert_eq!(params, array![[1.0, 2.0], [3.0, 4.0]]);
    }
}
