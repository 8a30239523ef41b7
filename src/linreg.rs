use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::{
    dataset::{self, ScalarSample},
    error::{MlError, Result},
    model::Model,
    persistence,
};

/// Multifeature linear regression, `y = w·x + b`, trained by mini-batch
/// gradient descent with hand-written gradients.
pub struct LinearRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearRegression {
    /// Creates a model with all parameters at zero.
    pub fn new(dimensions: usize) -> Self {
        Self {
            weights: Array1::zeros(dimensions),
            bias: 0.0,
        }
    }

    /// Creates a model from pre-estimated parameters.
    pub fn from_parts(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_weight(&mut self, index: usize, value: f64) {
        self.weights[index] = value;
    }

    pub fn set_bias(&mut self, value: f64) {
        self.bias = value;
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<f64> {
        if x.len() != self.weights.len() {
            return Err(MlError::ShapeMismatch {
                what: "regression input",
                got: x.len(),
                expected: self.weights.len(),
            });
        }

        Ok(self.weights.dot(&x) + self.bias)
    }

    /// One mini-batch step: averaged squared-error gradients, plain descent.
    fn update_params(&mut self, batch: &[ScalarSample], learning_rate: f64) -> Result<()> {
        let mut delta_weights = Array1::<f64>::zeros(self.weights.len());
        let mut delta_bias = 0.0;

        for sample in batch {
            let error = sample.label() - self.predict(sample.data())?;

            delta_weights.scaled_add(-2.0 * error, &sample.data());
            delta_bias += -2.0 * error;
        }

        let scale = 1.0 / batch.len() as f64;
        delta_weights *= scale;
        delta_bias *= scale;

        self.weights.scaled_add(-learning_rate, &delta_weights);
        self.bias -= learning_rate * delta_bias;

        Ok(())
    }

    /// Records the parameters as text: weights on the first line, bias on
    /// the second.
    ///
    /// # Errors
    /// Returns `MlError::Io` if a file already exists at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::save_params(path, self.weights.view(), self.bias)
    }

    /// Rebuilds a model from a file written by `save`.
    ///
    /// # Errors
    /// Returns `MlError::Io` if the file is missing and
    /// `MlError::MalformedModel` if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let (weights, bias) = persistence::load_params(path)?;
        Ok(Self { weights, bias })
    }
}

impl Model for LinearRegression {
    type Output = f64;
    type Sample = ScalarSample;

    fn compute(&mut self, input: ArrayView1<f64>) -> Result<f64> {
        self.predict(input)
    }

    fn train(
        &mut self,
        training: &[ScalarSample],
        validation: &[ScalarSample],
        batch_size: usize,
        learning_rate: f64,
        epochs: usize,
        verbose: bool,
    ) -> Result<()> {
        let batches = dataset::batches(training, batch_size)?;

        for epoch in 1..=epochs {
            for batch in &batches {
                self.update_params(batch, learning_rate)?;
            }

            if verbose {
                log::info!("epoch {epoch}: loss {}", self.loss(validation)?);
            }
        }

        Ok(())
    }

    /// Mean squared error over the samples.
    fn loss(&mut self, samples: &[ScalarSample]) -> Result<f64> {
        let mut loss = 0.0;

        for sample in samples {
            let error = sample.label() - self.predict(sample.data())?;
            loss += error * error;
        }

        Ok(loss / samples.len() as f64)
    }
}
