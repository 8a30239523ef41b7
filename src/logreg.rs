use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::{
    activations::sigmoid,
    dataset::{self, BinarySample},
    error::{MlError, Result},
    model::Model,
    persistence,
};

// Keeps the cross-entropy logs finite when a prediction saturates.
const LOSS_EPSILON: f64 = 1e-8;

/// Multifeature logistic regression, `ŷ = σ(w·x + b)`, mapping inputs to
/// (0, 1) and trained by mini-batch gradient descent.
pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Creates a model with all parameters at zero.
    pub fn new(features: usize) -> Self {
        Self {
            weights: Array1::zeros(features),
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

    fn predict(&self, x: ArrayView1<f64>) -> Result<f64> {
        if x.len() != self.weights.len() {
            return Err(MlError::ShapeMismatch {
                what: "regression input",
                got: x.len(),
                expected: self.weights.len(),
            });
        }

        Ok(sigmoid(self.weights.dot(&x) + self.bias))
    }

    /// One mini-batch step with the cross-entropy gradient `ŷ − y`.
    fn update_params(&mut self, batch: &[BinarySample], learning_rate: f64) -> Result<()> {
        let mut delta_weights = Array1::<f64>::zeros(self.weights.len());
        let mut delta_bias = 0.0;

        for sample in batch {
            let error = sample.label_value() - self.predict(sample.data())?;

            delta_weights.scaled_add(-error, &sample.data());
            delta_bias += -error;
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

impl Model for LogisticRegression {
    type Output = f64;
    type Sample = BinarySample;

    fn compute(&mut self, input: ArrayView1<f64>) -> Result<f64> {
        self.predict(input)
    }

    fn train(
        &mut self,
        training: &[BinarySample],
        validation: &[BinarySample],
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

    /// Cross-entropy between the predicted probabilities and the boolean
    /// labels, averaged over the samples.
    fn loss(&mut self, samples: &[BinarySample]) -> Result<f64> {
        let mut loss = 0.0;

        for sample in samples {
            let prediction = self.predict(sample.data())?;

            loss -= if sample.label() {
                (prediction + LOSS_EPSILON).ln()
            } else {
                (1.0 - prediction + LOSS_EPSILON).ln()
            };
        }

        Ok(loss / samples.len() as f64)
    }
}
