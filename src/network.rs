use ndarray::{Array1, ArrayView1};

use crate::{
    dataset::{self, VectorSample},
    error::{MlError, Result},
    layers::Layer,
    model::Model,
};

// Guard inside the loss logarithm; kept at the literal value the accuracy
// threshold below was tuned against one-hot labels with.
const LOSS_EPSILON: f64 = 1e-8;
const ACCURACY_THRESHOLD: f64 = 0.9;

/// An ordered pipeline of layers trained by mini-batch gradient descent.
///
/// Forward passes compose left to right, backward passes right to left. The
/// layer list is built once through `add_layer` and stays fixed during
/// training; dimension compatibility between consecutive layers is the
/// caller's responsibility and surfaces as a `ShapeMismatch` from the first
/// offending layer.
#[derive(Default)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer to the pipeline. There is no removal operation.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Feeds `input` through every layer in order.
    ///
    /// Learnable parameters are untouched, but each layer's remembered
    /// forward state is overwritten.
    pub fn compute(&mut self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        let mut x = input.to_owned();

        for layer in &mut self.layers {
            x = layer.forward(x.view())?;
        }

        Ok(x)
    }

    /// One training step over a batch: zero every accumulator, accumulate
    /// per-sample gradients from the `prediction - label` seed, then update
    /// every layer.
    ///
    /// The epoch index doubles as the Adam time step for every batch of that
    /// epoch, a deliberate departure from canonical Adam's per-update
    /// counter (see DESIGN.md).
    fn forward_backward(
        &mut self,
        batch: &[VectorSample],
        learning_rate: f64,
        epoch: usize,
    ) -> Result<()> {
        for layer in &mut self.layers {
            layer.zero_grad();
        }

        for sample in batch {
            let prediction = self.compute(sample.data())?;
            let label = sample.label();

            if label.len() != prediction.len() {
                return Err(MlError::ShapeMismatch {
                    what: "label",
                    got: label.len(),
                    expected: prediction.len(),
                });
            }

            let mut gradient = &prediction - &label;
            for layer in self.layers.iter_mut().rev() {
                gradient = layer.backward(gradient.view())?;
            }
        }

        for layer in &mut self.layers {
            layer.update(learning_rate, epoch, batch.len());
        }

        Ok(())
    }

    /// Trains over `epochs` passes of the batched training set.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` for an invalid `batch_size` before any
    /// parameter changes; shape mismatches abort training immediately.
    pub fn train(
        &mut self,
        training: &[VectorSample],
        validation: &[VectorSample],
        batch_size: usize,
        learning_rate: f64,
        epochs: usize,
        verbose: bool,
    ) -> Result<()> {
        let batches = dataset::batches(training, batch_size)?;

        if verbose {
            log::info!("starting training: {} batches per epoch", batches.len());
        }

        for epoch in 1..=epochs {
            for batch in &batches {
                self.forward_backward(batch, learning_rate, epoch)?;
            }

            if verbose {
                let loss = self.loss(validation)?;
                let accuracy = self.accuracy(validation)?;
                log::info!("epoch {epoch}: loss {loss}, accuracy {accuracy}");
            }
        }

        Ok(())
    }

    /// Cross-entropy style loss, `−y · ln(ŷ + ε)` averaged over the samples.
    pub fn loss(&mut self, samples: &[VectorSample]) -> Result<f64> {
        let mut total = 0.0;

        for sample in samples {
            let prediction = self.compute(sample.data())?;
            let log_prediction = prediction.mapv(|p| (p + LOSS_EPSILON).ln());
            total -= sample.label().dot(&log_prediction);
        }

        Ok(total / samples.len() as f64)
    }

    /// Fraction of samples whose prediction satisfies `y·ŷ ≥ 0.9`.
    pub fn accuracy(&mut self, samples: &[VectorSample]) -> Result<f64> {
        let mut correct = 0usize;

        for sample in samples {
            let prediction = self.compute(sample.data())?;

            if sample.label().dot(&prediction) >= ACCURACY_THRESHOLD {
                correct += 1;
            }
        }

        Ok(correct as f64 / samples.len() as f64)
    }
}

impl Model for Network {
    type Output = Array1<f64>;
    type Sample = VectorSample;

    fn compute(&mut self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        Network::compute(self, input)
    }

    fn train(
        &mut self,
        training: &[VectorSample],
        validation: &[VectorSample],
        batch_size: usize,
        learning_rate: f64,
        epochs: usize,
        verbose: bool,
    ) -> Result<()> {
        Network::train(
            self,
            training,
            validation,
            batch_size,
            learning_rate,
            epochs,
            verbose,
        )
    }

    fn loss(&mut self, samples: &[VectorSample]) -> Result<f64> {
        Network::loss(self, samples)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layers::Dense;
    use ndarray::array;

    fn identity_2x2() -> Network {
        let mut net = Network::new();
        let dense = Dense::from_parts(array![[1.0, 0.0], [0.0, 1.0]], array![0.0, 0.0]).unwrap();
        net.add_layer(Layer::Dense(dense));
        net
    }

    #[test]
    fn compute_composes_layers_in_order() {
        let mut net = Network::new();
        net.add_layer(Layer::Dense(
            Dense::from_parts(array![[2.0, 3.0]], array![0.0]).unwrap(),
        ));

        let y = net.compute(array![1.0, 1.0].view()).unwrap();
        assert_eq!(y, array![5.0]);
    }

    #[test]
    fn compute_propagates_shape_errors() {
        let mut net = identity_2x2();
        assert!(net.compute(array![1.0].view()).is_err());
    }

    #[test]
    fn accuracy_is_one_for_exact_one_hot_predictions() {
        let mut net = identity_2x2();
        let samples = [
            VectorSample::new(array![1.0, 0.0], array![1.0, 0.0]),
            VectorSample::new(array![0.0, 1.0], array![0.0, 1.0]),
        ];

        assert_eq!(net.accuracy(&samples).unwrap(), 1.0);
    }

    #[test]
    fn accuracy_is_zero_below_the_similarity_threshold() {
        let mut net = identity_2x2();
        let samples = [
            VectorSample::new(array![0.5, 0.0], array![1.0, 0.0]),
            VectorSample::new(array![1.0, 0.0], array![0.0, 1.0]),
        ];

        assert_eq!(net.accuracy(&samples).unwrap(), 0.0);
    }

    #[test]
    fn loss_penalizes_near_zero_predicted_probability() {
        let mut net = identity_2x2();

        let confident = [VectorSample::new(array![1.0, 0.0], array![1.0, 0.0])];
        let wrong = [VectorSample::new(array![0.0, 1.0], array![1.0, 0.0])];

        let low = net.loss(&confident).unwrap();
        let high = net.loss(&wrong).unwrap();

        assert!(low < high);
        assert!(high.is_finite()); // the ε guard keeps ln away from zero
    }

    #[test]
    fn train_rejects_oversized_batches() {
        let mut net = identity_2x2();
        let samples = [VectorSample::new(array![1.0, 0.0], array![1.0, 0.0])];

        assert!(net.train(&samples, &samples, 2, 0.01, 1, false).is_err());
    }

    #[test]
    fn train_rejects_mismatched_labels() {
        let mut net = identity_2x2();
        let samples = [
            VectorSample::new(array![1.0, 0.0], array![1.0, 0.0]),
            VectorSample::new(array![0.0, 1.0], array![1.0]),
        ];

        assert!(net.train(&samples, &samples, 2, 0.01, 1, false).is_err());
    }
}
