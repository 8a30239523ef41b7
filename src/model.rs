use ndarray::ArrayView1;

use crate::error::Result;

/// The common contract for the models in this crate.
///
/// A model performs inference over a vector input, trains over batches of
/// labelled samples, and measures its own loss over a sample set. `Output` is
/// a scalar for the regression models and a vector for the network; `Sample`
/// is the matching labelled pair type from [`crate::dataset`].
pub trait Model {
    /// Prediction type produced by `compute`.
    type Output;

    /// Labelled sample type consumed during training and evaluation.
    type Sample;

    /// Performs inference on a single input.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the input length does not match
    /// the model's input dimension.
    fn compute(&mut self, input: ArrayView1<f64>) -> Result<Self::Output>;

    /// Trains the model by mini-batch gradient descent.
    ///
    /// The training set is partitioned once into `len / batch_size` full
    /// batches plus one shorter remainder batch; every epoch runs the
    /// per-batch step over all of them in order. When `verbose` is set, the
    /// validation loss is logged after each epoch.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` if `batch_size` is zero or exceeds the
    /// training-set size, before any parameter is touched. Shape mismatches
    /// inside a batch abort training immediately.
    fn train(
        &mut self,
        training: &[Self::Sample],
        validation: &[Self::Sample],
        batch_size: usize,
        learning_rate: f64,
        epochs: usize,
        verbose: bool,
    ) -> Result<()>;

    /// Measures the model's loss over a sample set.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if a sample does not match the
    /// model's dimensions.
    fn loss(&mut self, samples: &[Self::Sample]) -> Result<f64>;
}
