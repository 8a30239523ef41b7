use ndarray::{Array1, ArrayView1};

use crate::error::{MlError, Result};

/// A labelled sample for the network: vector input, vector label.
#[derive(Debug, Clone)]
pub struct VectorSample {
    data: Array1<f64>,
    label: Array1<f64>,
}

impl VectorSample {
    pub fn new(data: Array1<f64>, label: Array1<f64>) -> Self {
        Self { data, label }
    }

    pub fn data(&self) -> ArrayView1<'_, f64> {
        self.data.view()
    }

    pub fn label(&self) -> ArrayView1<'_, f64> {
        self.label.view()
    }
}

/// A labelled sample for linear regression: vector input, scalar label.
#[derive(Debug, Clone)]
pub struct ScalarSample {
    data: Array1<f64>,
    label: f64,
}

impl ScalarSample {
    pub fn new(data: Array1<f64>, label: f64) -> Self {
        Self { data, label }
    }

    pub fn data(&self) -> ArrayView1<'_, f64> {
        self.data.view()
    }

    pub fn label(&self) -> f64 {
        self.label
    }
}

/// A labelled sample for logistic regression: vector input, boolean label.
#[derive(Debug, Clone)]
pub struct BinarySample {
    data: Array1<f64>,
    label: bool,
}

impl BinarySample {
    pub fn new(data: Array1<f64>, label: bool) -> Self {
        Self { data, label }
    }

    pub fn data(&self) -> ArrayView1<'_, f64> {
        self.data.view()
    }

    pub fn label(&self) -> bool {
        self.label
    }

    /// The label as the 0/1 target the gradient formulas consume.
    pub fn label_value(&self) -> f64 {
        if self.label {
            1.0
        } else {
            0.0
        }
    }
}

/// Partitions `samples` into `len / batch_size` full batches plus, when the
/// division is not exact, one shorter remainder batch.
///
/// The partition is built once per training call and reused across epochs;
/// samples are not re-shuffled between epochs.
///
/// # Errors
/// Returns `MlError::InvalidInput` if `batch_size` is zero or exceeds the
/// number of samples.
pub fn batches<T>(samples: &[T], batch_size: usize) -> Result<Vec<&[T]>> {
    if batch_size == 0 {
        return Err(MlError::InvalidInput("batch size must be greater than zero"));
    }

    if batch_size > samples.len() {
        return Err(MlError::InvalidInput("batch size must not exceed data size"));
    }

    Ok(samples.chunks(batch_size).collect())
}
