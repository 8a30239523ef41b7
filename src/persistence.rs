//! Whitespace-delimited parameter text format shared by the regression
//! models: first line the weight values separated by single spaces, second
//! line the bias.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use ndarray::{Array1, ArrayView1};

use crate::error::{MlError, Result};

/// Writes weights and bias to a new file.
///
/// # Errors
/// Returns `MlError::Io` if the destination already exists (no silent
/// overwrite) or cannot be written.
pub(crate) fn save_params(path: &Path, weights: ArrayView1<f64>, bias: f64) -> Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;

    let values: Vec<String> = weights.iter().map(|w| w.to_string()).collect();
    writeln!(file, "{}", values.join(" "))?;
    write!(file, "{bias}")?;

    Ok(())
}

/// Reads weights and bias back with the same tokenizer.
///
/// # Errors
/// Returns `MlError::Io` if the source is missing or unreadable, and
/// `MlError::MalformedModel` if either line fails to parse. Nothing is
/// returned partially.
pub(crate) fn load_params(path: &Path) -> Result<(Array1<f64>, f64)> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let weight_line = lines
        .next()
        .ok_or(MlError::MalformedModel("missing weights line"))?;
    let bias_line = lines
        .next()
        .ok_or(MlError::MalformedModel("missing bias line"))?;

    let weights = weight_line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| MlError::MalformedModel("unparsable weight value"))
        })
        .collect::<Result<Vec<f64>>>()?;

    if weights.is_empty() {
        return Err(MlError::MalformedModel("empty weights line"));
    }

    let bias = bias_line
        .trim()
        .parse::<f64>()
        .map_err(|_| MlError::MalformedModel("unparsable bias value"))?;

    Ok((Array1::from_vec(weights), bias))
}
