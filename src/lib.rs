//! A minimal supervised-learning toolkit: linear regression, logistic
//! regression, and a feed-forward neural network, all trained by mini-batch
//! gradient descent. The network composes dense and activation layers into a
//! pipeline whose dense layers embed their own Adam optimizer state.

pub mod activations;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod linreg;
pub mod logreg;
pub mod model;
pub mod network;
pub mod optimization;
mod persistence;
mod test;

pub use activations::ActFn;
pub use dataset::{BinarySample, ScalarSample, VectorSample};
pub use error::{MlError, Result};
pub use layers::{Activation, Dense, Layer};
pub use linreg::LinearRegression;
pub use logreg::LogisticRegression;
pub use model::Model;
pub use network::Network;
