mod adam;

pub use adam::{AdamState, BETA1, BETA2, EPSILON};
