// Predictor module: the trained regression function and its evaluation.

pub mod evaluation;
pub mod regression;

pub use evaluation::{train_test_split, Metrics};
pub use regression::LinearModel;
