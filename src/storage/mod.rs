// All persistence: datasets, fitted artifacts, the prediction log.

pub mod artifacts;
pub mod dataset;
pub mod prediction_log;
