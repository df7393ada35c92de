// Core structs: RawListing, CanonicalListing, prediction records
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One scraped car listing, fields as found on the page. Free text,
/// units still attached. Created once per parsed page, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    /// Combined consumption, e.g. "5.4 l/100km".
    pub consumption: Option<String>,
    /// Production year as written on the page.
    pub year: Option<String>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    /// Engine descriptor, e.g. "1.6, 110 kW".
    pub engine: Option<String>,
    /// Power token from the Výkon block, e.g. "110kw".
    pub power: Option<String>,
}

impl RawListing {
    /// True when no field at all was found on the page ("no data").
    pub fn is_empty(&self) -> bool {
        self.consumption.is_none()
            && self.year.is_none()
            && self.body_type.is_none()
            && self.fuel_type.is_none()
            && self.engine.is_none()
            && self.power.is_none()
    }
}

/// Coarse cylinder-configuration label derived from the engine descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineClass {
    I3,
    I4,
    I5,
    I6,
    V6,
    V8,
}

impl EngineClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineClass::I3 => "I3",
            EngineClass::I4 => "I4",
            EngineClass::I5 => "I5",
            EngineClass::I6 => "I6",
            EngineClass::V6 => "V6",
            EngineClass::V8 => "V8",
        }
    }

}

impl std::fmt::Display for EngineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing after cleaning. Every field is present and parsed; records
/// that failed any derivation step were dropped, never null-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalListing {
    /// Combined consumption in l/100km, unit stripped.
    pub consumption: f64,
    /// Reference year minus production year, never negative.
    pub vehicle_age: u32,
    pub body_type: String,
    pub fuel_type: String,
    pub engine_class: EngineClass,
    /// Power in kW, unit stripped.
    pub power: f64,
}

/// User-supplied inputs for one prediction request. Categorical fields
/// stay free strings: values outside the fitted vocabulary are allowed
/// and encode to an all-zero block.
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub body_type: String,
    pub fuel_type: String,
    pub engine_class: String,
    pub power: f64,
    pub vehicle_age: u32,
}

/// One served prediction, as appended to the prediction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub body_type: String,
    pub fuel_type: String,
    pub engine_class: String,
    pub power: f64,
    pub vehicle_age: u32,
    pub fuel_consumption: f64,
    pub predicted_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {0} after retries exhausted")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing input file: {0}")]
    MissingInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature vector has {got} columns, model was fit with {expected}")]
    DimensionMismatch { got: usize, expected: usize },
    #[error("encoder/model pairing mismatch: encoder schema {encoder:#x}, model schema {model:#x}")]
    SchemaMismatch { encoder: u64, model: u64 },
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("normal equations are singular, cannot solve")]
    SingularSystem,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
}
