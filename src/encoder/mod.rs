// One-hot feature encoding: fit once, transform identically forever after.
use crate::model::{CanonicalListing, PredictionInput};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Distinct categorical values observed at fit time, sorted so the
/// one-hot column order is deterministic. Immutable once fit; shared by
/// reference between fit and every transform call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub body_types: Vec<String>,
    pub fuel_types: Vec<String>,
    pub engine_classes: Vec<String>,
}

impl Vocabulary {
    fn from_records(records: &[CanonicalListing]) -> Self {
        let body_types: BTreeSet<&str> = records.iter().map(|r| r.body_type.as_str()).collect();
        let fuel_types: BTreeSet<&str> = records.iter().map(|r| r.fuel_type.as_str()).collect();
        let engine_classes: BTreeSet<&str> =
            records.iter().map(|r| r.engine_class.as_str()).collect();
        Self {
            body_types: body_types.into_iter().map(String::from).collect(),
            fuel_types: fuel_types.into_iter().map(String::from).collect(),
            engine_classes: engine_classes.into_iter().map(String::from).collect(),
        }
    }

    /// Fixed column order: body one-hot block, fuel block, engine block,
    /// then the two numeric columns. The regression is order-sensitive,
    /// so these names exist to pin the order, not to be looked up.
    pub fn column_names(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.n_columns());
        for value in &self.body_types {
            columns.push(format!("body_type_{value}"));
        }
        for value in &self.fuel_types {
            columns.push(format!("fuel_type_{value}"));
        }
        for value in &self.engine_classes {
            columns.push(format!("engine_class_{value}"));
        }
        columns.push("power".into());
        columns.push("vehicle_age".into());
        columns
    }

    pub fn n_columns(&self) -> usize {
        self.body_types.len() + self.fuel_types.len() + self.engine_classes.len() + 2
    }
}

/// Mean/scale for the two numeric columns (power, vehicle age). Fit on
/// the training rows only and persisted, never refit at inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; 2],
    pub scale: [f64; 2],
}

impl StandardScaler {
    pub fn fit(rows: &[(f64, f64)]) -> Self {
        let n = rows.len().max(1) as f64;
        let mean_power = rows.iter().map(|(p, _)| p).sum::<f64>() / n;
        let mean_age = rows.iter().map(|(_, a)| a).sum::<f64>() / n;
        let var_power = rows.iter().map(|(p, _)| (p - mean_power).powi(2)).sum::<f64>() / n;
        let var_age = rows.iter().map(|(_, a)| (a - mean_age).powi(2)).sum::<f64>() / n;
        Self {
            mean: [mean_power, mean_age],
            scale: [nonzero(var_power.sqrt()), nonzero(var_age.sqrt())],
        }
    }

    fn apply(&self, power: f64, age: f64) -> (f64, f64) {
        (
            (power - self.mean[0]) / self.scale[0],
            (age - self.mean[1]) / self.scale[1],
        )
    }
}

/// A constant column standardizes to zero, not to NaN.
fn nonzero(std: f64) -> f64 {
    if std == 0.0 { 1.0 } else { std }
}

/// The fitted encoder: vocabulary plus optional numeric scaler. This is
/// the artifact that must stay paired with the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedEncoder {
    pub vocabulary: Vocabulary,
    pub scaler: Option<StandardScaler>,
}

impl FittedEncoder {
    /// Learns the category vocabulary from the canonical dataset. The
    /// baseline serving path passes numerics through unscaled.
    pub fn fit(records: &[CanonicalListing]) -> Self {
        Self {
            vocabulary: Vocabulary::from_records(records),
            scaler: None,
        }
    }

    /// Attaches a scaler fit on the given training rows only.
    pub fn with_scaler(mut self, training_rows: &[CanonicalListing]) -> Self {
        let numeric: Vec<(f64, f64)> = training_rows
            .iter()
            .map(|r| (r.power, f64::from(r.vehicle_age)))
            .collect();
        self.scaler = Some(StandardScaler::fit(&numeric));
        self
    }

    pub fn transform_record(&self, record: &CanonicalListing) -> Vec<f64> {
        self.transform(
            &record.body_type,
            &record.fuel_type,
            record.engine_class.as_str(),
            record.power,
            f64::from(record.vehicle_age),
        )
    }

    pub fn transform_input(&self, input: &PredictionInput) -> Vec<f64> {
        self.transform(
            &input.body_type,
            &input.fuel_type,
            &input.engine_class,
            input.power,
            f64::from(input.vehicle_age),
        )
    }

    pub fn transform_all(&self, records: &[CanonicalListing]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform_record(r)).collect()
    }

    /// One indicator set per known categorical value; a value never seen
    /// at fit time leaves its whole block zero, never errors.
    fn transform(
        &self,
        body_type: &str,
        fuel_type: &str,
        engine_class: &str,
        power: f64,
        vehicle_age: f64,
    ) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.vocabulary.n_columns());
        one_hot(&self.vocabulary.body_types, body_type, &mut features);
        one_hot(&self.vocabulary.fuel_types, fuel_type, &mut features);
        one_hot(&self.vocabulary.engine_classes, engine_class, &mut features);

        let (power, vehicle_age) = match &self.scaler {
            Some(scaler) => scaler.apply(power, vehicle_age),
            None => (power, vehicle_age),
        };
        features.push(power);
        features.push(vehicle_age);
        features
    }

    pub fn n_columns(&self) -> usize {
        self.vocabulary.n_columns()
    }

    /// Stable hash over the ordered column names. The trained model
    /// stores the same value; a mismatch at load time is fatal.
    pub fn schema_fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.vocabulary.column_names().hash(&mut hasher);
        self.scaler.is_some().hash(&mut hasher);
        hasher.finish()
    }
}

fn one_hot(block: &[String], value: &str, out: &mut Vec<f64>) {
    for known in block {
        out.push(if known == value { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EngineClass;

    fn record(body: &str, fuel: &str, class: EngineClass, power: f64, age: u32) -> CanonicalListing {
        CanonicalListing {
            consumption: 6.0,
            vehicle_age: age,
            body_type: body.into(),
            fuel_type: fuel.into(),
            engine_class: class,
            power,
        }
    }

    fn fitted() -> FittedEncoder {
        FittedEncoder::fit(&[
            record("SUV", "benzín", EngineClass::I4, 110.0, 7),
            record("hatchback", "diesel", EngineClass::I3, 66.0, 3),
            record("kombi", "diesel", EngineClass::I6, 140.0, 5),
        ])
    }

    #[test]
    fn column_order_is_sorted_blocks_then_numerics() {
        assert_eq!(
            fitted().vocabulary.column_names(),
            vec![
                "body_type_SUV",
                "body_type_hatchback",
                "body_type_kombi",
                "fuel_type_benzín",
                "fuel_type_diesel",
                "engine_class_I3",
                "engine_class_I4",
                "engine_class_I6",
                "power",
                "vehicle_age",
            ]
        );
    }

    #[test]
    fn round_trip_sets_one_indicator_per_block() {
        let encoder = fitted();
        let features =
            encoder.transform_record(&record("SUV", "benzín", EngineClass::I4, 110.0, 7));
        assert_eq!(
            features,
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 110.0, 7.0]
        );
    }

    #[test]
    fn unknown_category_encodes_to_zero_block() {
        let encoder = fitted();
        let features = encoder.transform_input(&PredictionInput {
            body_type: "kabriolet".into(),
            fuel_type: "diesel".into(),
            engine_class: "I4".into(),
            power: 90.0,
            vehicle_age: 2,
        });
        // Whole body block zero, the rest untouched.
        assert_eq!(&features[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&features[3..5], &[0.0, 1.0]);
        assert_eq!(features.len(), encoder.n_columns());
    }

    #[test]
    fn scaler_is_persisted_and_reapplied_identically() {
        let train = [
            record("SUV", "benzín", EngineClass::I4, 100.0, 4),
            record("SUV", "benzín", EngineClass::I4, 140.0, 8),
        ];
        let encoder = FittedEncoder::fit(&train).with_scaler(&train);

        let json = serde_json::to_string(&encoder).unwrap();
        let reloaded: FittedEncoder = serde_json::from_str(&json).unwrap();
        assert_eq!(encoder, reloaded);

        let features = reloaded.transform_record(&train[0]);
        let n = features.len();
        // mean 120 / std 20 and mean 6 / std 2.
        assert_eq!(features[n - 2], -1.0);
        assert_eq!(features[n - 1], -1.0);
    }

    #[test]
    fn fingerprint_tracks_the_vocabulary() {
        let a = fitted();
        let b = FittedEncoder::fit(&[record("SUV", "benzín", EngineClass::I4, 110.0, 7)]);
        assert_ne!(a.schema_fingerprint(), b.schema_fingerprint());
        assert_eq!(a.schema_fingerprint(), fitted().schema_fingerprint());
    }
}
