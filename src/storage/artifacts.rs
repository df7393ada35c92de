use crate::encoder::FittedEncoder;
use crate::model::{ModelError, StorageError};
use crate::predictor::LinearModel;
use std::fs;

use super::dataset::require_file;

pub fn save_encoder(path: &str, encoder: &FittedEncoder) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(encoder)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_encoder(path: &str) -> Result<FittedEncoder, StorageError> {
    require_file(path)?;
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save_model(path: &str, model: &LinearModel) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(model)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_model(path: &str) -> Result<LinearModel, StorageError> {
    require_file(path)?;
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// A model may only serve predictions with the encoder it was fit
/// against; a mismatched pairing would silently mispredict. Must pass
/// before any inference call.
pub fn validate_pairing(encoder: &FittedEncoder, model: &LinearModel) -> Result<(), ModelError> {
    let encoder_schema = encoder.schema_fingerprint();
    if model.schema_fingerprint != encoder_schema || model.n_features != encoder.n_columns() {
        return Err(ModelError::SchemaMismatch {
            encoder: encoder_schema,
            model: model.schema_fingerprint,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalListing, EngineClass};

    fn encoder() -> FittedEncoder {
        FittedEncoder::fit(&[CanonicalListing {
            consumption: 5.4,
            vehicle_age: 7,
            body_type: "SUV".into(),
            fuel_type: "benzín".into(),
            engine_class: EngineClass::I4,
            power: 110.0,
        }])
    }

    #[test]
    fn matched_pairing_passes() {
        let encoder = encoder();
        let model = LinearModel {
            weights: vec![0.0; encoder.n_columns()],
            intercept: 6.0,
            n_features: encoder.n_columns(),
            schema_fingerprint: encoder.schema_fingerprint(),
        };
        assert!(validate_pairing(&encoder, &model).is_ok());
    }

    #[test]
    fn stale_model_is_rejected() {
        let encoder = encoder();
        let model = LinearModel {
            weights: vec![0.0; encoder.n_columns()],
            intercept: 6.0,
            n_features: encoder.n_columns(),
            schema_fingerprint: encoder.schema_fingerprint() ^ 1,
        };
        assert!(matches!(
            validate_pairing(&encoder, &model),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn missing_artifact_fails_loudly() {
        assert!(matches!(
            load_model("/nonexistent/model.json"),
            Err(StorageError::MissingInput(_))
        ));
    }
}
