use crate::model::{CanonicalListing, RawListing, StorageError};
use std::path::Path;

/// Raw dataset: unit-bearing free text exactly as scraped, empty cells
/// for missing fields.
pub fn write_raw(path: &str, listings: &[RawListing]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_raw(path: &str) -> Result<Vec<RawListing>, StorageError> {
    require_file(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let mut listings = Vec::new();
    for (row, result) in reader.deserialize().enumerate() {
        let listing: RawListing = result.map_err(|e| StorageError::MalformedRow {
            row: row + 1,
            reason: e.to_string(),
        })?;
        listings.push(listing);
    }
    Ok(listings)
}

/// Canonical dataset: fully cleaned, plain floats, one schema version
/// per file.
pub fn write_canonical(path: &str, listings: &[CanonicalListing]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_canonical(path: &str) -> Result<Vec<CanonicalListing>, StorageError> {
    require_file(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let mut listings = Vec::new();
    for (row, result) in reader.deserialize().enumerate() {
        let listing: CanonicalListing = result.map_err(|e| StorageError::MalformedRow {
            row: row + 1,
            reason: e.to_string(),
        })?;
        listings.push(listing);
    }
    Ok(listings)
}

pub(crate) fn require_file(path: &str) -> Result<(), StorageError> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(StorageError::MissingInput(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EngineClass;
    use std::env;

    fn temp_path(name: &str) -> String {
        env::temp_dir()
            .join(format!("spotreba-{}-{}.csv", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn raw_round_trip_keeps_missing_fields_missing() {
        let path = temp_path("raw");
        let listings = vec![
            RawListing {
                consumption: Some("5.4 l/100km".into()),
                year: Some("2018".into()),
                body_type: Some("SUV".into()),
                fuel_type: Some("benzín".into()),
                engine: Some("1.6, 110 kW".into()),
                power: Some("110kw".into()),
            },
            RawListing {
                consumption: None,
                year: Some("2010".into()),
                ..Default::default()
            },
        ];
        write_raw(&path, &listings).unwrap();
        let reloaded = read_raw(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded, listings);
    }

    #[test]
    fn canonical_round_trip() {
        let path = temp_path("canonical");
        let listings = vec![CanonicalListing {
            consumption: 5.4,
            vehicle_age: 7,
            body_type: "SUV".into(),
            fuel_type: "benzín".into(),
            engine_class: EngineClass::I4,
            power: 110.0,
        }];
        write_canonical(&path, &listings).unwrap();
        let reloaded = read_canonical(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded, listings);
    }

    #[test]
    fn missing_input_fails_loudly() {
        let err = read_raw("/nonexistent/vsechna_auta.csv").unwrap_err();
        assert!(matches!(err, StorageError::MissingInput(_)));
    }
}
