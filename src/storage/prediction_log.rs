use crate::model::{PredictionRecord, StorageError};
use std::fs::{self, OpenOptions};

use super::dataset::require_file;

/// Appends one served prediction. The header goes in only when the file
/// is empty or did not exist yet.
pub fn append(path: &str, record: &PredictionRecord) -> Result<(), StorageError> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

/// Re-reads the whole log. The file is the source of truth; anything
/// held in memory is a rebuildable cache over it.
pub fn list(path: &str) -> Result<Vec<PredictionRecord>, StorageError> {
    require_file(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for (row, result) in reader.deserialize().enumerate() {
        let record: PredictionRecord = result.map_err(|e| StorageError::MalformedRow {
            row: row + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
