use crate::Assignment;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persistence boundary for the full, ordered assignment collection.
///
/// Implementations always hand back the whole collection and always replace
/// it wholesale; there is no incremental update.
pub trait AssignmentStore: Send + Sync {
    fn load(&self) -> PersistenceResult<Vec<Assignment>>;
    fn save(&self, records: &[Assignment]) -> PersistenceResult<()>;

    fn append(&self, record: Assignment) -> PersistenceResult<()> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }
}

pub fn validate_records(records: &[Assignment]) -> PersistenceResult<()> {
    for (idx, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() || record.course.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "record #{idx} requires a non-empty name and course"
            )));
        }
    }
    Ok(())
}

pub mod file;

pub use file::{
    FlatFileStore, export_assignments_to_csv, export_assignments_to_json,
    import_assignments_from_csv, import_assignments_from_json,
};
