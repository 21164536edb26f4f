use crate::assignment::{Assignment, RepeatType};
use crate::codec;
use crate::persistence::{AssignmentStore, PersistenceError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ServiceError {
    fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Content-derived record identifier.
///
/// SHA-256 of the encoded line plus the occurrence ordinal among identical
/// lines, so it survives re-sorting but changes when the record does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentKey(String);

impl AssignmentKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssignmentKey {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the key of every record, in the given (on-disk) order.
pub fn content_keys(records: &[Assignment]) -> Vec<AssignmentKey> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    records
        .iter()
        .map(|record| {
            let digest = hex::encode(Sha256::digest(codec::encode(record).as_bytes()));
            let ordinal = seen.entry(digest.clone()).or_insert(0);
            let key = AssignmentKey(format!("{digest}-{ordinal}"));
            *ordinal += 1;
            key
        })
        .collect()
}

/// One row of the sorted list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    /// Position in the backing file, usable with [`AssignmentService::delete`].
    pub index: usize,
    pub key: AssignmentKey,
    #[serde(flatten)]
    pub assignment: Assignment,
}

/// Add/delete/list over a store.
///
/// Every operation is one load→mutate→save pass. `write_lock` serializes
/// them so overlapping writers in this process cannot lose each other's
/// updates; other processes writing the same file are not coordinated.
pub struct AssignmentService<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: AssignmentStore> AssignmentService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records in file order.
    pub fn load(&self) -> ServiceResult<Vec<Assignment>> {
        let _guard = self.write_lock.lock();
        Ok(self.store.load()?)
    }

    /// Records sorted ascending by due date; ties keep file order.
    pub fn list(&self) -> ServiceResult<Vec<Assignment>> {
        let mut records = self.load()?;
        records.sort_by_key(|record| record.due_date);
        Ok(records)
    }

    pub fn list_entries(&self) -> ServiceResult<Vec<AssignmentEntry>> {
        let records = self.load()?;
        let keys = content_keys(&records);
        let mut entries: Vec<AssignmentEntry> = records
            .into_iter()
            .zip(keys)
            .enumerate()
            .map(|(index, (assignment, key))| AssignmentEntry {
                index,
                key,
                assignment,
            })
            .collect();
        entries.sort_by_key(|entry| entry.assignment.due_date);
        Ok(entries)
    }

    pub fn add(
        &self,
        name: &str,
        course: &str,
        due_date: &str,
        repeat: &str,
    ) -> ServiceResult<Assignment> {
        let name = name.trim();
        let course = course.trim();
        if name.is_empty() || course.is_empty() || due_date.is_empty() {
            return Err(ServiceError::validation("missing field"));
        }
        let due_date =
            codec::parse_due_date(due_date).ok_or_else(|| ServiceError::validation("bad date"))?;
        let record = Assignment::new(name, course, due_date, RepeatType::coerce(repeat));

        let _guard = self.write_lock.lock();
        self.store.append(record.clone())?;
        info!(
            name = %record.name,
            course = %record.course,
            due_date = %record.due_date,
            "assignment added"
        );
        Ok(record)
    }

    /// Removes the record at `index` in file order (not the sorted view).
    pub fn delete(&self, index: i64) -> ServiceResult<Assignment> {
        let _guard = self.write_lock.lock();
        let mut records = self.store.load()?;
        let position = usize::try_from(index)
            .ok()
            .filter(|position| *position < records.len())
            .ok_or_else(|| ServiceError::validation("invalid index"))?;
        let removed = records.remove(position);
        self.store.save(&records)?;
        info!(index = position, name = %removed.name, "assignment deleted");
        Ok(removed)
    }

    pub fn delete_by_key(&self, key: &AssignmentKey) -> ServiceResult<Assignment> {
        let _guard = self.write_lock.lock();
        let mut records = self.store.load()?;
        let position = content_keys(&records)
            .iter()
            .position(|candidate| candidate == key)
            .ok_or_else(|| ServiceError::NotFound(format!("assignment {key} not found")))?;
        let removed = records.remove(position);
        self.store.save(&records)?;
        info!(key = %key, name = %removed.name, "assignment deleted");
        Ok(removed)
    }

    /// Appends already-validated records, e.g. from an import file.
    pub fn extend(&self, incoming: Vec<Assignment>) -> ServiceResult<usize> {
        let _guard = self.write_lock.lock();
        let mut records = self.store.load()?;
        let added = incoming.len();
        records.extend(incoming);
        self.store.save(&records)?;
        info!(added, total = records.len(), "assignments imported");
        Ok(added)
    }
}
