use super::{AssignmentStore, PersistenceResult};
use crate::{Assignment, codec};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Flat text file holding one encoded record per line.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl AssignmentStore for FlatFileStore {
    fn load(&self) -> PersistenceResult<Vec<Assignment>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records = Vec::new();
        for (line_no, raw) in contents.split(|byte| *byte == b'\n').enumerate() {
            let Ok(line) = std::str::from_utf8(raw) else {
                debug!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    "skipping assignment line that is not valid UTF-8"
                );
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode(line) {
                Some(record) => records.push(record),
                None => debug!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    "skipping malformed assignment line"
                ),
            }
        }
        Ok(records)
    }

    // Written to a sibling temp file and renamed over the target so readers
    // never observe a half-written file.
    fn save(&self, records: &[Assignment]) -> PersistenceResult<()> {
        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            for record in records {
                writer.write_all(codec::encode(record).as_bytes())?;
            }
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

pub fn export_assignments_to_json<P: AsRef<Path>>(
    records: &[Assignment],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

pub fn import_assignments_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Assignment>> {
    let file = File::open(path)?;
    let records: Vec<Assignment> = serde_json::from_reader(file)?;
    super::validate_records(&records)?;
    Ok(records)
}

pub fn export_assignments_to_csv<P: AsRef<Path>>(
    records: &[Assignment],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn import_assignments_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Assignment>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for record in reader.deserialize::<Assignment>() {
        records.push(record?);
    }
    super::validate_records(&records)?;
    Ok(records)
}
