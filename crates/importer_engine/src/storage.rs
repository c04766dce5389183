use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::slot_filename;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage directory missing or not writable: {0}")]
    StorageDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Named key-value slots the fetched inventories land in.
///
/// Implementations are shared by every account of a run and are not
/// synchronized beyond what a single write needs.
pub trait SlotStore: Send + Sync {
    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError>;
    fn read(&self, slot: &str) -> Result<Option<String>, PersistError>;
}

#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds complete entries; every write is a single insert.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotStore for MemorySlotStore {
    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        self.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self, slot: &str) -> Result<Option<String>, PersistError> {
        Ok(self.lock().get(slot).cloned())
    }
}

/// One file per slot under `dir`, named by [`slot_filename`].
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    writer: AtomicFileWriter,
}

impl FileSlotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn path_for(&self, slot: &str) -> PathBuf {
        self.writer.dir().join(slot_filename(slot))
    }
}

impl SlotStore for FileSlotStore {
    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        self.writer.write(&slot_filename(slot), value).map(|_| ())
    }

    fn read(&self, slot: &str) -> Result<Option<String>, PersistError> {
        read_optional(&self.path_for(slot))
    }
}

pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, PersistError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Ensure the directory exists; create if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StorageDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StorageDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StorageDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
