use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use importer_logging::{importer_debug, importer_error, importer_warn};

use crate::filename::slot_filename;
use crate::storage::{read_optional, AtomicFileWriter, PersistError};

/// Name of the marker recording that this session already imported.
pub const SESSION_KEY: &str = "seelie_imported_session";

const MARKER_VALUE: &str = "true";

/// Session-scoped key-value store. Survives a reload, not the end of the session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn clear(&self, key: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), PersistError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Marker files in a session directory. Removing the directory ends the session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    writer: AtomicFileWriter,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.writer.dir().join(slot_filename(key))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        read_optional(&self.path_for(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.writer.write(&slot_filename(key), value).map(|_| ())
    }

    fn clear(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Decides whether page-ready may start an import on its own.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// True iff no run has been recorded in this session.
    ///
    /// An unreadable marker counts as unset: the worst case is one extra import.
    pub fn should_auto_run(&self) -> bool {
        match self.store.get(SESSION_KEY) {
            Ok(value) => value.as_deref() != Some(MARKER_VALUE),
            Err(err) => {
                importer_warn!("Failed to read session marker: {}", err);
                true
            }
        }
    }

    /// Records that this session has run. Idempotent.
    pub fn mark_run(&self) {
        match self.store.set(SESSION_KEY, MARKER_VALUE) {
            Ok(()) => importer_debug!("Session marked as imported"),
            Err(err) => importer_error!("Failed to write session marker: {}", err),
        }
    }

    /// Begins a new session by dropping the marker.
    pub fn reset(&self) -> Result<(), PersistError> {
        self.store.clear(SESSION_KEY)
    }
}
