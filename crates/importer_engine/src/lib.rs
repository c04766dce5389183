//! Importer engine: transport, storage, session gate and the import coordinator.
mod account;
mod coordinator;
mod engine;
mod fetch;
mod filename;
mod json;
mod session;
mod storage;
mod types;

pub use account::{extract_inventory, AccountFetcher};
pub use coordinator::{ImportCoordinator, NullSink, ProgressSink};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, InventorySource, ReqwestSource};
pub use filename::slot_filename;
pub use session::{FileSessionStore, MemorySessionStore, SessionGate, SessionStore, SESSION_KEY};
pub use storage::{
    ensure_dir, AtomicFileWriter, FileSlotStore, MemorySlotStore, PersistError, SlotStore,
};
pub use types::{EngineEvent, RawResponse, RunId, RunRejected, TransportError};
