use super::backend::{AliasRecord, StorageBackend};
use crate::error::{Result, WrkError};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since wrk is single-threaded, so the
/// `StorageBackend` trait can keep `&self` everywhere. Counts loads and saves so
/// tests can assert that a command never touched the store.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<Vec<AliasRecord>>,
    loads: Cell<usize>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AliasRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Stand-in for another process appending to the store behind our back.
    pub fn push_external(&self, record: AliasRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn records(&self) -> Vec<AliasRecord> {
        self.records.borrow().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StorageBackend for MemBackend {
    fn load_records(&self) -> Result<Vec<AliasRecord>> {
        self.loads.set(self.loads.get() + 1);
        Ok(self.records.borrow().clone())
    }

    fn save_records(&self, records: &[AliasRecord]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(WrkError::Store("Simulated write error".to_string()));
        }
        self.saves.set(self.saves.get() + 1);
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://ids.json")
    }
}
