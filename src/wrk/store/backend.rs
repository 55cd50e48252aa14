use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One persisted alias, kept in its textual form.
///
/// Fields stay strings so that records written by a newer wrk (say, with a type
/// prefix this version doesn't know) can be skipped instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub wrk: String,
    #[serde(rename = "type")]
    pub tag: String,
    pub id: String,
}

/// Raw persistence for alias records.
/// The `AliasStore` owns the semantics (uniqueness, allocation); backends only move bytes.
pub trait StorageBackend {
    /// Load every persisted record. Missing storage is an empty set, not an error.
    fn load_records(&self) -> Result<Vec<AliasRecord>>;

    /// Replace the persisted records.
    /// MUST be atomic: a concurrent reader sees the old set or the new one, never a mix.
    fn save_records(&self, records: &[AliasRecord]) -> Result<()>;

    /// Where the records live, for messages and logs.
    fn location(&self) -> PathBuf;
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn load_records(&self) -> Result<Vec<AliasRecord>> {
        (**self).load_records()
    }

    fn save_records(&self, records: &[AliasRecord]) -> Result<()> {
        (**self).save_records(records)
    }

    fn location(&self) -> PathBuf {
        (**self).location()
    }
}
