//! # Alias Store
//!
//! The only state wrk keeps between runs: which short id stands for which Trello entity.
//! Entity contents are never stored.
//!
//! ## Split
//!
//! - [`AliasStore`] owns the semantics: the bidirectional index, uniqueness, and allocation
//!   of new short ids.
//! - [`StorageBackend`] moves records in and out of durable storage:
//!   - [`fs_backend::FsBackend`]: production, `ids.json` in the data directory, replaced
//!     atomically on every write.
//!   - [`mem_backend::MemBackend`]: in-memory, for tests.
//!
//! ## Invariants
//!
//! - A short id names exactly one [`CanonicalId`].
//! - A [`CanonicalId`] has at most one short id.
//! - A Trello id appears under one type only (Trello ids are unique across kinds).
//! - Short ids are never reused or reassigned; nothing is ever removed.
//!
//! Every mint is flushed immediately, so a crash mid-command loses nothing that was
//! already printed to the user.
//!
//! ## Concurrency
//!
//! Two wrk processes may run at once. Before minting, the store re-reads the backend and
//! merges whatever another process wrote, then allocates past the highest id seen. The
//! window between that re-read and the atomic save is the only place a race remains.

use crate::error::{Result, WrkError};
use crate::ids::{Alias, CanonicalId, RemoteId, ShortId, TypeTag};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::{AliasRecord, StorageBackend};

pub struct AliasStore<B: StorageBackend> {
    backend: B,
    by_short: BTreeMap<ShortId, CanonicalId>,
    by_canonical: HashMap<CanonicalId, ShortId>,
    by_remote: HashMap<RemoteId, ShortId>,
    // Records this version can't interpret; written back untouched.
    foreign: Vec<AliasRecord>,
    reserved: BTreeSet<ShortId>,
}

impl<B: StorageBackend> AliasStore<B> {
    pub fn load(backend: B) -> Result<Self> {
        let records = backend.load_records()?;
        let mut store = Self {
            backend,
            by_short: BTreeMap::new(),
            by_canonical: HashMap::new(),
            by_remote: HashMap::new(),
            foreign: Vec::new(),
            reserved: BTreeSet::new(),
        };
        store.absorb(records);
        tracing::debug!(
            location = %store.backend.location().display(),
            aliases = store.len(),
            "alias store loaded"
        );
        Ok(store)
    }

    pub fn get(&self, short_id: ShortId) -> Option<&CanonicalId> {
        self.by_short.get(&short_id)
    }

    pub fn short_id_of(&self, canonical: &CanonicalId) -> Option<ShortId> {
        self.by_canonical.get(canonical).copied()
    }

    /// Looks up a Trello id regardless of its type.
    pub fn find_by_remote(&self, remote_id: &RemoteId) -> Option<Alias> {
        let short_id = *self.by_remote.get(remote_id)?;
        let canonical = self.by_short.get(&short_id)?.clone();
        Some(Alias {
            short_id,
            canonical,
        })
    }

    /// All aliases, ordered by short id.
    pub fn aliases(&self) -> impl Iterator<Item = Alias> + '_ {
        self.by_short.iter().map(|(short_id, canonical)| Alias {
            short_id: *short_id,
            canonical: canonical.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.by_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_short.is_empty()
    }

    /// Returns the short id for `canonical`, minting and persisting one if needed.
    pub fn get_or_insert(&mut self, canonical: CanonicalId) -> Result<ShortId> {
        let short_ids = self.get_or_insert_all(std::slice::from_ref(&canonical))?;
        short_ids.first().copied().ok_or_else(|| unassigned(&canonical))
    }

    /// Short ids for every canonical id, in order.
    ///
    /// New ones are minted together: one re-read of the backend and one save per call.
    /// A failed save rolls all of them back.
    pub fn get_or_insert_all(&mut self, canonicals: &[CanonicalId]) -> Result<Vec<ShortId>> {
        let mut known = true;
        for canonical in canonicals {
            known &= self.existing(canonical)?.is_some();
        }
        if known {
            return canonicals
                .iter()
                .map(|c| self.short_id_of(c).ok_or_else(|| unassigned(c)))
                .collect();
        }

        // Another wrk may have minted aliases since we loaded
        let fresh = self.backend.load_records()?;
        self.absorb(fresh);

        let mut minted = Vec::new();
        let assigned = self.assign(canonicals, &mut minted);
        let short_ids = match assigned {
            Ok(short_ids) => short_ids,
            Err(e) => {
                self.forget_all(&minted);
                return Err(e);
            }
        };
        if minted.is_empty() {
            return Ok(short_ids);
        }

        if let Err(e) = self.backend.save_records(&self.records()) {
            self.forget_all(&minted);
            return Err(e);
        }
        for alias in &minted {
            tracing::debug!(short_id = %alias.short_id, canonical = %alias.canonical, "minted alias");
        }
        tracing::debug!(
            location = %self.backend.location().display(),
            minted = minted.len(),
            "alias store saved"
        );
        Ok(short_ids)
    }

    fn assign(&mut self, canonicals: &[CanonicalId], minted: &mut Vec<Alias>) -> Result<Vec<ShortId>> {
        let mut short_ids = Vec::with_capacity(canonicals.len());
        for canonical in canonicals {
            let short_id = match self.existing(canonical)? {
                Some(short_id) => short_id,
                None => {
                    let alias = Alias {
                        short_id: self.next_short_id()?,
                        canonical: canonical.clone(),
                    };
                    self.admit(alias.clone());
                    let short_id = alias.short_id;
                    minted.push(alias);
                    short_id
                }
            };
            short_ids.push(short_id);
        }
        Ok(short_ids)
    }

    fn existing(&self, canonical: &CanonicalId) -> Result<Option<ShortId>> {
        match self.find_by_remote(&canonical.remote_id) {
            Some(alias) if alias.canonical.tag == canonical.tag => Ok(Some(alias.short_id)),
            Some(alias) => Err(WrkError::Validation(format!(
                "Trello id {} already belongs to {} (type {}), not type {}",
                canonical.remote_id, alias.short_id, alias.canonical.tag, canonical.tag
            ))),
            None => Ok(None),
        }
    }

    fn next_short_id(&self) -> Result<ShortId> {
        let highest = self
            .by_short
            .keys()
            .next_back()
            .into_iter()
            .chain(self.reserved.iter().next_back())
            .max();
        match highest {
            None => Ok(ShortId::FIRST),
            Some(highest) => highest.next().ok_or_else(|| {
                WrkError::Store(format!("no short ids left after {}", highest))
            }),
        }
    }

    fn absorb(&mut self, records: Vec<AliasRecord>) {
        for record in records {
            match parse_record(&record) {
                Ok(alias) => {
                    if !self.admit(alias) {
                        self.keep_foreign(record);
                    }
                }
                Err(reason) => {
                    tracing::warn!(wrk = %record.wrk, "keeping unrecognized alias record: {}", reason);
                    self.keep_foreign(record);
                }
            }
        }
    }

    /// Holds on to a record without indexing it. Its short id is never handed out again.
    fn keep_foreign(&mut self, record: AliasRecord) {
        if let Ok(short_id) = record.wrk.parse::<ShortId>() {
            self.reserved.insert(short_id);
        }
        if !self.foreign.contains(&record) {
            self.foreign.push(record);
        }
    }

    /// Adds an alias unless it would break uniqueness. First one in wins.
    fn admit(&mut self, alias: Alias) -> bool {
        if let Some(existing) = self.by_short.get(&alias.short_id) {
            if *existing != alias.canonical {
                tracing::warn!(
                    short_id = %alias.short_id,
                    "dropping alias for {}: already bound to {}",
                    alias.canonical,
                    existing
                );
                return false;
            }
            return true;
        }
        if let Some(short_id) = self.by_remote.get(&alias.canonical.remote_id) {
            tracing::warn!(
                short_id = %alias.short_id,
                "dropping alias for {}: already known as {}",
                alias.canonical,
                short_id
            );
            return false;
        }

        self.by_remote
            .insert(alias.canonical.remote_id.clone(), alias.short_id);
        self.by_canonical
            .insert(alias.canonical.clone(), alias.short_id);
        self.by_short.insert(alias.short_id, alias.canonical);
        true
    }

    fn forget_all(&mut self, aliases: &[Alias]) {
        for alias in aliases {
            self.by_short.remove(&alias.short_id);
            self.by_canonical.remove(&alias.canonical);
            self.by_remote.remove(&alias.canonical.remote_id);
        }
    }

    fn records(&self) -> Vec<AliasRecord> {
        self.by_short
            .iter()
            .map(|(short_id, canonical)| AliasRecord {
                wrk: short_id.to_string(),
                tag: canonical.tag.prefix().to_string(),
                id: canonical.remote_id.to_string(),
            })
            .chain(self.foreign.iter().cloned())
            .collect()
    }
}

fn unassigned(canonical: &CanonicalId) -> WrkError {
    WrkError::Store(format!("no short id assigned to {}", canonical))
}

fn parse_record(record: &AliasRecord) -> std::result::Result<Alias, String> {
    let short_id = record.wrk.parse::<ShortId>()?;
    let tag = TypeTag::from_prefix(&record.tag)
        .ok_or_else(|| format!("unknown type prefix '{}'", record.tag))?;
    let remote_id = record.id.parse::<RemoteId>()?;
    Ok(Alias {
        short_id,
        canonical: CanonicalId::new(tag, remote_id),
    })
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;

    fn rid(n: u32) -> RemoteId {
        format!("{:024x}", n).parse().unwrap()
    }

    fn board(n: u32) -> CanonicalId {
        CanonicalId::new(TypeTag::Board, rid(n))
    }

    fn record(wrk: &str, tag: &str, n: u32) -> AliasRecord {
        AliasRecord {
            wrk: wrk.to_string(),
            tag: tag.to_string(),
            id: format!("{:024x}", n),
        }
    }

    #[test]
    fn test_first_alias_is_wrk1() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        let short_id = store.get_or_insert(board(1)).unwrap();
        assert_eq!(short_id.to_string(), "wrk1");
        assert_eq!(backend.records(), vec![record("wrk1", "b", 1)]);
    }

    #[test]
    fn test_same_canonical_gets_same_alias() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        let first = store.get_or_insert(board(1)).unwrap();
        let second = store.get_or_insert(board(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn test_distinct_canonicals_get_distinct_aliases() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        let ids: Vec<ShortId> = (1..=5)
            .map(|n| store.get_or_insert(board(n)).unwrap())
            .collect();
        let unique: BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 5);

        for alias in store.aliases() {
            assert_eq!(store.short_id_of(&alias.canonical), Some(alias.short_id));
            assert_eq!(store.get(alias.short_id), Some(&alias.canonical));
        }
    }

    #[test]
    fn test_load_rebuilds_both_directions() {
        let backend = MemBackend::with_records(vec![
            record("wrk1", "o", 10),
            record("wrk4", "c", 11),
        ]);
        let store = AliasStore::load(&backend).unwrap();

        let card = CanonicalId::new(TypeTag::Card, rid(11));
        assert_eq!(store.get("wrk4".parse().unwrap()), Some(&card));
        assert_eq!(store.short_id_of(&card).unwrap().to_string(), "wrk4");
        assert_eq!(
            store.find_by_remote(&rid(10)).unwrap().canonical.tag,
            TypeTag::Org
        );
    }

    #[test]
    fn test_allocation_continues_after_highest() {
        let backend = MemBackend::with_records(vec![record("wrk1", "o", 10), record("wrk7", "b", 11)]);
        let mut store = AliasStore::load(&backend).unwrap();
        assert_eq!(store.get_or_insert(board(12)).unwrap().to_string(), "wrk8");
    }

    #[test]
    fn test_same_remote_id_under_other_type_is_rejected() {
        let backend = MemBackend::with_records(vec![record("wrk1", "b", 1)]);
        let mut store = AliasStore::load(&backend).unwrap();
        let result = store.get_or_insert(CanonicalId::new(TypeTag::Card, rid(1)));
        assert!(matches!(result, Err(WrkError::Validation(_))));
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_conflicting_records_first_wins() {
        let backend = MemBackend::with_records(vec![
            record("wrk1", "b", 1),
            record("wrk1", "b", 2),
            record("wrk2", "c", 1),
        ]);
        let store = AliasStore::load(&backend).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ShortId::FIRST), Some(&board(1)));
    }

    #[test]
    fn test_dropped_duplicates_keep_their_short_id() {
        let backend = MemBackend::with_records(vec![
            record("wrk1", "b", 1),
            record("wrk2", "c", 1),
        ]);
        let mut store = AliasStore::load(&backend).unwrap();

        let minted = store.get_or_insert(board(3)).unwrap();
        assert_eq!(minted.to_string(), "wrk3");
        let records = backend.records();
        assert!(records.contains(&record("wrk2", "c", 1)));
        assert!(records.contains(&record("wrk3", "b", 3)));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_exhausted_counter_is_a_store_error() {
        let backend = MemBackend::with_records(vec![AliasRecord {
            wrk: format!("wrk{}", u64::MAX),
            tag: "b".to_string(),
            id: format!("{:024x}", 1),
        }]);
        let mut store = AliasStore::load(&backend).unwrap();

        let result = store.get_or_insert(board(2));
        assert!(matches!(result, Err(WrkError::Store(_))));
        assert_eq!(backend.save_count(), 0);
        assert_eq!(store.short_id_of(&board(2)), None);
    }

    #[test]
    fn test_batch_mints_with_one_save() {
        let backend = MemBackend::with_records(vec![record("wrk1", "b", 1)]);
        let mut store = AliasStore::load(&backend).unwrap();

        let ids = store
            .get_or_insert_all(&[board(2), board(1), board(3), board(2)])
            .unwrap();
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["wrk2", "wrk1", "wrk3", "wrk2"]);
        assert_eq!(backend.save_count(), 1);
        assert_eq!(backend.load_count(), 2);
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_batch_of_known_ids_touches_nothing() {
        let backend = MemBackend::with_records(vec![record("wrk1", "b", 1), record("wrk2", "b", 2)]);
        let mut store = AliasStore::load(&backend).unwrap();

        store.get_or_insert_all(&[board(2), board(1)]).unwrap();
        assert_eq!(backend.load_count(), 1);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_failed_batch_save_rolls_back_every_mint() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        backend.set_simulate_write_error(true);

        assert!(store.get_or_insert_all(&[board(1), board(2)]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_records_survive_a_save_and_reserve_their_id() {
        let backend = MemBackend::with_records(vec![
            record("wrk1", "b", 1),
            record("wrk2", "z", 2),
        ]);
        let mut store = AliasStore::load(&backend).unwrap();
        assert_eq!(store.len(), 1);

        let minted = store.get_or_insert(board(3)).unwrap();
        assert_eq!(minted.to_string(), "wrk3");
        assert!(backend.records().contains(&record("wrk2", "z", 2)));
    }

    #[test]
    fn test_mint_merges_concurrent_writes() {
        let backend = MemBackend::with_records(vec![record("wrk1", "b", 1)]);
        let mut store = AliasStore::load(&backend).unwrap();

        // Another process minted wrk2 after we loaded
        backend.push_external(record("wrk2", "b", 2));

        let minted = store.get_or_insert(board(3)).unwrap();
        assert_eq!(minted.to_string(), "wrk3");
        let records = backend.records();
        assert!(records.contains(&record("wrk2", "b", 2)));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_mint_reuses_alias_written_concurrently() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        backend.push_external(record("wrk1", "b", 5));

        assert_eq!(store.get_or_insert(board(5)).unwrap(), ShortId::FIRST);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_failed_save_leaves_no_alias_behind() {
        let backend = MemBackend::new();
        let mut store = AliasStore::load(&backend).unwrap();
        backend.set_simulate_write_error(true);

        assert!(store.get_or_insert(board(1)).is_err());
        assert!(store.is_empty());

        backend.set_simulate_write_error(false);
        assert_eq!(store.get_or_insert(board(1)).unwrap(), ShortId::FIRST);
    }
}
