//! # Id Resolver
//!
//! Turns whatever the user typed into a type-tagged [`CanonicalId`] and its short id.
//!
//! | token            | type comes from                               | network |
//! |------------------|-----------------------------------------------|---------|
//! | `wrk12`          | the alias store                               | no      |
//! | `b:4f9a...`      | the explicit prefix                           | no      |
//! | `4f9a...`        | the command grammar, else an existing alias   | no      |
//!
//! Each id slot in the command grammar admits a set of types. Scoped verbs admit exactly
//! one (`boards in` takes an organization), so a raw Trello id is tagged without guessing.
//! `desc` admits all five; a raw Trello id there only resolves if the store already knows
//! it, otherwise the user has to add a type prefix.
//!
//! All identity bookkeeping goes through here. Handlers that list entities call
//! [`Resolver::alias_for`] rather than touching the store.

use crate::error::{Result, WrkError};
use crate::ids::{Alias, CanonicalId, IdToken, RemoteId, TypeTag};
use crate::store::{AliasStore, StorageBackend};

pub struct Resolver<B: StorageBackend> {
    store: AliasStore<B>,
}

impl<B: StorageBackend> Resolver<B> {
    pub fn new(store: AliasStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AliasStore<B> {
        &self.store
    }

    /// Resolves `token` to an alias whose type is one of `allowed`.
    ///
    /// Malformed tokens fail with [`WrkError::InvalidFormat`] before the store is touched.
    pub fn resolve(&mut self, token: &str, allowed: &[TypeTag]) -> Result<Alias> {
        if allowed.is_empty() {
            return Err(WrkError::AmbiguousType(format!(
                "no admissible type for '{}'",
                token
            )));
        }

        let parsed = token.trim().parse::<IdToken>().map_err(WrkError::InvalidFormat)?;
        let alias = match parsed {
            IdToken::Short(short_id) => {
                let canonical = self.store.get(short_id).cloned().ok_or_else(|| {
                    WrkError::InvalidFormat(format!("unknown wrk id '{}'", short_id))
                })?;
                Alias {
                    short_id,
                    canonical,
                }
            }
            IdToken::Tagged(canonical) => {
                ensure_admissible(&canonical, allowed)?;
                self.alias_for(canonical)?
            }
            IdToken::Remote(remote_id) => {
                let tag = self.narrow(&remote_id, allowed)?;
                self.alias_for(CanonicalId::new(tag, remote_id))?
            }
        };

        ensure_admissible(&alias.canonical, allowed).map_err(|_| {
            WrkError::Validation(format!(
                "{} is {}, expected {}",
                alias.short_id,
                describe(&[alias.canonical.tag]),
                describe(allowed)
            ))
        })?;
        tracing::debug!(token, short_id = %alias.short_id, canonical = %alias.canonical, "resolved");
        Ok(alias)
    }

    /// Reuses or mints the alias of an entity we already know the type of.
    pub fn alias_for(&mut self, canonical: CanonicalId) -> Result<Alias> {
        let short_id = self.store.get_or_insert(canonical.clone())?;
        Ok(Alias {
            short_id,
            canonical,
        })
    }

    /// [`Resolver::alias_for`] over a whole listing, persisted with a single save.
    pub fn aliases_for(&mut self, canonicals: Vec<CanonicalId>) -> Result<Vec<Alias>> {
        let short_ids = self.store.get_or_insert_all(&canonicals)?;
        Ok(short_ids
            .into_iter()
            .zip(canonicals)
            .map(|(short_id, canonical)| Alias {
                short_id,
                canonical,
            })
            .collect())
    }

    fn narrow(&self, remote_id: &RemoteId, allowed: &[TypeTag]) -> Result<TypeTag> {
        if let [only] = allowed {
            return Ok(*only);
        }
        // Trello ids are unique across kinds, so a known id already carries its type
        if let Some(known) = self.store.find_by_remote(remote_id) {
            if allowed.contains(&known.canonical.tag) {
                return Ok(known.canonical.tag);
            }
        }
        let example = allowed.first().map_or('b', |tag| tag.prefix());
        Err(WrkError::AmbiguousType(format!(
            "cannot tell whether {} is {}; prefix it with its type, e.g. {}:{}",
            remote_id,
            describe(allowed),
            example,
            remote_id
        )))
    }
}

fn ensure_admissible(canonical: &CanonicalId, allowed: &[TypeTag]) -> Result<()> {
    if allowed.contains(&canonical.tag) {
        Ok(())
    } else {
        Err(WrkError::Validation(format!(
            "{} is {}, expected {}",
            canonical,
            describe(&[canonical.tag]),
            describe(allowed)
        )))
    }
}

/// "a board", "an organization or a board", ...
fn describe(allowed: &[TypeTag]) -> String {
    allowed
        .iter()
        .map(|tag| {
            let article = if tag.noun().starts_with(['a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            format!("{} {}", article, tag.noun())
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ShortId;
    use crate::store::fs_backend::FsBackend;
    use crate::store::mem_backend::MemBackend;
    use crate::store::AliasRecord;
    use tempfile::TempDir;

    const R1: &str = "4f9a1c2b3d4e5f6a7b8c9d0e";

    fn resolver(backend: &MemBackend) -> Resolver<&MemBackend> {
        Resolver::new(AliasStore::load(backend).unwrap())
    }

    #[test]
    fn test_raw_id_is_tagged_by_single_admissible_type() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let alias = resolver.resolve(R1, &[TypeTag::Org]).unwrap();
        assert_eq!(alias.canonical.tag, TypeTag::Org);
        assert_eq!(alias.canonical.remote_id.as_str(), R1);
        assert_eq!(alias.short_id, ShortId::FIRST);
    }

    #[test]
    fn test_resolving_twice_yields_same_alias() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let first = resolver.resolve(R1, &[TypeTag::Board]).unwrap();
        let second = resolver.resolve(R1, &[TypeTag::Board]).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.store().len(), 1);
    }

    #[test]
    fn test_alias_is_stable_across_processes() {
        let temp = TempDir::new().unwrap();

        let first = {
            let mut resolver =
                Resolver::new(AliasStore::load(FsBackend::new(temp.path().to_path_buf())).unwrap());
            resolver.resolve(R1, &[TypeTag::Board]).unwrap()
        };
        let mut resolver =
            Resolver::new(AliasStore::load(FsBackend::new(temp.path().to_path_buf())).unwrap());
        let second = resolver.resolve(R1, &[TypeTag::Board]).unwrap();
        assert_eq!(first, second);

        let by_short = resolver
            .resolve(&first.short_id.to_string(), &TypeTag::ALL)
            .unwrap();
        assert_eq!(by_short.canonical, first.canonical);
    }

    #[test]
    fn test_short_id_round_trips_to_stored_canonical() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let minted = resolver.resolve(&format!("c:{}", R1), &TypeTag::ALL).unwrap();
        let saves = backend.save_count();

        let looked_up = resolver.resolve("wrk1", &TypeTag::ALL).unwrap();
        assert_eq!(looked_up.canonical, minted.canonical);
        assert_eq!(backend.save_count(), saves);
    }

    #[test]
    fn test_short_id_of_wrong_type_is_rejected() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        resolver.resolve(R1, &[TypeTag::Card]).unwrap();

        let err = resolver.resolve("wrk1", &[TypeTag::Board]).unwrap_err();
        assert!(matches!(err, WrkError::Validation(_)));
        assert!(err.to_string().contains("is a card, expected a board"));
    }

    #[test]
    fn test_unknown_short_id_is_invalid_format() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let err = resolver.resolve("wrk9", &TypeTag::ALL).unwrap_err();
        assert!(matches!(err, WrkError::InvalidFormat(_)));
    }

    #[test]
    fn test_tagged_id_must_be_admissible() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let err = resolver
            .resolve(&format!("b:{}", R1), &[TypeTag::Org])
            .unwrap_err();
        assert!(matches!(err, WrkError::Validation(_)));
        assert!(err.to_string().contains("expected an organization"));
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_garbage_token_mutates_nothing() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        for token in ["", "abc", "4f9a", "x:4f9a1c2b3d4e5f6a7b8c9d0e", "wrk0"] {
            let err = resolver.resolve(token, &TypeTag::ALL).unwrap_err();
            assert!(matches!(err, WrkError::InvalidFormat(_)), "{}", token);
        }
        assert_eq!(backend.save_count(), 0);
        assert!(resolver.store().is_empty());
    }

    #[test]
    fn test_raw_id_with_many_types_is_ambiguous_when_unknown() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let err = resolver.resolve(R1, &TypeTag::ALL).unwrap_err();
        assert!(matches!(err, WrkError::AmbiguousType(_)));
        assert!(err.to_string().contains(&format!("o:{}", R1)));
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_raw_id_with_many_types_uses_known_alias() {
        let backend = MemBackend::with_records(vec![AliasRecord {
            wrk: "wrk3".to_string(),
            tag: "l".to_string(),
            id: R1.to_string(),
        }]);
        let mut resolver = resolver(&backend);
        let alias = resolver.resolve(R1, &TypeTag::ALL).unwrap();
        assert_eq!(alias.canonical.tag, TypeTag::List);
        assert_eq!(alias.short_id.to_string(), "wrk3");
    }

    #[test]
    fn test_empty_admissible_set_is_a_contract_violation() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let err = resolver.resolve(R1, &[]).unwrap_err();
        assert!(matches!(err, WrkError::AmbiguousType(_)));
    }

    #[test]
    fn test_aliases_for_a_listing_save_once() {
        let backend = MemBackend::new();
        let mut resolver = resolver(&backend);
        let cards: Vec<CanonicalId> = ["000000000000000000000001", "000000000000000000000002"]
            .iter()
            .map(|id| CanonicalId::new(TypeTag::Card, id.parse().unwrap()))
            .collect();

        let aliases = resolver.aliases_for(cards.clone()).unwrap();
        assert_eq!(aliases[0].canonical, cards[0]);
        assert_eq!(aliases[1].short_id.to_string(), "wrk2");
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn test_describe_picks_articles() {
        assert_eq!(describe(&[TypeTag::Org]), "an organization");
        assert_eq!(
            describe(&[TypeTag::Board, TypeTag::Card]),
            "a board or a card"
        );
    }
}
