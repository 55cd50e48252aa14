use super::{CmdMessage, CmdResult, Heading, ListedEntity};
use crate::error::Result;
use crate::model::Summarize;
use crate::resolver::Resolver;
use crate::store::StorageBackend;

/// Pairs every item with its short id, minting ids for entities seen for the first time.
pub fn list_entities<B: StorageBackend, T: Summarize>(
    resolver: &mut Resolver<B>,
    items: &[T],
) -> Result<Vec<ListedEntity>> {
    let aliases = resolver.aliases_for(items.iter().map(Summarize::canonical_id).collect())?;
    Ok(aliases
        .into_iter()
        .zip(items)
        .map(|(alias, item)| ListedEntity {
            short_id: alias.short_id,
            summary: item.summary(),
        })
        .collect())
}

/// Builds the result of a listing command.
///
/// `None` means the scope entity doesn't exist; an empty list gets `empty_message`.
pub fn listing<B: StorageBackend, T: Summarize>(
    resolver: &mut Resolver<B>,
    heading: Heading,
    items: Option<Vec<T>>,
    empty_message: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::with_heading(heading);
    match items {
        None => return Ok(result.not_found()),
        Some(items) if items.is_empty() => result.add_message(CmdMessage::info(empty_message)),
        Some(items) => result.listed = list_entities(resolver, &items)?,
    }
    Ok(result)
}
