use super::helpers::listing;
use super::{subject, CmdResult, Heading};
use crate::error::Result;
use crate::gateway::EntityGateway;
use crate::ids::Alias;
use crate::resolver::Resolver;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend, G: EntityGateway>(
    resolver: &mut Resolver<B>,
    gateway: &G,
    board: Option<&Alias>,
) -> Result<CmdResult> {
    let heading = match board {
        Some(alias) => Heading::new("Open cards for board", subject(alias)),
        None => Heading::new("Open cards assigned to", "me"),
    };
    let cards = gateway.cards(board.map(|alias| &alias.canonical.remote_id))?;
    listing(resolver, heading, cards, "No cards found.")
}
