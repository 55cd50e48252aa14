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
    org: Option<&Alias>,
) -> Result<CmdResult> {
    let heading = match org {
        Some(alias) => Heading::new("Open boards for organization", subject(alias)),
        None => Heading::new("Open boards for", "me"),
    };
    let boards = gateway.boards(org.map(|alias| &alias.canonical.remote_id))?;
    listing(resolver, heading, boards, "No boards found.")
}
