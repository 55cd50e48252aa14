use super::helpers::listing;
use super::{CmdResult, Heading};
use crate::error::Result;
use crate::gateway::EntityGateway;
use crate::resolver::Resolver;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend, G: EntityGateway>(
    resolver: &mut Resolver<B>,
    gateway: &G,
) -> Result<CmdResult> {
    let orgs = gateway.organizations()?;
    listing(
        resolver,
        Heading::new("Organizations for", "me"),
        Some(orgs),
        "No organizations found.",
    )
}
