//! # API Facade
//!
//! The single entry point for running a wrk command, whatever the UI.
//!
//! `WrkApi<B, G>` is generic over the alias storage backend and the entity gateway:
//! - Production: `WrkApi<FsBackend, TrelloGateway>`
//! - Testing: `WrkApi<&MemBackend, MockGateway>`
//!
//! A dispatch parses the command first. Only a well-formed command loads the alias
//! store and builds the [`Resolver`] that owns it for the rest of the run.

use crate::commands::{self, CmdResult, Command};
use crate::error::Result;
use crate::gateway::EntityGateway;
use crate::resolver::Resolver;
use crate::store::{AliasStore, StorageBackend};

pub use crate::commands::{CmdMessage, MessageLevel};

pub struct WrkApi<B: StorageBackend, G: EntityGateway> {
    backend: B,
    gateway: G,
}

impl<B: StorageBackend, G: EntityGateway> WrkApi<B, G> {
    pub fn new(backend: B, gateway: G) -> Self {
        Self { backend, gateway }
    }

    /// Runs one command line, e.g. `["cards", "in", "wrk2"]`.
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S]) -> Result<CmdResult> {
        let command = Command::parse(tokens)?;
        tracing::debug!(command = command.name(), target = ?command.target(), "dispatch");

        let store = AliasStore::load(&self.backend)?;
        let mut resolver = Resolver::new(store);
        commands::run(&mut resolver, &self.gateway, &command)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
