//! # Entity Gateway
//!
//! The boundary to Trello. Everything behind [`EntityGateway`] is plain HTTP + JSON;
//! nothing in front of it knows about URLs or status codes.
//!
//! ## Absence vs failure
//!
//! - A well-formed id that names nothing comes back as `Ok(None)`. Commands report it
//!   as "not found" and still succeed.
//! - Network, auth, and decoding problems are `Err(WrkError::Transport)` and end the
//!   command. Nothing is retried.
//!
//! Implementations:
//! - [`trello::TrelloGateway`]: the real REST API.
//! - `test_utils::MockGateway`: canned entities for tests.

use crate::error::Result;
use crate::ids::{RemoteId, TypeTag};
use crate::model::{Board, Card, Comment, Entity, Organization};

pub mod trello;

pub trait EntityGateway {
    /// Fetch a single entity of the given kind.
    fn fetch(&self, tag: TypeTag, remote_id: &RemoteId) -> Result<Option<Entity>>;

    /// Organizations the user belongs to.
    fn organizations(&self) -> Result<Vec<Organization>>;

    /// Open boards of an organization, or of the user when `org` is `None`.
    /// `Ok(None)` when the organization doesn't exist.
    fn boards(&self, org: Option<&RemoteId>) -> Result<Option<Vec<Board>>>;

    /// Open cards of a board, or the cards assigned to the user when `board` is `None`.
    fn cards(&self, board: Option<&RemoteId>) -> Result<Option<Vec<Card>>>;

    /// Comments on a card, in the order Trello returns them.
    fn comments(&self, card: &RemoteId) -> Result<Option<Vec<Comment>>>;
}
