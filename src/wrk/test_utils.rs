//! Canned gateway and fixtures shared by the unit tests.

use crate::error::{Result, WrkError};
use crate::gateway::EntityGateway;
use crate::ids::{CanonicalId, RemoteId, TypeTag};
use crate::model::{Board, Card, Comment, Entity, Label, List, Member, Organization};
use std::cell::Cell;
use std::collections::HashMap;

/// Deterministic Trello id: `rid(1)` is `000000000000000000000001`.
pub fn rid(n: u32) -> RemoteId {
    format!("{:024x}", n)
        .parse()
        .expect("24 hex characters always parse")
}

pub fn org(n: u32, name: &str) -> Organization {
    Organization {
        id: rid(n),
        name: name.to_lowercase(),
        display_name: Some(name.to_string()),
        desc: None,
        url: Some(format!("https://trello.com/{}", name.to_lowercase())),
    }
}

pub fn board(n: u32, name: &str) -> Board {
    Board {
        id: rid(n),
        name: name.to_string(),
        desc: None,
        closed: Some(false),
        url: Some(format!("https://trello.com/b/{:x}", n)),
        id_organization: None,
    }
}

pub fn list(n: u32, name: &str) -> List {
    List {
        id: rid(n),
        name: name.to_string(),
        closed: Some(false),
        id_board: None,
    }
}

pub fn card(n: u32, name: &str, labels: &[(&str, &str)]) -> Card {
    Card {
        id: rid(n),
        name: name.to_string(),
        desc: None,
        closed: Some(false),
        url: Some(format!("https://trello.com/c/{:x}/{}", n, name)),
        short_link: Some(format!("sl{:x}", n)),
        id_board: None,
        id_list: None,
        labels: labels
            .iter()
            .map(|(name, color)| Label {
                name: Some(name.to_string()),
                color: Some(color.to_string()),
            })
            .collect(),
    }
}

pub fn member(n: u32, full_name: &str, username: &str) -> Member {
    Member {
        id: rid(n),
        full_name: full_name.to_string(),
        username: username.to_string(),
        url: None,
    }
}

pub fn comment(id: &str, author: &str, date: &str, text: &str) -> Comment {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "date": date,
        "memberCreator": {"fullName": author, "username": author.to_lowercase()},
        "data": {"text": text},
    }))
    .expect("fixture comment decodes")
}

/// A gateway answering from memory. Counts every call.
#[derive(Default)]
pub struct MockGateway {
    entities: HashMap<CanonicalId, Entity>,
    organizations: Vec<Organization>,
    boards: HashMap<Option<RemoteId>, Vec<Board>>,
    cards: HashMap<Option<RemoteId>, Vec<Card>>,
    comments: HashMap<RemoteId, Vec<Comment>>,
    failure: Option<String>,
    calls: Cell<usize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        let id = match &entity {
            Entity::Org(o) => o.id.clone(),
            Entity::Board(b) => b.id.clone(),
            Entity::List(l) => l.id.clone(),
            Entity::Card(c) => c.id.clone(),
            Entity::Member(m) => m.id.clone(),
        };
        self.entities
            .insert(CanonicalId::new(entity.tag(), id), entity);
        self
    }

    pub fn with_organizations(mut self, orgs: Vec<Organization>) -> Self {
        self.organizations = orgs;
        self
    }

    pub fn with_boards(mut self, org: Option<RemoteId>, boards: Vec<Board>) -> Self {
        self.boards.insert(org, boards);
        self
    }

    pub fn with_cards(mut self, board: Option<RemoteId>, cards: Vec<Card>) -> Self {
        self.cards.insert(board, cards);
        self
    }

    pub fn with_comments(mut self, card: RemoteId, comments: Vec<Comment>) -> Self {
        self.comments.insert(card, comments);
        self
    }

    /// Every call fails as if the network were down.
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn record_call(&self) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        match &self.failure {
            Some(reason) => Err(WrkError::Transport(reason.clone())),
            None => Ok(()),
        }
    }

    // Unscoped listings always exist; scoped ones only when their scope was registered
    fn scoped<T: Clone>(
        map: &HashMap<Option<RemoteId>, Vec<T>>,
        scope: Option<&RemoteId>,
    ) -> Option<Vec<T>> {
        match map.get(&scope.cloned()) {
            Some(items) => Some(items.clone()),
            None if scope.is_none() => Some(Vec::new()),
            None => None,
        }
    }
}

impl EntityGateway for MockGateway {
    fn fetch(&self, tag: TypeTag, remote_id: &RemoteId) -> Result<Option<Entity>> {
        self.record_call()?;
        Ok(self
            .entities
            .get(&CanonicalId::new(tag, remote_id.clone()))
            .cloned())
    }

    fn organizations(&self) -> Result<Vec<Organization>> {
        self.record_call()?;
        Ok(self.organizations.clone())
    }

    fn boards(&self, org: Option<&RemoteId>) -> Result<Option<Vec<Board>>> {
        self.record_call()?;
        Ok(Self::scoped(&self.boards, org))
    }

    fn cards(&self, board: Option<&RemoteId>) -> Result<Option<Vec<Card>>> {
        self.record_call()?;
        Ok(Self::scoped(&self.cards, board))
    }

    fn comments(&self, card: &RemoteId) -> Result<Option<Vec<Comment>>> {
        self.record_call()?;
        Ok(self.comments.get(card).cloned())
    }
}
