//! Entity snapshots as returned by Trello, and the summaries rendered from them.
//!
//! Snapshots are fetched per command and never stored. Only the id of an entity
//! outlives a command (see [`crate::store`]).

use crate::ids::{CanonicalId, RemoteId, TypeTag};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const CARD_SHARE_URL: &str = "https://trello.com/c";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id_organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub id_board: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Label {
    /// Text shown for the label: its name, or its color when unnamed.
    pub fn text(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.color.as_deref().filter(|c| !c.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub short_link: Option<String>,
    #[serde(default)]
    pub id_board: Option<String>,
    #[serde(default)]
    pub id_list: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Card {
    /// The short shareable link when Trello gave us one, the full url otherwise.
    pub fn share_url(&self) -> Option<String> {
        match self.short_link.as_deref().filter(|s| !s.is_empty()) {
            Some(link) => Some(format!("{}/{}", CARD_SHARE_URL, link)),
            None => self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: RemoteId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub text: String,
}

/// A `commentCard` action on a card.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub member_creator: CommentAuthor,
    #[serde(default)]
    pub data: CommentData,
}

/// Any single entity wrk can describe.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Org(Organization),
    Board(Board),
    List(List),
    Card(Card),
    Member(Member),
}

impl Entity {
    pub fn tag(&self) -> TypeTag {
        match self {
            Entity::Org(_) => TypeTag::Org,
            Entity::Board(_) => TypeTag::Board,
            Entity::List(_) => TypeTag::List,
            Entity::Card(_) => TypeTag::Card,
            Entity::Member(_) => TypeTag::Member,
        }
    }

    pub fn summary(&self) -> EntitySummary {
        match self {
            Entity::Org(org) => org.summary(),
            Entity::Board(board) => board.summary(),
            Entity::List(list) => list.summary(),
            Entity::Card(card) => card.summary(),
            Entity::Member(member) => member.summary(),
        }
    }
}

/// The fields of an entity worth showing, already picked per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    pub tag: TypeTag,
    pub remote_id: RemoteId,
    pub title: String,
    pub closed: bool,
    pub labels: Vec<Label>,
    /// Present only when non-empty.
    pub description: Option<String>,
    /// Extra `(label, value)` lines, e.g. a member's username.
    pub details: Vec<(String, String)>,
    pub url: Option<String>,
}

impl EntitySummary {
    fn new(tag: TypeTag, remote_id: &RemoteId, title: impl Into<String>) -> Self {
        Self {
            tag,
            remote_id: remote_id.clone(),
            title: title.into(),
            closed: false,
            labels: Vec::new(),
            description: None,
            details: Vec::new(),
            url: None,
        }
    }
}

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

/// Per-kind choice of what to surface for an entity.
pub trait Summarize {
    const TAG: TypeTag;

    fn remote_id(&self) -> &RemoteId;

    fn summary(&self) -> EntitySummary;

    fn canonical_id(&self) -> CanonicalId {
        CanonicalId::new(Self::TAG, self.remote_id().clone())
    }
}

impl Summarize for Organization {
    const TAG: TypeTag = TypeTag::Org;

    fn remote_id(&self) -> &RemoteId {
        &self.id
    }

    fn summary(&self) -> EntitySummary {
        let title = non_empty(&self.display_name).unwrap_or_else(|| self.name.clone());
        EntitySummary {
            description: non_empty(&self.desc),
            url: self.url.clone(),
            ..EntitySummary::new(Self::TAG, &self.id, title)
        }
    }
}

impl Summarize for Board {
    const TAG: TypeTag = TypeTag::Board;

    fn remote_id(&self) -> &RemoteId {
        &self.id
    }

    fn summary(&self) -> EntitySummary {
        EntitySummary {
            closed: self.closed.unwrap_or(false),
            description: non_empty(&self.desc),
            url: self.url.clone(),
            ..EntitySummary::new(Self::TAG, &self.id, &self.name)
        }
    }
}

impl Summarize for List {
    const TAG: TypeTag = TypeTag::List;

    fn remote_id(&self) -> &RemoteId {
        &self.id
    }

    fn summary(&self) -> EntitySummary {
        EntitySummary {
            closed: self.closed.unwrap_or(false),
            ..EntitySummary::new(Self::TAG, &self.id, &self.name)
        }
    }
}

impl Summarize for Card {
    const TAG: TypeTag = TypeTag::Card;

    fn remote_id(&self) -> &RemoteId {
        &self.id
    }

    fn summary(&self) -> EntitySummary {
        EntitySummary {
            closed: self.closed.unwrap_or(false),
            labels: self
                .labels
                .iter()
                .filter(|l| l.text().is_some())
                .cloned()
                .collect(),
            description: non_empty(&self.desc),
            url: self.share_url(),
            ..EntitySummary::new(Self::TAG, &self.id, &self.name)
        }
    }
}

impl Summarize for Member {
    const TAG: TypeTag = TypeTag::Member;

    fn remote_id(&self) -> &RemoteId {
        &self.id
    }

    fn summary(&self) -> EntitySummary {
        EntitySummary {
            details: vec![("username".to_string(), self.username.clone())],
            ..EntitySummary::new(Self::TAG, &self.id, &self.full_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(n: u32) -> RemoteId {
        format!("{:024x}", n).parse().unwrap()
    }

    #[test]
    fn test_board_decodes_from_trello_json() {
        let json = r#"{
            "id": "4f9a1c2b3d4e5f6a7b8c9d0e",
            "name": "Sprint Board",
            "desc": "",
            "closed": false,
            "idOrganization": null,
            "url": "https://trello.com/b/4f9a",
            "prefs": {"background": "blue"}
        }"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.name, "Sprint Board");
        assert_eq!(board.closed, Some(false));
        assert_eq!(board.id_organization, None);
    }

    #[test]
    fn test_malformed_remote_id_fails_to_decode() {
        let json = r#"{"id": "nope", "name": "x"}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }

    #[test]
    fn test_board_summary_suppresses_empty_description() {
        let board = Board {
            id: rid(1),
            name: "Sprint Board".into(),
            desc: Some("   ".into()),
            closed: Some(true),
            url: Some("https://trello.com/b/4f9a".into()),
            id_organization: None,
        };
        let summary = Entity::Board(board).summary();
        assert_eq!(summary.tag, TypeTag::Board);
        assert_eq!(summary.description, None);
        assert!(summary.closed);
        assert_eq!(summary.url.as_deref(), Some("https://trello.com/b/4f9a"));
    }

    #[test]
    fn test_org_prefers_display_name() {
        let org = Organization {
            id: rid(2),
            name: "acme".into(),
            display_name: Some("Acme Inc".into()),
            desc: Some("Makers of things".into()),
            url: None,
        };
        let summary = org.summary();
        assert_eq!(summary.title, "Acme Inc");
        assert_eq!(summary.description.as_deref(), Some("Makers of things"));

        let bare = Organization {
            display_name: None,
            ..org
        };
        assert_eq!(bare.summary().title, "acme");
    }

    #[test]
    fn test_card_share_url_uses_short_link() {
        let card: Card = serde_json::from_str(
            r#"{"id": "000000000000000000000003", "name": "Fix login",
                "url": "https://trello.com/c/abcd1234/12-fix-login",
                "shortLink": "abcd1234",
                "labels": [{"name": "bug", "color": "red"}, {"name": "", "color": "green"}, {"name": "", "color": null}]}"#,
        )
        .unwrap();
        let summary = card.summary();
        assert_eq!(summary.url.as_deref(), Some("https://trello.com/c/abcd1234"));
        let texts: Vec<_> = summary.labels.iter().filter_map(Label::text).collect();
        assert_eq!(texts, vec!["bug", "green"]);
    }

    #[test]
    fn test_card_share_url_falls_back_to_url() {
        let card = Card {
            id: rid(4),
            name: "x".into(),
            desc: None,
            closed: None,
            url: Some("https://trello.com/c/full".into()),
            short_link: None,
            id_board: None,
            id_list: None,
            labels: Vec::new(),
        };
        assert_eq!(card.share_url().as_deref(), Some("https://trello.com/c/full"));
    }

    #[test]
    fn test_member_summary_has_username_detail_and_no_url() {
        let member = Member {
            id: rid(5),
            full_name: "Ada Lovelace".into(),
            username: "ada".into(),
            url: Some("https://trello.com/ada".into()),
        };
        let summary = member.summary();
        assert_eq!(summary.title, "Ada Lovelace");
        assert_eq!(
            summary.details,
            vec![("username".to_string(), "ada".to_string())]
        );
        assert_eq!(summary.url, None);
        assert_eq!(member.canonical_id().tag, TypeTag::Member);
    }

    #[test]
    fn test_comment_decodes_action() {
        let json = r#"{
            "id": "5a",
            "type": "commentCard",
            "date": "2012-07-01T07:57:00.000Z",
            "memberCreator": {"fullName": "Brian", "username": "blangel"},
            "data": {"text": "Looks good", "card": {"id": "x"}}
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.member_creator.username, "blangel");
        assert_eq!(comment.data.text, "Looks good");
        assert!(comment.date.is_some());
    }
}
