//! # Command Layer
//!
//! Parses a command line into a [`Command`], resolves its id argument, and runs the
//! matching handler. Handlers return a structured [`CmdResult`]; the CLI decides how it
//! looks on a terminal.
//!
//! ## Grammar
//!
//! ```text
//! command      := bare-verb | scoped-verb
//! bare-verb    := "orgs" | "boards" | "cards" | "desc" id
//! scoped-verb  := ("boards" | "cards" | "comments") "in" id
//! ```
//!
//! ## Lifecycle of a run
//!
//! `Parsed → Resolved → Fetched → Rendered`. Parsing validates arity before anything
//! else, so a malformed command never loads the alias store or reaches the network.
//! A missing entity is not a failure: the result carries an error-level message and the
//! process still exits zero. Aliases minted along the way stay minted.
//!
//! ## Command Modules
//!
//! - [`orgs`]: organizations of the user
//! - [`boards`]: open boards, of the user or of an organization
//! - [`cards`]: open cards, assigned to the user or on a board
//! - [`comments`]: comments on a card
//! - [`desc`]: describe any single entity
//! - [`helpers`]: shared listing plumbing

use crate::error::{Result, WrkError};
use crate::gateway::EntityGateway;
use crate::ids::{Alias, ShortId, TypeTag};
use crate::model::EntitySummary;
use crate::resolver::Resolver;
use crate::store::StorageBackend;
use chrono::{DateTime, Utc};

pub mod boards;
pub mod cards;
pub mod comments;
pub mod desc;
pub mod helpers;
pub mod orgs;

pub const NOT_FOUND_MESSAGE: &str = "Invalid id or not found.";

const ALL_TYPES: &[TypeTag] = &TypeTag::ALL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Orgs,
    Boards { org: Option<String> },
    Cards { board: Option<String> },
    Comments { card: String },
    Desc { id: String },
}

impl Command {
    /// Parses and validates a command line (without the program name).
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let (verb, rest) = tokens.split_first().ok_or_else(|| {
            WrkError::Validation("no command given; run `wrk --usage` for help".to_string())
        })?;

        match *verb {
            "orgs" => {
                if !rest.is_empty() {
                    return Err(WrkError::Validation(
                        "orgs takes no arguments".to_string(),
                    ));
                }
                Ok(Command::Orgs)
            }
            "boards" => Ok(Command::Boards {
                org: scope_clause("boards", "org-id", rest)?,
            }),
            "cards" => Ok(Command::Cards {
                board: scope_clause("cards", "board-id", rest)?,
            }),
            "comments" => scope_clause("comments", "card-id", rest)?
                .map(|card| Command::Comments { card })
                .ok_or_else(|| {
                    WrkError::Validation("usage: comments in <card-id>".to_string())
                }),
            "desc" => match rest {
                [id] => Ok(Command::Desc { id: id.to_string() }),
                [] => Err(WrkError::Validation(
                    "desc needs an id: desc <id>".to_string(),
                )),
                _ => Err(WrkError::Validation(format!(
                    "desc takes exactly one id, got {}",
                    rest.len()
                ))),
            },
            other => Err(WrkError::Validation(format!(
                "unknown command '{}'; run `wrk --usage` for help",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Orgs => "orgs",
            Command::Boards { .. } => "boards",
            Command::Cards { .. } => "cards",
            Command::Comments { .. } => "comments",
            Command::Desc { .. } => "desc",
        }
    }

    /// The id token this command needs resolved, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Command::Orgs => None,
            Command::Boards { org } => org.as_deref(),
            Command::Cards { board } => board.as_deref(),
            Command::Comments { card } => Some(card),
            Command::Desc { id } => Some(id),
        }
    }

    /// Types admissible in this command's id slot.
    pub fn admissible(&self) -> &'static [TypeTag] {
        match self {
            Command::Orgs => &[],
            Command::Boards { .. } => &[TypeTag::Org],
            Command::Cards { .. } => &[TypeTag::Board],
            Command::Comments { .. } => &[TypeTag::Card],
            Command::Desc { .. } => ALL_TYPES,
        }
    }
}

/// `[]` or `["in", id]`.
fn scope_clause(verb: &str, placeholder: &str, rest: &[&str]) -> Result<Option<String>> {
    match rest {
        [] => Ok(None),
        ["in", id] => Ok(Some(id.to_string())),
        _ => Err(WrkError::Validation(format!(
            "usage: {} [in <{}>]",
            verb, placeholder
        ))),
    }
}

/// Runs an already parsed command.
pub fn run<B: StorageBackend, G: EntityGateway>(
    resolver: &mut Resolver<B>,
    gateway: &G,
    command: &Command,
) -> Result<CmdResult> {
    let target = command
        .target()
        .map(|token| resolver.resolve(token, command.admissible()))
        .transpose()?;

    match (command, target) {
        (Command::Orgs, _) => orgs::run(resolver, gateway),
        (Command::Boards { .. }, org) => boards::run(resolver, gateway, org.as_ref()),
        (Command::Cards { .. }, board) => cards::run(resolver, gateway, board.as_ref()),
        (Command::Comments { .. }, Some(card)) => comments::run(gateway, &card),
        (Command::Desc { .. }, Some(alias)) => desc::run(gateway, &alias),
        (command, None) => Err(WrkError::Validation(format!(
            "{} needs an id",
            command.name()
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// "Description of board 4f9a...:" style line opening a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub label: String,
    pub subject: String,
}

impl Heading {
    pub fn new(label: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            subject: subject.into(),
        }
    }
}

/// An entity in a listing, with the short id to refer to it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntity {
    pub short_id: ShortId,
    pub summary: EntitySummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub author: String,
    pub username: String,
    pub date: Option<DateTime<Utc>>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub heading: Option<Heading>,
    /// The single entity of a `desc`.
    pub described: Option<EntitySummary>,
    pub listed: Vec<ListedEntity>,
    pub comments: Vec<CommentEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn with_heading(heading: Heading) -> Self {
        Self {
            heading: Some(heading),
            ..Self::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn not_found(mut self) -> Self {
        self.add_message(CmdMessage::error(NOT_FOUND_MESSAGE));
        self
    }

    /// True when the command reported a missing entity.
    pub fn is_not_found(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error && m.content == NOT_FOUND_MESSAGE)
    }
}

/// The alias a scoped listing is about, shown in its heading.
pub(crate) fn subject(alias: &Alias) -> String {
    format!("{} ({})", alias.canonical.remote_id, alias.short_id)
}
