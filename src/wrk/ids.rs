//! # Id System
//!
//! Trello identifies everything with 24 character hex strings that are painful to type.
//! wrk hands out short local ids (`wrk1`, `wrk2`, ...) instead and remembers which
//! Trello entity each one stands for.
//!
//! Three kinds of token are accepted wherever an id is expected:
//!
//! - **wrk id**: `wrk12`, a previously minted alias. Carries its type through the store.
//! - **Tagged Trello id**: `b:4f9a...`, a raw id with an explicit type prefix.
//! - **Raw Trello id**: `4f9a...`, whose type has to come from the command grammar.
//!
//! The single letter prefixes (`o`, `b`, `l`, `c`, `m`) only exist in text. In memory an id
//! is always a [`CanonicalId`] carrying a [`TypeTag`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a Trello object id.
pub const REMOTE_ID_LEN: usize = 24;

/// Textual prefix of every short id.
pub const SHORT_ID_PREFIX: &str = "wrk";

/// The kinds of Trello entity wrk understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Org,
    Board,
    List,
    Card,
    Member,
}

impl TypeTag {
    pub const ALL: [TypeTag; 5] = [
        TypeTag::Org,
        TypeTag::Board,
        TypeTag::List,
        TypeTag::Card,
        TypeTag::Member,
    ];

    pub fn prefix(self) -> char {
        match self {
            TypeTag::Org => 'o',
            TypeTag::Board => 'b',
            TypeTag::List => 'l',
            TypeTag::Card => 'c',
            TypeTag::Member => 'm',
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| prefix.len() == 1 && prefix.starts_with(tag.prefix()))
    }

    /// REST collection the entity lives under.
    pub fn resource(self) -> &'static str {
        match self {
            TypeTag::Org => "organizations",
            TypeTag::Board => "boards",
            TypeTag::List => "lists",
            TypeTag::Card => "cards",
            TypeTag::Member => "members",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            TypeTag::Org => "organization",
            TypeTag::Board => "board",
            TypeTag::List => "list",
            TypeTag::Card => "card",
            TypeTag::Member => "member",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// A Trello object id, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RemoteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == REMOTE_ID_LEN && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(RemoteId(s.to_ascii_lowercase()))
        } else {
            Err(format!("'{}' is not a Trello id", s))
        }
    }
}

impl TryFrom<String> for RemoteId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> Self {
        id.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A locally minted alias: `wrk1`, `wrk2`, ...
///
/// Ordered by number so the store can find the highest one handed out so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortId(u64);

impl ShortId {
    pub const FIRST: ShortId = ShortId(1);

    /// Returns `None` for zero, which is never handed out.
    pub fn new(number: u64) -> Option<Self> {
        (number > 0).then_some(ShortId(number))
    }

    pub fn number(self) -> u64 {
        self.0
    }

    /// The id after this one, or `None` once the counter is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(ShortId)
    }
}

impl FromStr for ShortId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{}' is not a wrk id", s);

        let digits = match s.get(..SHORT_ID_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(SHORT_ID_PREFIX) => &s[SHORT_ID_PREFIX.len()..],
            _ => return Err(invalid()),
        };
        if digits.is_empty() || digits.starts_with('0') || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        digits
            .parse()
            .ok()
            .and_then(ShortId::new)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SHORT_ID_PREFIX, self.0)
    }
}

/// A Trello id together with the kind of entity it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId {
    pub tag: TypeTag,
    pub remote_id: RemoteId,
}

impl CanonicalId {
    pub fn new(tag: TypeTag, remote_id: RemoteId) -> Self {
        Self { tag, remote_id }
    }
}

impl FromStr for CanonicalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("'{}' has no type prefix", s))?;
        let tag = TypeTag::from_prefix(&prefix.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown type prefix '{}:'", prefix))?;
        Ok(CanonicalId::new(tag, rest.parse()?))
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag.prefix(), self.remote_id)
    }
}

/// A short id bound to the entity it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub short_id: ShortId,
    pub canonical: CanonicalId,
}

/// What a user typed where an id was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdToken {
    Short(ShortId),
    Tagged(CanonicalId),
    Remote(RemoteId),
}

impl FromStr for IdToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(short) = s.parse() {
            return Ok(IdToken::Short(short));
        }
        if s.contains(':') {
            return s.parse().map(IdToken::Tagged);
        }
        if let Ok(remote) = s.parse() {
            return Ok(IdToken::Remote(remote));
        }
        Err(format!(
            "'{}' is neither a wrk id (e.g. wrk12) nor a Trello id ({} hex characters)",
            s, REMOTE_ID_LEN
        ))
    }
}
