use super::EntityGateway;
use crate::config::WrkConfig;
use crate::error::{Result, WrkError};
use crate::ids::{RemoteId, TypeTag};
use crate::model::{Board, Card, Comment, Entity, List, Member, Organization};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const OPEN: (&str, &str) = ("filter", "open");

/// Read-only client for the Trello REST API (v1).
pub struct TrelloGateway {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    token: Option<String>,
}

impl TrelloGateway {
    pub fn new(config: &WrkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("wrk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WrkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: config.token.clone(),
        })
    }

    // Checked per request so commands that fail earlier never complain about credentials
    fn credentials(&self) -> Result<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            WrkError::Config(
                "no Trello api key; set api_key in config.json or WRK_TRELLO_KEY".to_string(),
            )
        })?;
        let token = self.token.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| {
            WrkError::Config(
                "no Trello token; set token in config.json or WRK_TRELLO_TOKEN".to_string(),
            )
        })?;
        Ok((key, token))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<T>> {
        let (key, token) = self.credentials()?;
        tracing::debug!(path, ?params, "GET");

        let response = self
            .client
            .get(self.endpoint(path))
            .query(&[("key", key), ("token", token)])
            .query(params)
            .send()
            // The url carries the token; keep it out of error messages
            .map_err(|e| WrkError::Transport(e.without_url().to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| WrkError::Transport(e.without_url().to_string()))?;
        tracing::debug!(path, %status, bytes = body.len(), "response");

        interpret(path, status, &body)
    }

    fn get_entity<T: DeserializeOwned>(&self, tag: TypeTag, id: &RemoteId) -> Result<Option<T>> {
        self.get(&format!("{}/{}", tag.resource(), id), &[])
    }
}

/// Maps a response to found / not found / failure.
fn interpret<T: DeserializeOwned>(path: &str, status: StatusCode, body: &str) -> Result<Option<T>> {
    match status {
        StatusCode::NOT_FOUND => return Ok(None),
        // Trello answers ids it can't place with a 400 "invalid id"
        StatusCode::BAD_REQUEST if body.to_ascii_lowercase().contains("invalid id") => {
            return Ok(None)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(WrkError::Transport(format!(
                "Trello refused {} (HTTP {}): {}; check your api key and token",
                path,
                status.as_u16(),
                body.trim()
            )))
        }
        s if !s.is_success() => {
            return Err(WrkError::Transport(format!(
                "{} returned HTTP {}: {}",
                path,
                status.as_u16(),
                body.trim()
            )))
        }
        _ => {}
    }

    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| WrkError::Transport(format!("unexpected response from {}: {}", path, e)))
}

impl EntityGateway for TrelloGateway {
    fn fetch(&self, tag: TypeTag, remote_id: &RemoteId) -> Result<Option<Entity>> {
        let entity = match tag {
            TypeTag::Org => self
                .get_entity::<Organization>(tag, remote_id)?
                .map(Entity::Org),
            TypeTag::Board => self.get_entity::<Board>(tag, remote_id)?.map(Entity::Board),
            TypeTag::List => self.get_entity::<List>(tag, remote_id)?.map(Entity::List),
            TypeTag::Card => self.get_entity::<Card>(tag, remote_id)?.map(Entity::Card),
            TypeTag::Member => self
                .get_entity::<Member>(tag, remote_id)?
                .map(Entity::Member),
        };
        Ok(entity)
    }

    fn organizations(&self) -> Result<Vec<Organization>> {
        Ok(self
            .get("members/me/organizations", &[])?
            .unwrap_or_default())
    }

    fn boards(&self, org: Option<&RemoteId>) -> Result<Option<Vec<Board>>> {
        match org {
            Some(id) => self.get(&format!("organizations/{}/boards", id), &[OPEN]),
            None => Ok(Some(
                self.get("members/me/boards", &[OPEN])?.unwrap_or_default(),
            )),
        }
    }

    fn cards(&self, board: Option<&RemoteId>) -> Result<Option<Vec<Card>>> {
        match board {
            Some(id) => self.get(&format!("boards/{}/cards", id), &[OPEN]),
            None => Ok(Some(
                self.get("members/me/cards", &[OPEN])?.unwrap_or_default(),
            )),
        }
    }

    fn comments(&self, card: &RemoteId) -> Result<Option<Vec<Comment>>> {
        self.get(
            &format!("cards/{}/actions", card),
            &[("filter", "commentCard")],
        )
    }
}
