use std::{collections::HashSet, fmt};

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{config::Config, types::CatalogEntry, utils};

#[derive(Debug)]
pub enum CatalogError {
    Network(reqwest::Error),
    Status { status: u16, body: String },
    /// Error object returned by the API in place of a `response`.
    Api { code: i64, message: String },
    Malformed(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(e) => write!(f, "catalog request failed: {}", e),
            CatalogError::Status { status, body } => {
                write!(f, "catalog request returned HTTP {}: {}", status, body)
            }
            CatalogError::Api { code, message } => {
                write!(f, "API error {}: {}", code, message)
            }
            CatalogError::Malformed(reason) => write!(f, "malformed catalog: {}", reason),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Malformed(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Option<Value>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(alias = "id")]
    aid: Value,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

pub struct CatalogClient {
    client: Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: format!("{}/method/audio.get.json", config.api_url),
        }
    }

    /// Fetches the user's track list, newest first as the API orders it.
    ///
    /// The credential travels in the query string, no auth header is sent.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Network`] if the request cannot be completed
    /// - [`CatalogError::Api`] if the payload carries a provider error object
    /// - [`CatalogError::Status`] for any other non-success status
    /// - [`CatalogError::Malformed`] if the body is not the expected JSON
    pub async fn fetch(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("uid", user_id), ("access_token", access_token)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // prefer the provider's own explanation when it sent one
            if let Err(e @ CatalogError::Api { .. }) = parse_catalog(&body) {
                return Err(e);
            }
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        parse_catalog(&body)
    }
}

/// Parses an `audio.get` payload into catalog entries, keeping API order.
///
/// Accepts both `{"response": [..tracks]}` and the newer
/// `{"response": {"count": n, "items": [..]}}` shapes; a leading integer count
/// inside the array is skipped. Identifiers may be numbers or strings. Artist
/// and title are HTML-entity decoded. A repeated identifier keeps its first
/// occurrence only.
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.error {
        return Err(CatalogError::Api {
            code: error.error_code,
            message: error.error_msg,
        });
    }

    let items = match envelope.response {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut object)) => match object.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(CatalogError::Malformed("response has no items".to_string())),
        },
        Some(other) => {
            return Err(CatalogError::Malformed(format!(
                "unexpected response: {}",
                other
            )));
        }
        None => return Err(CatalogError::Malformed("missing response".to_string())),
    };

    let mut seen_ids = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            continue;
        }

        let raw: RawTrack = serde_json::from_value(item)?;
        let id = match raw.aid {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.is_empty() && !s.contains(['/', '\\']) => s,
            other => {
                return Err(CatalogError::Malformed(format!(
                    "invalid track id: {}",
                    other
                )));
            }
        };

        if !seen_ids.insert(id.clone()) {
            continue;
        }

        entries.push(CatalogEntry {
            id,
            artist: utils::decode_entities(&raw.artist),
            title: utils::decode_entities(&raw.title),
            url: raw.url,
        });
    }

    Ok(entries)
}
