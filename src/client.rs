//! Remote Store REST Client
//!
//! Minimal client for an Upstash-style Redis REST endpoint. A single command
//! is POSTed to the base URL as a JSON array (`["GET", "key"]`); batches are
//! POSTed to `<base>/pipeline` as an array of command arrays. Every reply
//! carries either a `result` or an `error` field.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::RemoteCredentials;
use crate::error::{CacheError, Result};

// == Command Reply ==
#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl CommandReply {
    fn into_result(self) -> Result<Value> {
        match self.error {
            Some(message) => Err(CacheError::Protocol(message)),
            None => Ok(self.result),
        }
    }
}

// == Rest Client ==
/// Connection handle for the remote store. Cheap to clone; the underlying
/// HTTP connection pool is shared and released on drop.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(credentials: &RemoteCredentials) -> Self {
        Self {
            http: Client::new(),
            base_url: credentials.url.trim_end_matches('/').to_string(),
            token: credentials.token.clone(),
        }
    }

    // == Command ==
    /// Executes a single command and returns its raw result.
    pub async fn command(&self, cmd: &[Value]) -> Result<Value> {
        let reply: CommandReply = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&cmd)
            .send()
            .await?
            .json()
            .await?;

        reply.into_result()
    }

    // == Pipeline ==
    /// Executes a batch of commands as one network round trip.
    ///
    /// Atomicity is per command, not per batch: the server applies the whole
    /// batch and the first failed command's error is surfaced afterwards.
    pub async fn pipeline(&self, cmds: &[Vec<Value>]) -> Result<Vec<Value>> {
        let url = format!("{}/pipeline", self.base_url);
        let replies: Vec<CommandReply> = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&cmds)
            .send()
            .await?
            .json()
            .await?;

        replies.into_iter().map(CommandReply::into_result).collect()
    }
}
