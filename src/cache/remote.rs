//! Remote Store Backend
//!
//! Adapter over the REST client. Holds no entry state of its own; truth
//! lives entirely in the remote store, which also enforces expiration
//! natively. TTLs arrive here already normalized to whole seconds.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::warn;

use crate::client::RestClient;
use crate::config::RemoteCredentials;
use crate::error::Result;

// == Remote Store Backend ==
#[derive(Debug, Clone)]
pub struct RemoteStoreBackend {
    client: RestClient,
}

impl RemoteStoreBackend {
    pub fn new(credentials: &RemoteCredentials) -> Self {
        Self {
            client: RestClient::new(credentials),
        }
    }

    // == Get ==
    /// Fetches and decodes a stored payload. Absent keys and null results
    /// read as `None`; so does a corrupted payload, which is logged.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let reply = self.client.command(&[json!("GET"), json!(key)]).await?;
        Ok(decode_payload(key, reply))
    }

    // == Set ==
    /// JSON-encodes the value and stores it with native expiration.
    pub async fn set(&self, key: &str, value: &Value, ttl_secs: u64) -> Result<()> {
        self.client.command(&set_cmd(key, value, ttl_secs)).await?;
        Ok(())
    }

    // == Has ==
    /// Existence check without transferring the value.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let reply = self.client.command(&[json!("EXISTS"), json!(key)]).await?;
        Ok(reply.as_i64().unwrap_or(0) == 1)
    }

    // == Remaining TTL ==
    /// Native TTL query, converted from seconds to milliseconds. The store
    /// answers negative values for absent or non-expiring keys; both read
    /// as `None`.
    pub async fn remaining_ttl_ms(&self, key: &str) -> Result<Option<u64>> {
        let reply = self.client.command(&[json!("TTL"), json!(key)]).await?;
        let secs = reply.as_i64().unwrap_or(-1);
        if secs > 0 {
            Ok(Some(secs as u64 * 1000))
        } else {
            Ok(None)
        }
    }

    // == Get Many ==
    /// Single MGET round trip; null and corrupted results are omitted from
    /// the output mapping.
    pub async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut cmd = vec![json!("MGET")];
        cmd.extend(keys.iter().map(|key| json!(key)));
        let reply = self.client.command(&cmd).await?;

        let results = match reply {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        let mut out = HashMap::new();
        for (key, raw) in keys.iter().zip(results) {
            if let Some(value) = decode_payload(key, raw) {
                out.insert((*key).to_string(), value);
            }
        }
        Ok(out)
    }

    // == Set Many ==
    /// Pipelines one SET per entry into a single round trip to amortize
    /// latency. Not atomic across keys; the store may apply a prefix of the
    /// batch before a failure.
    pub async fn set_many(&self, entries: &[(String, Value)], ttl_secs: u64) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let cmds: Vec<Vec<Value>> = entries
            .iter()
            .map(|(key, value)| set_cmd(key, value, ttl_secs))
            .collect();

        if let Err(err) = self.client.pipeline(&cmds).await {
            warn!(batch = entries.len(), %err, "pipelined set batch failed");
            return Err(err);
        }
        Ok(())
    }

    // == Delete ==
    /// Removes one key. True when the store reports something was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let reply = self.client.command(&[json!("DEL"), json!(key)]).await?;
        Ok(reply.as_i64().unwrap_or(0) > 0)
    }

    // == Clear ==
    /// Flushes the whole remote namespace.
    pub async fn clear(&self) -> Result<()> {
        self.client.command(&[json!("FLUSHDB")]).await?;
        Ok(())
    }
}

fn set_cmd(key: &str, value: &Value, ttl_secs: u64) -> Vec<Value> {
    vec![
        json!("SET"),
        json!(key),
        json!(value.to_string()),
        json!("EX"),
        json!(ttl_secs),
    ]
}

// == Payload Decoding ==
/// GET/MGET results are JSON-encoded strings. Null means a miss; a payload
/// that fails to parse is treated as corrupted-and-absent rather than an
/// error, so one bad entry cannot wedge its callers.
pub(crate) fn decode_payload(key: &str, reply: Value) -> Option<Value> {
    match reply {
        Value::Null => None,
        Value::String(payload) => match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "discarding corrupted cache payload");
                None
            }
        },
        other => {
            warn!(key, ?other, "unexpected payload shape from remote store");
            None
        }
    }
}
