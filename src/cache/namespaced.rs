//! Namespaced Remote Cache
//!
//! A narrower, always-remote cache that scopes every key under a fixed
//! namespace prefix, isolating its keyspace from other tenants sharing the
//! same store. Unlike [`Cache`](crate::cache::Cache) there is no local
//! fallback: without credentials the cache is permanently disabled and all
//! operations are silent no-ops that never touch the network. Call sites
//! depend on that exact behavior, so it is deliberately not unified with
//! the facade's fallback-to-local policy.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::cache::facade::decode_value;
use crate::cache::remote::decode_payload;
use crate::client::RestClient;
use crate::config::NamespacedConfig;
use crate::error::Result;

// == Namespaced Remote Cache ==
#[derive(Debug)]
pub struct NamespacedRemoteCache {
    client: Option<RestClient>,
    namespace: String,
    default_ttl_secs: u64,
}

impl NamespacedRemoteCache {
    // == Constructor ==
    pub fn new(config: NamespacedConfig) -> Self {
        let client = match &config.remote {
            Some(credentials) => Some(RestClient::new(credentials)),
            None => {
                info!(
                    namespace = %config.namespace,
                    "no remote credentials, namespaced cache disabled"
                );
                None
            }
        };

        Self {
            client,
            namespace: config.namespace,
            default_ttl_secs: config.default_ttl_secs,
        }
    }

    /// False when the cache was constructed without credentials and every
    /// operation is a no-op.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    // == Get ==
    /// Fetches a value from the namespaced keyspace. Disabled mode and
    /// misses both read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        let scoped = self.scoped(key);
        let reply = client.command(&[json!("GET"), json!(&scoped)]).await?;
        Ok(decode_payload(&scoped, reply).and_then(|value| decode_value(&scoped, value)))
    }

    // == Set ==
    /// Stores a value with native expiration in seconds (`None` applies the
    /// configured default). A no-op in disabled mode.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: Option<u64>,
    ) -> Result<()> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        let payload = serde_json::to_string(value)?;
        let ttl = ttl_secs.unwrap_or(self.default_ttl_secs);
        client
            .command(&[
                json!("SET"),
                json!(self.scoped(key)),
                json!(payload),
                json!("EX"),
                json!(ttl),
            ])
            .await?;
        Ok(())
    }

    // == Delete ==
    /// Removes a key from the namespaced keyspace. A no-op in disabled mode.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        client
            .command(&[json!("DEL"), json!(self.scoped(key))])
            .await?;
        Ok(())
    }
}
