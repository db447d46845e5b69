//! Integration Tests for the Remote Backend
//!
//! Serves an in-memory stand-in for the REST key-value store on an ephemeral
//! port and runs the remote backend and both facades against it. The mock
//! records every command and every HTTP request so tests can assert on the
//! wire protocol, not just on observable cache state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use ttlstore::{Cache, CacheConfig, NamespacedConfig, NamespacedRemoteCache, RemoteCredentials};

// == Mock Remote Store ==

#[derive(Default)]
struct MockStore {
    /// key -> (JSON-encoded payload, native TTL in seconds)
    entries: HashMap<String, (String, i64)>,
    /// every command applied, in order
    commands: Vec<Vec<Value>>,
    /// HTTP round trips served (a pipeline counts once)
    http_requests: usize,
    /// last Authorization header seen
    last_auth: Option<String>,
}

type Shared = Arc<Mutex<MockStore>>;

fn apply(store: &mut MockStore, cmd: &[Value]) -> Value {
    store.commands.push(cmd.to_vec());

    let name = cmd
        .first()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_uppercase();
    let arg = |i: usize| {
        cmd.get(i)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let result = match name.as_str() {
        "SET" => {
            let ttl = cmd.get(4).and_then(Value::as_i64).unwrap_or(-1);
            store.entries.insert(arg(1), (arg(2), ttl));
            json!("OK")
        }
        "GET" => store
            .entries
            .get(&arg(1))
            .map(|(payload, _)| json!(payload))
            .unwrap_or(Value::Null),
        "EXISTS" => json!(store.entries.contains_key(&arg(1)) as i64),
        "TTL" => store
            .entries
            .get(&arg(1))
            .map(|(_, ttl)| json!(ttl))
            .unwrap_or(json!(-2)),
        "DEL" => json!(store.entries.remove(&arg(1)).is_some() as i64),
        "MGET" => {
            let values: Vec<Value> = cmd[1..]
                .iter()
                .map(|key| {
                    let key = key.as_str().unwrap_or_default();
                    store
                        .entries
                        .get(key)
                        .map(|(payload, _)| json!(payload))
                        .unwrap_or(Value::Null)
                })
                .collect();
            json!(values)
        }
        "FLUSHDB" => {
            store.entries.clear();
            json!("OK")
        }
        other => return json!({ "error": format!("unknown command {other}") }),
    };

    json!({ "result": result })
}

async fn command_handler(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(cmd): Json<Vec<Value>>,
) -> Json<Value> {
    let mut store = store.lock().unwrap();
    store.http_requests += 1;
    store.last_auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(apply(&mut store, &cmd))
}

async fn pipeline_handler(
    State(store): State<Shared>,
    Json(cmds): Json<Vec<Vec<Value>>>,
) -> Json<Value> {
    let mut store = store.lock().unwrap();
    store.http_requests += 1;
    let replies: Vec<Value> = cmds.iter().map(|cmd| apply(&mut store, cmd)).collect();
    Json(json!(replies))
}

// == Helper Functions ==

/// Opt-in log output for debugging, e.g. RUST_LOG=ttlstore=debug.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn spawn_mock() -> (Shared, RemoteCredentials) {
    init_tracing();
    let store: Shared = Arc::default();
    let app = Router::new()
        .route("/", post(command_handler))
        .route("/pipeline", post(pipeline_handler))
        .with_state(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let credentials = RemoteCredentials {
        url: format!("http://{addr}"),
        token: "test-token".to_string(),
    };
    (store, credentials)
}

async fn remote_cache(credentials: RemoteCredentials) -> Cache {
    Cache::new(CacheConfig {
        default_ttl_ms: 3_600_000,
        cleanup_interval_ms: 300_000,
        remote: Some(credentials),
    })
}

fn commands_named(store: &Shared, name: &str) -> Vec<Vec<Value>> {
    store
        .lock()
        .unwrap()
        .commands
        .iter()
        .filter(|cmd| cmd.first().and_then(Value::as_str) == Some(name))
        .cloned()
        .collect()
}

// == Facade: Remote Mode ==

#[tokio::test]
async fn test_set_issues_native_ttl_in_seconds() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;
    assert!(cache.is_remote());

    // Default TTL of 3,600,000 ms must reach the wire as EX 3600
    cache.set("b", &json!({"y": 2}), None).await.unwrap();

    {
        let store = store.lock().unwrap();
        let (payload, ttl) = &store.entries["b"];
        assert_eq!(payload, r#"{"y":2}"#);
        assert_eq!(*ttl, 3600);
    }

    assert_eq!(
        cache.get::<serde_json::Value>("b").await.unwrap(),
        Some(json!({"y": 2}))
    );
}

#[tokio::test]
async fn test_explicit_ttl_is_floor_divided() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache.set("k", &1u32, Some(5_999)).await.unwrap();

    let sets = commands_named(&store, "SET");
    assert_eq!(sets[0][4], json!(5));
}

#[tokio::test]
async fn test_has_uses_existence_check_not_fetch() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache.set("present", &1u32, None).await.unwrap();

    assert!(cache.has("present").await.unwrap());
    assert!(!cache.has("absent").await.unwrap());

    assert_eq!(commands_named(&store, "EXISTS").len(), 2);
    // No value was transferred to answer the existence question
    assert!(commands_named(&store, "GET").is_empty());
}

#[tokio::test]
async fn test_remaining_ttl_normalized_to_milliseconds() {
    let (_store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache.set("k", &1u32, Some(5_000)).await.unwrap();

    assert_eq!(cache.remaining_ttl_ms("k").await.unwrap(), Some(5_000));
    assert_eq!(cache.remaining_ttl_ms("absent").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_many_is_one_mget_round_trip() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache
        .set_many(&[("k1", json!(1)), ("k2", json!(2))], None)
        .await
        .unwrap();

    let requests_before = store.lock().unwrap().http_requests;
    let found = cache
        .get_many::<serde_json::Value>(&["k1", "k2", "k3"])
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found["k1"], json!(1));
    assert_eq!(found["k2"], json!(2));

    let store = store.lock().unwrap();
    assert_eq!(store.http_requests, requests_before + 1);
}

#[tokio::test]
async fn test_set_many_pipelines_into_one_round_trip() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache
        .set_many(
            &[("k1", json!("a")), ("k2", json!("b")), ("k3", json!("c"))],
            Some(10_000),
        )
        .await
        .unwrap();

    let store = store.lock().unwrap();
    assert_eq!(store.http_requests, 1, "batch must be a single round trip");
    assert_eq!(store.entries.len(), 3);
    for (_, ttl) in store.entries.values() {
        assert_eq!(*ttl, 10);
    }
}

#[tokio::test]
async fn test_delete_and_clear() {
    let (_store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache.set("a", &1u32, None).await.unwrap();
    cache.set("b", &2u32, None).await.unwrap();

    assert!(cache.delete("a").await.unwrap());
    assert!(!cache.delete("a").await.unwrap());

    cache.clear().await.unwrap();
    assert_eq!(cache.get::<u32>("b").await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupted_payload_reads_as_absent() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    store
        .lock()
        .unwrap()
        .entries
        .insert("bad".to_string(), ("not json {".to_string(), 100));

    assert_eq!(cache.get::<serde_json::Value>("bad").await.unwrap(), None);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (store, credentials) = spawn_mock().await;
    let cache = remote_cache(credentials).await;

    cache.set("k", &1u32, None).await.unwrap();

    assert_eq!(
        store.lock().unwrap().last_auth.as_deref(),
        Some("Bearer test-token")
    );
}

#[tokio::test]
async fn test_connectivity_failure_surfaces_as_error() {
    // Bind then drop a listener so the port is known-dead
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cache = remote_cache(RemoteCredentials {
        url: format!("http://{addr}"),
        token: "test-token".to_string(),
    })
    .await;

    assert!(cache.get::<u32>("k").await.is_err());

    // destroy is a no-op for the remote backend but must stay safe
    cache.destroy();
    cache.destroy();
}

// == Namespaced Remote Cache ==

#[tokio::test]
async fn test_namespaced_keys_carry_prefix() {
    let (store, credentials) = spawn_mock().await;
    let cache = NamespacedRemoteCache::new(NamespacedConfig {
        remote: Some(credentials),
        ..NamespacedConfig::new("lists")
    });
    assert!(cache.is_enabled());

    cache.set("user:42", &json!({"n": 1}), None).await.unwrap();

    {
        let store = store.lock().unwrap();
        let (payload, ttl) = &store.entries["lists:user:42"];
        assert_eq!(payload, r#"{"n":1}"#);
        // Namespaced default TTL is 3600 seconds
        assert_eq!(*ttl, 3600);
    }

    assert_eq!(
        cache.get::<serde_json::Value>("user:42").await.unwrap(),
        Some(json!({"n": 1}))
    );

    cache.delete("user:42").await.unwrap();
    assert_eq!(cache.get::<serde_json::Value>("user:42").await.unwrap(), None);
}

#[tokio::test]
async fn test_namespaced_disabled_mode_never_touches_network() {
    let (store, _credentials) = spawn_mock().await;
    // Credentials exist but are deliberately not passed in
    let cache = NamespacedRemoteCache::new(NamespacedConfig::new("lists"));
    assert!(!cache.is_enabled());

    cache.set("k", &1u32, None).await.unwrap();
    assert_eq!(cache.get::<u32>("k").await.unwrap(), None);
    cache.delete("k").await.unwrap();

    let store = store.lock().unwrap();
    assert_eq!(store.http_requests, 0);
    assert!(store.commands.is_empty());
}
