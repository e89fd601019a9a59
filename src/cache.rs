use axum::http::HeaderMap;
use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Read-through memo cache over Redis. Entries are serialized JSON with a
/// fixed TTL; there is no invalidation on writes, so a cached read may lag
/// the ledger by up to the TTL. Callers opt in per request via the
/// `use-cache` header.
#[derive(Clone)]
pub struct MemoCache {
    client: Option<redis::Client>,
    ttl_secs: u64,
}

impl MemoCache {
    pub fn new(redis_url: Option<&str>, ttl_secs: u64) -> Result<Self, redis::RedisError> {
        let client = match redis_url {
            Some(url) => Some(redis::Client::open(url)?),
            None => None,
        };
        Ok(Self { client, ttl_secs })
    }

    /// A cache that never hits and never stores.
    pub fn disabled() -> Self {
        Self {
            client: None,
            ttl_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Fetch and deserialize a cached entry. Any Redis or decode failure
    /// degrades to a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let client = self.client.as_ref()?;
        let mut conn = match client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!(error = %err, "cache unreachable, falling back to db");
                return None;
            }
        };
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, key, "cache read failed");
                return None;
            }
        };
        raw.and_then(|json| serde_json::from_str(&json).ok())
    }

    /// Store a serialized entry with the configured TTL. Failures are logged
    /// and swallowed; the request already has its data.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, key, "cache serialize failed");
                return;
            }
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                if let Err(err) = conn.set_ex::<_, _, ()>(key, json, self.ttl_secs).await {
                    tracing::warn!(error = %err, key, "cache write failed");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "cache unreachable, skipping write");
            }
        }
    }
}

pub fn ticket_list_key(user_id: Uuid) -> String {
    format!("tickets:user:{user_id}")
}

/// `use-cache: true` opts the request in to cached reads.
pub fn parse_use_cache(headers: &HeaderMap) -> bool {
    headers
        .get("use-cache")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn use_cache_header_defaults_to_false() {
        let headers = HeaderMap::new();
        assert!(!parse_use_cache(&headers));
    }

    #[test]
    fn use_cache_header_parses_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("use-cache", HeaderValue::from_static("True"));
        assert!(parse_use_cache(&headers));

        headers.insert("use-cache", HeaderValue::from_static("false"));
        assert!(!parse_use_cache(&headers));
    }

    #[tokio::test]
    async fn disabled_cache_never_hits() {
        let cache = MemoCache::disabled();
        assert!(!cache.is_enabled());
        let hit: Option<Vec<String>> = cache.get_json("tickets:user:any").await;
        assert!(hit.is_none());
        cache.put_json("tickets:user:any", &vec!["x"]).await;
    }
}
