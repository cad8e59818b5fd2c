// dashboard-web/src/cache.rs
use actix::{Actor, AsyncContext, Context, Handler, Message, MessageResult};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

// Default entry TTL in seconds
const DEFAULT_QUERY_TTL: i64 = 30;

pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";
pub const USERS: &str = "users";

pub fn project_key(id: &str) -> String {
    format!("{}:{}", PROJECTS, id)
}

pub fn comments_key(task_id: &str) -> String {
    format!("comments:task:{}", task_id)
}

/// Actor message: Look up a cached query result for a session
#[derive(Message)]
#[rtype(result = "CacheLookup")]
pub struct GetCached {
    pub fingerprint: String,
    pub key: String,
}

/// Result of [`GetCached`]. On a miss, `generation` must be handed back in
/// the [`PutCached`] that stores the fetched value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    pub value: Option<Value>,
    pub generation: u64,
}

/// Actor message: Store a query result for a session. Dropped when an
/// invalidation happened after the lookup that observed `generation`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct PutCached {
    pub fingerprint: String,
    pub key: String,
    pub value: Value,
    pub generation: u64,
}

/// Actor message: Drop `prefix` and every `prefix:*` key, for all sessions
#[derive(Message)]
#[rtype(result = "usize")]
pub struct Invalidate {
    pub prefix: String,
}

/// Actor message: Drop everything cached for one session (logout)
#[derive(Message)]
#[rtype(result = "usize")]
pub struct DropSession {
    pub fingerprint: String,
}

/// Actor message: Remove expired entries
#[derive(Message)]
#[rtype(result = "usize")]
pub struct CleanupExpiredEntries;

/// Actor message: Get cache metrics
#[derive(Message)]
#[rtype(result = "CacheMetrics")]
pub struct GetCacheMetrics;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidated: usize,
    pub expired_count: usize,
    pub stale_puts: u64,
}

#[derive(Debug, Clone)]
struct CachedQuery {
    value: Value,
    stored_at: DateTime<Utc>,
}

fn matches_prefix(key: &str, prefix: &str) -> bool {
    key == prefix
        || key
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with(':'))
}

/// QueryCacheActor keeps recent list reads per (session, query key)
pub struct QueryCacheActor {
    // (token fingerprint, query key) -> cached result
    entries: Arc<DashMap<(String, String), CachedQuery>>,
    ttl: i64,
    cleanup_interval: u64,
    // bumped by every invalidation
    generation: u64,
    metrics: CacheMetrics,
}

impl Default for QueryCacheActor {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCacheActor {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: DEFAULT_QUERY_TTL,
            cleanup_interval: 60,
            generation: 0,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl = ttl_seconds;
        self
    }

    pub fn with_cleanup_interval(mut self, interval_seconds: u64) -> Self {
        self.cleanup_interval = interval_seconds.max(1);
        self
    }

    fn is_fresh(&self, entry: &CachedQuery, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at).num_seconds() < self.ttl
    }

    fn remove_where(&mut self, predicate: impl Fn(&(String, String)) -> bool) -> usize {
        let doomed: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|entry| predicate(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        doomed
            .into_iter()
            .filter(|key| self.entries.remove(key).is_some())
            .count()
    }

    fn cleanup_entries(&mut self) -> usize {
        let now = Utc::now();
        let ttl = self.ttl;
        let expired: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|entry| now.signed_duration_since(entry.value().stored_at).num_seconds() >= ttl)
            .map(|entry| entry.key().clone())
            .collect();

        let expired_count = expired
            .into_iter()
            .filter(|key| self.entries.remove(key).is_some())
            .count();

        self.metrics.expired_count += expired_count;
        self.metrics.entries = self.entries.len();
        expired_count
    }
}

impl Actor for QueryCacheActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("QueryCacheActor started with TTL: {}s", self.ttl);

        ctx.run_interval(Duration::from_secs(self.cleanup_interval), |act, _ctx| {
            let expired_count = act.cleanup_entries();
            if expired_count > 0 {
                tracing::debug!("Cleaned up {} expired cache entries", expired_count);
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(
            "QueryCacheActor stopped. {} hits, {} misses, {} invalidated",
            self.metrics.hits,
            self.metrics.misses,
            self.metrics.invalidated
        );
    }
}

impl Handler<GetCached> for QueryCacheActor {
    type Result = MessageResult<GetCached>;

    fn handle(&mut self, msg: GetCached, _ctx: &mut Self::Context) -> Self::Result {
        let key = (msg.fingerprint, msg.key);
        let now = Utc::now();

        let hit = self
            .entries
            .get(&key)
            .filter(|entry| self.is_fresh(entry.value(), now))
            .map(|entry| entry.value().value.clone());

        if hit.is_some() {
            self.metrics.hits += 1;
            tracing::debug!("Cache hit for `{}`", key.1);
        } else {
            self.metrics.misses += 1;
            tracing::debug!("Cache miss for `{}`", key.1);
        }

        MessageResult(CacheLookup {
            value: hit,
            generation: self.generation,
        })
    }
}

impl Handler<PutCached> for QueryCacheActor {
    type Result = ();

    fn handle(&mut self, msg: PutCached, _ctx: &mut Self::Context) -> Self::Result {
        if msg.generation != self.generation {
            self.metrics.stale_puts += 1;
            tracing::debug!("Not caching `{}`: invalidated while it was fetched", msg.key);
            return;
        }
        self.entries.insert(
            (msg.fingerprint, msg.key),
            CachedQuery {
                value: msg.value,
                stored_at: Utc::now(),
            },
        );
        self.metrics.entries = self.entries.len();
    }
}

impl Handler<Invalidate> for QueryCacheActor {
    type Result = MessageResult<Invalidate>;

    fn handle(&mut self, msg: Invalidate, _ctx: &mut Self::Context) -> Self::Result {
        let removed = self.remove_where(|(_, key)| matches_prefix(key, &msg.prefix));
        self.generation += 1;
        self.metrics.invalidated += removed;
        self.metrics.entries = self.entries.len();

        tracing::debug!("Invalidated {} cached queries for `{}`", removed, msg.prefix);
        MessageResult(removed)
    }
}

impl Handler<DropSession> for QueryCacheActor {
    type Result = MessageResult<DropSession>;

    fn handle(&mut self, msg: DropSession, _ctx: &mut Self::Context) -> Self::Result {
        let removed = self.remove_where(|(fingerprint, _)| *fingerprint == msg.fingerprint);
        self.generation += 1;
        self.metrics.entries = self.entries.len();
        MessageResult(removed)
    }
}

impl Handler<CleanupExpiredEntries> for QueryCacheActor {
    type Result = MessageResult<CleanupExpiredEntries>;

    fn handle(&mut self, _msg: CleanupExpiredEntries, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.cleanup_entries())
    }
}

impl Handler<GetCacheMetrics> for QueryCacheActor {
    type Result = MessageResult<GetCacheMetrics>;

    fn handle(&mut self, _msg: GetCacheMetrics, _ctx: &mut Self::Context) -> Self::Result {
        self.metrics.entries = self.entries.len();
        MessageResult(self.metrics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use serde_json::json;

    fn put(fingerprint: &str, key: &str) -> PutCached {
        PutCached {
            fingerprint: fingerprint.into(),
            key: key.into(),
            value: json!([key]),
            generation: 0,
        }
    }

    fn get(fingerprint: &str, key: &str) -> GetCached {
        GetCached {
            fingerprint: fingerprint.into(),
            key: key.into(),
        }
    }

    #[test]
    fn test_prefix_matching() {
        assert!(matches_prefix("projects", "projects"));
        assert!(matches_prefix("projects:7", "projects"));
        assert!(!matches_prefix("projectsx", "projects"));
        assert!(matches_prefix("comments:task:1", "comments:task:1"));
        assert!(!matches_prefix("comments:task:10", "comments:task:1"));
    }

    #[actix::test]
    async fn test_entries_are_partitioned_by_session() {
        let cache = QueryCacheActor::new().start();
        cache.send(put("alice", PROJECTS)).await.unwrap();

        assert_eq!(cache.send(get("alice", PROJECTS)).await.unwrap().value, Some(json!(["projects"])));
        assert_eq!(cache.send(get("bob", PROJECTS)).await.unwrap().value, None);

        let metrics = cache.send(GetCacheMetrics).await.unwrap();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
    }

    #[actix::test]
    async fn test_invalidate_hits_every_session_and_subkeys() {
        let cache = QueryCacheActor::new().start();
        cache.send(put("alice", PROJECTS)).await.unwrap();
        cache.send(put("bob", &project_key("7"))).await.unwrap();
        cache.send(put("bob", TASKS)).await.unwrap();

        let removed = cache.send(Invalidate { prefix: PROJECTS.into() }).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.send(get("bob", TASKS)).await.unwrap().value, Some(json!(["tasks"])));
    }

    #[actix::test]
    async fn test_drop_session_and_expiry() {
        let cache = QueryCacheActor::new().with_ttl(0).start();
        cache.send(put("alice", USERS)).await.unwrap();
        // zero TTL: never served
        assert_eq!(cache.send(get("alice", USERS)).await.unwrap().value, None);
        assert_eq!(cache.send(CleanupExpiredEntries).await.unwrap(), 1);

        let cache = QueryCacheActor::new().start();
        cache.send(put("alice", USERS)).await.unwrap();
        cache.send(put("alice", TASKS)).await.unwrap();
        cache.send(put("bob", TASKS)).await.unwrap();
        assert_eq!(cache.send(DropSession { fingerprint: "alice".into() }).await.unwrap(), 2);
        assert_eq!(cache.send(GetCacheMetrics).await.unwrap().entries, 1);
    }

    #[actix::test]
    async fn test_result_fetched_across_an_invalidation_is_not_stored() {
        let cache = QueryCacheActor::new().start();
        let miss = cache.send(get("alice", PROJECTS)).await.unwrap();
        assert_eq!(miss.value, None);

        // a mutation lands while the read is still in flight
        cache.send(Invalidate { prefix: PROJECTS.into() }).await.unwrap();
        cache
            .send(PutCached {
                generation: miss.generation,
                ..put("alice", PROJECTS)
            })
            .await
            .unwrap();
        assert_eq!(cache.send(get("alice", PROJECTS)).await.unwrap().value, None);

        let miss = cache.send(get("alice", PROJECTS)).await.unwrap();
        cache
            .send(PutCached {
                generation: miss.generation,
                ..put("alice", PROJECTS)
            })
            .await
            .unwrap();
        assert_eq!(cache.send(get("alice", PROJECTS)).await.unwrap().value, Some(json!(["projects"])));
        assert_eq!(cache.send(GetCacheMetrics).await.unwrap().stale_puts, 1);
    }
}
