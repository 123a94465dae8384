use std::collections::HashMap;
use std::sync::Mutex;

use axum::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Opaque credential handed to the client in the session cookie.
pub fn new_session_token() -> String {
    Uuid::new_v4().to_string()
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Maps a session token to a user id with a TTL. Injected into `AppState`
/// behind an `Arc` so handlers never talk to a process-wide client.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set(&self, token: &str, user_id: i64, ttl_seconds: u64) -> anyhow::Result<()>;
    async fn get(&self, token: &str) -> anyhow::Result<Option<i64>>;
    async fn delete(&self, token: &str) -> anyhow::Result<()>;
}

pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, token: &str, user_id: i64, ttl_seconds: u64) -> anyhow::Result<()> {
        // ConnectionManager is a cheap clonable handle over one multiplexed
        // connection.
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(session_key(token), user_id, ttl_seconds)
            .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let user_id: Option<i64> = conn.get(session_key(token)).await?;
        Ok(user_id)
    }

    async fn delete(&self, token: &str) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(token)).await?;
        Ok(())
    }
}

/// TTL-honoring in-memory store for tests and Redis-less local runs.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, (i64, OffsetDateTime)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, (i64, OffsetDateTime)>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, token: &str, user_id: i64, ttl_seconds: u64) -> anyhow::Result<()> {
        let expires_at = OffsetDateTime::now_utc() + Duration::seconds(ttl_seconds as i64);
        self.lock()?
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<i64>> {
        let mut entries = self.lock()?;
        match entries.get(token).copied() {
            Some((user_id, expires_at)) if OffsetDateTime::now_utc() < expires_at => {
                Ok(Some(user_id))
            }
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token: &str) -> anyhow::Result<()> {
        self.lock()?.remove(token);
        Ok(())
    }
}
