use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;

use crate::profile::models::Profile;

/// Per-user profile storage. `set` overwrites.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<Profile>>;
    async fn set(&self, user_id: &str, profile: &Profile) -> anyhow::Result<()>;
    /// Returns whether a profile was present.
    async fn delete(&self, user_id: &str) -> anyhow::Result<bool>;
}

/// Profiles as JSON strings under `profile:{user_id}`.
#[derive(Clone)]
pub struct RedisProfileStore {
    client: redis::Client,
}

impl RedisProfileStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> anyhow::Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")
    }
}

pub fn profile_key(user_id: &str) -> String {
    format!("profile:{user_id}")
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<Profile>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(profile_key(user_id)).await?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .with_context(|| format!("Stored profile for '{user_id}' is not valid JSON"))
        })
        .transpose()
    }

    async fn set(&self, user_id: &str, profile: &Profile) -> anyhow::Result<()> {
        let json = serde_json::to_string(profile)?;
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(profile_key(user_id), json).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> anyhow::Result<bool> {
        let mut conn = self.connection().await?;
        let removed: i64 = conn.del(profile_key(user_id)).await?;
        Ok(removed > 0)
    }
}

/// Process-local store used when `REDIS_URL` is unset, and in tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn set(&self, user_id: &str, profile: &Profile) -> anyhow::Result<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> anyhow::Result<bool> {
        Ok(self.profiles.write().await.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites_and_delete_clears() {
        let store = InMemoryProfileStore::new();
        assert!(store.get("u-1").await.unwrap().is_none());

        let mut profile = Profile {
            name: "Jane Smith".to_string(),
            ..Default::default()
        };
        store.set("u-1", &profile).await.unwrap();
        profile.title = "Data Engineer".to_string();
        store.set("u-1", &profile).await.unwrap();

        let stored = store.get("u-1").await.unwrap().unwrap();
        assert_eq!(stored.title, "Data Engineer");

        assert!(store.delete("u-1").await.unwrap());
        assert!(!store.delete("u-1").await.unwrap());
        assert!(store.get("u-1").await.unwrap().is_none());
    }

    #[test]
    fn test_profile_key() {
        assert_eq!(profile_key("u-42"), "profile:u-42");
    }
}
