use ::redis::{Client, Commands};

use crate::db::PreferenceStore;
use crate::error::AppResult;

/// Creates a Redis client for preference storage
///
/// Only validates the URL; connections are opened per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Preference storage backed by plain Redis string keys
///
/// Keys carry no TTL: preferences live until overwritten or removed.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn connect(redis_url: &str) -> anyhow::Result<Self> {
        Ok(Self::new(create_redis_client(redis_url)?))
    }
}

impl PreferenceStore for RedisStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.get_connection()?;
        let value: Option<String> = conn.get(key)?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.set(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.del(key)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
