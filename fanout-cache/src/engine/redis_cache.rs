use ::redis::{aio::ConnectionManager, AsyncCommands, Client};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

use crate::{engine::Cache, error::Result};

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        info!("connected to redis");

        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let added: u64 = conn.sadd(key, member).await?;

        Ok(added > 0)
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.srem(key, member).await?;

        Ok(removed > 0)
    }

    async fn smembers(&self, key: &str) -> Result<BTreeSet<String>> {
        let mut conn = self.conn.clone();
        let members: HashSet<String> = conn.smembers(key).await?;

        Ok(members.into_iter().collect())
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(keys.to_vec()).await?;

        Ok(removed)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.conn.clone();
        let values: HashMap<String, String> = conn.hgetall(key).await?;

        Ok(values)
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let receivers: u64 = conn.publish(channel, message).await?;

        Ok(receivers)
    }
}
