use async_trait::async_trait;
use parking_lot::RwLock;
use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    sync::Arc,
};
use tokio::sync::broadcast;

use crate::{engine::Cache, error::Result};

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub channel: String,
    pub payload: String,
}

#[derive(Debug, Default)]
struct Keyspace {
    sets: HashMap<String, BTreeSet<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
    lists: HashMap<String, VecDeque<String>>,
}

/// Single process cache. Empty sets disappear like they do on a redis server.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    keys: Arc<RwLock<Keyspace>>,
    sender: broadcast::Sender<Message>,
}

impl MemoryCache {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            keys: Arc::default(),
            sender,
        }
    }

    /// Listens to every channel; filter on [`Message::channel`].
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    pub fn hset(&self, key: &str, field: &str, value: impl Into<String>) {
        self.keys
            .write()
            .hashes
            .entry(key.to_owned())
            .or_default()
            .insert(field.to_owned(), value.into());
    }

    pub fn rpush(&self, key: &str, value: impl Into<String>) {
        self.keys
            .write()
            .lists
            .entry(key.to_owned())
            .or_default()
            .push_back(value.into());
    }

    pub fn exists(&self, key: &str) -> bool {
        let keys = self.keys.read();

        keys.sets.contains_key(key) || keys.hashes.contains_key(key) || keys.lists.contains_key(key)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .keys
            .write()
            .sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned()))
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool> {
        let mut keys = self.keys.write();
        let Some(set) = keys.sets.get_mut(key) else {
            return Ok(false);
        };

        let removed = set.remove(member);

        if set.is_empty() {
            keys.sets.remove(key);
        }

        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> Result<BTreeSet<String>> {
        Ok(self.keys.read().sets.get(key).cloned().unwrap_or_default())
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut keyspace = self.keys.write();
        let mut removed = 0;

        for key in keys {
            let existed = keyspace.sets.remove(key).is_some()
                | keyspace.hashes.remove(key).is_some()
                | keyspace.lists.remove(key).is_some();

            if existed {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self.keys.read().hashes.get(key).cloned().unwrap_or_default())
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<u64> {
        let message = Message {
            channel: channel.to_owned(),
            payload: message.to_owned(),
        };

        // No receiver is not an error for a broadcast.
        let receivers = self.sender.send(message).unwrap_or(0);

        Ok(receivers as u64)
    }
}
