use async_trait::async_trait;
use dyn_clone::DynClone;
use std::collections::{BTreeSet, HashMap};

use crate::error::Result;

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "redis")]
mod redis_cache;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "redis")]
pub use redis_cache::*;

/// The subset of a key-value data structure server the registry talks to.
#[async_trait]
pub trait Cache: DynClone + Send + Sync {
    /// Returns `true` when `member` was not in the set yet.
    async fn sadd(&self, key: &str, member: &str) -> Result<bool>;

    /// Returns `true` when `member` was in the set.
    async fn srem(&self, key: &str, member: &str) -> Result<bool>;

    async fn smembers(&self, key: &str) -> Result<BTreeSet<String>>;

    /// Deletes every key whatever its type, returns how many existed.
    async fn del(&self, keys: &[String]) -> Result<u64>;

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

    /// Fire and forget; returns how many listeners received the message.
    async fn publish(&self, channel: &str, message: &str) -> Result<u64>;
}

dyn_clone::clone_trait_object!(Cache);
