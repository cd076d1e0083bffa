use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::{
    error::Result,
    query::{Condition, SortKey},
    subscription::Subscription,
};

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "pg")]
mod pg;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "pg")]
pub use pg::*;

/// Condition based CRUD over subscription records.
///
/// Engines own id assignment and must reject a second live record holding the
/// same `subscription_name` with [`crate::StoreError::UniqueViolation`].
#[async_trait]
pub trait Engine: DynClone + Send + Sync {
    async fn count(&self, condition: &Condition) -> Result<u64>;

    async fn insert(&self, subscription: Subscription) -> Result<i64>;

    async fn find(
        &self,
        condition: &Condition,
        sort: &[SortKey],
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Subscription>>;

    /// Replaces the record stored under `id`, returns `false` when there is none.
    async fn update(&self, id: i64, subscription: Subscription) -> Result<bool>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

dyn_clone::clone_trait_object!(Engine);
