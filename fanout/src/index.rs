use fanout_cache::{keys, Cache, CacheError};
use std::collections::BTreeSet;
use tracing::{debug, error};

use crate::diff::FormDiff;

/// A fan-out update that stopped, or finished, with some changes not applied.
#[derive(Debug, thiserror::Error)]
#[error("fan-out index update failed on `{event_type}` ({applied} of {total} changes applied): {source}")]
pub struct IndexError {
    pub event_type: String,
    pub applied: usize,
    pub total: usize,
    #[source]
    pub source: CacheError,
}

/// Event type to subscriber ids, as read by the delivery workers.
///
/// A projection of the live subscriptions' forms, never a source of truth.
#[derive(Clone)]
pub struct FanoutIndex {
    cache: Box<dyn Cache>,
}

impl FanoutIndex {
    pub fn new(cache: Box<dyn Cache>) -> Self {
        Self { cache }
    }

    pub async fn add_member(&self, event_type: &str, subscription_id: i64) -> Result<(), CacheError> {
        self.cache
            .sadd(&keys::subscribe_form(event_type), &subscription_id.to_string())
            .await?;

        Ok(())
    }

    pub async fn remove_member(
        &self,
        event_type: &str,
        subscription_id: i64,
    ) -> Result<(), CacheError> {
        self.cache
            .srem(&keys::subscribe_form(event_type), &subscription_id.to_string())
            .await?;

        Ok(())
    }

    /// Subscriber ids indexed under `event_type`; foreign members are skipped.
    pub async fn members(&self, event_type: &str) -> Result<BTreeSet<i64>, CacheError> {
        let members = self.cache.smembers(&keys::subscribe_form(event_type)).await?;

        Ok(members
            .iter()
            .filter_map(|member| member.parse().ok())
            .collect())
    }

    /// Drops the queue and markers a delivery worker keeps for the subscriber.
    pub async fn purge_subscriber(&self, subscription_id: i64) -> Result<u64, CacheError> {
        let removed = self
            .cache
            .del(&keys::delivery_state(subscription_id))
            .await?;

        debug!("purged {removed} delivery state keys of subscription {subscription_id}");

        Ok(removed)
    }

    pub async fn clear_statistics(&self, subscription_id: i64) -> Result<(), CacheError> {
        self.cache
            .del(&[keys::callback_count(subscription_id)])
            .await?;

        Ok(())
    }

    /// Removes then adds; stops at the first failing change.
    pub async fn apply(&self, subscription_id: i64, changes: &FormDiff) -> Result<(), IndexError> {
        let total = changes.len();
        let mut applied = 0;

        for event_type in changes.removed.iter() {
            self.remove_member(event_type, subscription_id)
                .await
                .map_err(|source| IndexError {
                    event_type: event_type.to_owned(),
                    applied,
                    total,
                    source,
                })?;
            applied += 1;
        }

        for event_type in changes.added.iter() {
            self.add_member(event_type, subscription_id)
                .await
                .map_err(|source| IndexError {
                    event_type: event_type.to_owned(),
                    applied,
                    total,
                    source,
                })?;
            applied += 1;
        }

        Ok(())
    }

    /// Removes the subscriber from every event type, trying all of them even
    /// after a failure; the first failure is returned.
    pub async fn detach(&self, subscription_id: i64, event_types: &[String]) -> Result<(), IndexError> {
        let total = event_types.len();
        let mut applied = 0;
        let mut failure = None;

        for event_type in event_types {
            match self.remove_member(event_type, subscription_id).await {
                Ok(()) => applied += 1,
                Err(source) => {
                    error!("remove subscription {subscription_id} from {event_type} failed: {source}");

                    if failure.is_none() {
                        failure = Some((event_type.to_owned(), source));
                    }
                }
            }
        }

        match failure {
            Some((event_type, source)) => Err(IndexError {
                event_type,
                applied,
                total,
                source,
            }),
            None => Ok(()),
        }
    }
}
