use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    query::{compare, matches, Condition, SortKey},
    store::Store,
    subscription::Subscription,
};

#[derive(Debug, Default)]
struct Records {
    last_id: i64,
    rows: BTreeMap<i64, Subscription>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<RwLock<Records>>);

impl MemoryStore {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Store {
        Store::new(Self::default())
    }
}

fn to_object(subscription: &Subscription) -> Result<Map<String, Value>> {
    match serde_json::to_value(subscription)? {
        Value::Object(object) => Ok(object),
        _ => Err(StoreError::RecordNotObject),
    }
}

fn filter(records: &Records, condition: &Condition) -> Result<Vec<(Map<String, Value>, Subscription)>> {
    let mut matched = Vec::new();

    for subscription in records.rows.values() {
        let object = to_object(subscription)?;

        if matches(&object, condition) {
            matched.push((object, subscription.clone()));
        }
    }

    Ok(matched)
}

#[async_trait]
impl Engine for MemoryStore {
    async fn count(&self, condition: &Condition) -> Result<u64> {
        let records = self.0.read();

        Ok(filter(&records, condition)?.len() as u64)
    }

    async fn insert(&self, mut subscription: Subscription) -> Result<i64> {
        let mut records = self.0.write();

        if records
            .rows
            .values()
            .any(|row| row.subscription_name == subscription.subscription_name)
        {
            return Err(StoreError::UniqueViolation(subscription.subscription_name));
        }

        records.last_id += 1;

        let id = records.last_id;
        subscription.subscription_id = id;
        subscription.statistics = None;
        records.rows.insert(id, subscription);

        Ok(id)
    }

    async fn find(
        &self,
        condition: &Condition,
        sort: &[SortKey],
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Subscription>> {
        let mut matched = filter(&self.0.read(), condition)?;

        matched.sort_by(|(a, _), (b, _)| {
            sort.iter()
                .map(|key| {
                    let cmp = compare(a.get(&key.field), b.get(&key.field));
                    if key.descending {
                        cmp.reverse()
                    } else {
                        cmp
                    }
                })
                .find(|cmp| cmp.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(_, subscription)| subscription)
            .collect())
    }

    async fn update(&self, id: i64, mut subscription: Subscription) -> Result<bool> {
        let mut records = self.0.write();

        if !records.rows.contains_key(&id) {
            return Ok(false);
        }

        if records.rows.iter().any(|(row_id, row)| {
            *row_id != id && row.subscription_name == subscription.subscription_name
        }) {
            return Err(StoreError::UniqueViolation(subscription.subscription_name));
        }

        subscription.subscription_id = id;
        subscription.statistics = None;
        records.rows.insert(id, subscription);

        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.0.write().rows.remove(&id).is_some())
    }
}
