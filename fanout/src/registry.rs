use chrono::Utc;
use fanout_cache::Cache;
use fanout_store::{ConfirmMode, FindArgs, Store, Subscription};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use validator::Validate;

use crate::{
    config::RegistryConfig,
    diff::diff,
    error::{Operation, RegistryError, Result},
    index::FanoutIndex,
    publisher::{ChangeKind, Publisher},
    statistics::StatisticsReader,
};

/// Total number of matching records plus the requested page of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub count: u64,
    pub info: Vec<Subscription>,
}

/// Owns the subscription lifecycle and keeps the fan-out index in step with it.
///
/// Each mutation runs as persist, then index, then notify. Nothing is rolled
/// back: once the store accepted a change, later failures are reported with
/// the record left in place, and every step can be replayed safely.
#[derive(Clone)]
pub struct Registry {
    store: Store,
    index: FanoutIndex,
    publisher: Publisher,
    statistics: StatisticsReader,
    config: RegistryConfig,
}

impl Registry {
    pub fn new<C: Cache + 'static>(store: Store, cache: C) -> Self {
        let cache: Box<dyn Cache> = Box::new(cache);

        Self {
            store,
            index: FanoutIndex::new(cache.clone()),
            publisher: Publisher::new(cache.clone()),
            statistics: StatisticsReader::new(cache),
            config: RegistryConfig::default(),
        }
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn publisher(mut self, publisher: Publisher) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn settings(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn index(&self) -> &FanoutIndex {
        &self.index
    }

    pub async fn subscribe(&self, operator: &str, mut subscription: Subscription) -> Result<i64> {
        let op = Operation::Subscribe;

        subscription.subscription_id = 0;
        self.normalize(operator, &mut subscription);
        subscription.validate()?;

        self.ensure_unique_name(op, &subscription.subscription_name)
            .await?;

        let id = self
            .store
            .insert(subscription.clone())
            .await
            .map_err(|err| {
                error!("create subscription failed: {err}");
                RegistryError::store(op, err)
            })?;
        subscription.subscription_id = id;

        let changes = diff::<String, String>(&[], &subscription.event_types());
        self.index.apply(id, &changes).await.map_err(|source| {
            error!("index subscription {id} failed: {source}");
            RegistryError::Index { op, id, source }
        })?;

        // A reused id must not inherit counters of a deleted subscriber.
        self.index
            .clear_statistics(id)
            .await
            .map_err(|source| RegistryError::State { op, id, source })?;

        self.publisher
            .publish(ChangeKind::Create, &subscription)
            .await
            .map_err(|source| RegistryError::Notify { op, id, source })?;

        info!(
            "subscription {id} `{}` created by {operator}",
            subscription.subscription_name
        );

        Ok(id)
    }

    /// Deletes the record first; index and delivery state cleanup then runs
    /// to the end even when a step fails, and the first failure is returned.
    pub async fn unsubscribe(&self, id: i64) -> Result<Subscription> {
        let op = Operation::Unsubscribe;
        let subscription = self.load(op, id).await?;

        let deleted = self.store.delete(id).await.map_err(|err| {
            error!("delete subscription {id} failed: {err}");
            RegistryError::store(op, err)
        })?;

        if !deleted {
            return Err(RegistryError::NotFound(id));
        }

        let mut failure = None;

        if let Err(source) = self.index.detach(id, &subscription.event_types()).await {
            failure = Some(RegistryError::Index { op, id, source });
        }

        if let Err(source) = self.index.purge_subscriber(id).await {
            error!("purge delivery state of subscription {id} failed: {source}");
            failure = failure.or(Some(RegistryError::State { op, id, source }));
        }

        if let Err(source) = self
            .publisher
            .publish(ChangeKind::Delete, &subscription)
            .await
        {
            error!("notify delete of subscription {id} failed: {source}");
            failure = failure.or(Some(RegistryError::Notify { op, id, source }));
        }

        match failure {
            Some(err) => Err(err),
            None => {
                info!("subscription {id} deleted");
                Ok(subscription)
            }
        }
    }

    /// Replaces subscription `id` in place, keeping its id. Only event types
    /// entering or leaving the form touch the index.
    pub async fn rebook(
        &self,
        operator: &str,
        id: i64,
        mut subscription: Subscription,
    ) -> Result<Subscription> {
        let op = Operation::Rebook;
        info!("update subscription {id}");

        let current = self.load(op, id).await?;

        subscription.subscription_id = current.subscription_id;
        self.normalize(operator, &mut subscription);
        subscription.validate()?;

        if current.subscription_name != subscription.subscription_name {
            self.ensure_unique_name(op, &subscription.subscription_name)
                .await?;
        }

        let updated = self
            .store
            .update(id, subscription.clone())
            .await
            .map_err(|err| {
                error!("update subscription {id} failed: {err}");
                RegistryError::store(op, err)
            })?;

        if !updated {
            return Err(RegistryError::NotFound(id));
        }

        let changes = diff(&current.event_types(), &subscription.event_types());
        self.index.apply(id, &changes).await.map_err(|source| {
            error!("reindex subscription {id} failed: {source}");
            RegistryError::Index { op, id, source }
        })?;

        self.publisher
            .publish(ChangeKind::Update, &subscription)
            .await
            .map_err(|source| RegistryError::Notify { op, id, source })?;

        Ok(subscription)
    }

    /// Reads a page of subscriptions with their delivery statistics attached.
    pub async fn query(&self, args: &FindArgs) -> Result<SearchResult> {
        let op = Operation::Query;
        debug!("selector: {:?}", args.condition);

        let count = self.store.count(&args.condition).await.map_err(|err| {
            error!("count subscriptions failed: {err}");
            RegistryError::store(op, err)
        })?;

        let mut info = self.store.find(args).await.map_err(|err| {
            error!("select subscriptions failed: {err}");
            RegistryError::store(op, err)
        })?;

        for subscription in info.iter_mut() {
            let id = subscription.subscription_id;
            let statistics = self
                .statistics
                .read(id)
                .await
                .map_err(|source| RegistryError::State { op, id, source })?;

            subscription.statistics = Some(statistics);
        }

        Ok(SearchResult { count, info })
    }

    async fn load(&self, op: Operation, id: i64) -> Result<Subscription> {
        let subscription = self.store.get(id).await.map_err(|err| {
            error!("get subscription {id} failed: {err}");
            RegistryError::store(op, err)
        })?;

        subscription.ok_or(RegistryError::NotFound(id))
    }

    /// Fast path for a friendly error; the store's unique constraint is what
    /// actually holds when two requests race on the same name.
    async fn ensure_unique_name(&self, op: Operation, name: &str) -> Result<()> {
        let count = self
            .store
            .count_by_name(name)
            .await
            .map_err(|err| RegistryError::store(op, err))?;

        if count > 0 {
            error!("duplicate subscription name `{name}`");
            return Err(RegistryError::DuplicateItem(name.to_owned()));
        }

        Ok(())
    }

    fn normalize(&self, operator: &str, subscription: &mut Subscription) {
        if subscription.time_out <= 0 {
            subscription.time_out = self.config.default_time_out;
        }

        if subscription.confirm_mode == ConfirmMode::HttpStatus
            && subscription.confirm_pattern.is_empty()
        {
            subscription.confirm_pattern = self.config.default_confirm_pattern.to_owned();
        }

        subscription.subscription_form = normalize_form(&subscription.subscription_form);
        subscription.operator = operator.to_owned();
        subscription.last_time = Some(Utc::now());
        subscription.statistics = None;
    }
}

/// Strips every whitespace character from a subscription form.
pub fn normalize_form(form: &str) -> String {
    form.chars().filter(|c| !c.is_whitespace()).collect()
}
