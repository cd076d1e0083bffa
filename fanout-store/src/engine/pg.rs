use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    query::{Condition, SortKey},
    subscription::Subscription,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    prefix: Option<String>,
}

impl PgStore {
    pub fn new(pool: &PgPool) -> Self {
        Self {
            pool: pool.clone(),
            prefix: None,
        }
    }

    pub fn with_prefix(pool: &PgPool, prefix: impl Into<String>) -> Self {
        Self {
            pool: pool.clone(),
            prefix: Some(prefix.into()),
        }
    }

    pub fn table(&self, name: impl Into<String>) -> String {
        format!(
            "{}_{}",
            self.prefix.as_deref().unwrap_or("fo"),
            name.into()
        )
    }

    pub fn table_subscriptions(&self) -> String {
        self.table("subscription")
    }

    /// Creates the subscription table; `subscription_name` carries the unique
    /// constraint the registry relies on to close its check-then-insert race.
    pub async fn migrate(&self) -> Result<()> {
        let table = self.table_subscriptions();

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                subscription_id BIGSERIAL PRIMARY KEY,
                subscription_name TEXT NOT NULL UNIQUE,
                data JSONB NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn unique_violation(err: sqlx::Error, name: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::UniqueViolation(name.to_owned())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Engine for PgStore {
    async fn count(&self, condition: &Condition) -> Result<u64> {
        let table = self.table_subscriptions();
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {table} WHERE data @> $1"
        ))
        .bind(Value::Object(condition.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn insert(&self, mut subscription: Subscription) -> Result<i64> {
        let table = self.table_subscriptions();
        let name = subscription.subscription_name.to_owned();
        subscription.statistics = None;

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(&format!(
            "INSERT INTO {table} (subscription_name, data) VALUES ($1, $2) RETURNING subscription_id"
        ))
        .bind(&name)
        .bind(serde_json::to_value(&subscription)?)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| unique_violation(err, &name))?;

        sqlx::query(&format!(
            r#"
            UPDATE {table}
            SET data = jsonb_set(data, '{{subscription_id}}', to_jsonb(subscription_id))
            WHERE subscription_id = $1
            "#
        ))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(id)
    }

    async fn find(
        &self,
        condition: &Condition,
        sort: &[SortKey],
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Subscription>> {
        let table = self.table_subscriptions();

        let mut order = sort
            .iter()
            .map(|key| {
                let direction = if key.descending { "DESC" } else { "ASC" };
                format!("data->'{}' {direction}", key.field)
            })
            .collect::<Vec<_>>();
        order.push("subscription_id ASC".to_owned());

        let mut sql = format!(
            "SELECT data FROM {table} WHERE data @> $1 ORDER BY {} OFFSET {skip}",
            order.join(", ")
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Value::Object(condition.clone()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|data| Ok(serde_json::from_value(data)?))
            .collect()
    }

    async fn update(&self, id: i64, mut subscription: Subscription) -> Result<bool> {
        let table = self.table_subscriptions();
        let name = subscription.subscription_name.to_owned();
        subscription.subscription_id = id;
        subscription.statistics = None;

        let res = sqlx::query(&format!(
            "UPDATE {table} SET subscription_name = $1, data = $2 WHERE subscription_id = $3"
        ))
        .bind(&name)
        .bind(serde_json::to_value(&subscription)?)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| unique_violation(err, &name))?;

        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let table = self.table_subscriptions();
        let res = sqlx::query(&format!("DELETE FROM {table} WHERE subscription_id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}
