use serde_json::{Map, Value};

use crate::{
    engine::Engine,
    error::Result,
    query::{Condition, FindArgs, SortKey},
    subscription::Subscription,
};

const ID_FIELD: &str = "subscription_id";
const NAME_FIELD: &str = "subscription_name";

#[derive(Clone)]
pub struct Store {
    pub(crate) engine: Box<dyn Engine>,
}

impl Store {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub async fn count(&self, condition: &Condition) -> Result<u64> {
        self.engine.count(condition).await
    }

    pub async fn count_by_name(&self, name: impl Into<String>) -> Result<u64> {
        let mut condition = Condition::new();
        condition.insert(NAME_FIELD.to_owned(), Value::String(name.into()));

        self.engine.count(&condition).await
    }

    pub async fn insert(&self, subscription: Subscription) -> Result<i64> {
        self.engine.insert(subscription).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Subscription>> {
        let mut condition = Condition::new();
        condition.insert(ID_FIELD.to_owned(), Value::from(id));

        let subscriptions = self.engine.find(&condition, &[], 0, Some(1)).await?;

        Ok(subscriptions.into_iter().next())
    }

    /// Reads a page of records; a non-empty `fields` list projects every record
    /// down to those fields, `subscription_id` always included.
    pub async fn find(&self, args: &FindArgs) -> Result<Vec<Subscription>> {
        let sort = SortKey::parse_all(&args.page.sort)?;
        let subscriptions = self
            .engine
            .find(&args.condition, &sort, args.page.skip(), args.page.limit())
            .await?;

        if args.fields.is_empty() {
            return Ok(subscriptions);
        }

        subscriptions
            .into_iter()
            .map(|subscription| project(subscription, &args.fields))
            .collect()
    }

    pub async fn update(&self, id: i64, subscription: Subscription) -> Result<bool> {
        self.engine.update(id, subscription).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.engine.delete(id).await
    }
}

fn project(subscription: Subscription, fields: &[String]) -> Result<Subscription> {
    let Value::Object(mut object) = serde_json::to_value(subscription)? else {
        return Ok(Subscription::default());
    };

    let mut projected = Map::new();

    for field in fields.iter().map(String::as_str).chain([ID_FIELD]) {
        if let Some(value) = object.remove(field) {
            projected.insert(field.to_owned(), value);
        }
    }

    Ok(serde_json::from_value(Value::Object(projected))?)
}
