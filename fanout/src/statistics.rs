use fanout_cache::{keys, Cache, CacheError};
use fanout_store::Statistics;

/// Reads the delivery counters a worker keeps per subscriber.
#[derive(Clone)]
pub struct StatisticsReader {
    cache: Box<dyn Cache>,
}

impl StatisticsReader {
    pub fn new(cache: Box<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Missing or unparsable counters read as zero.
    pub async fn read(&self, subscription_id: i64) -> Result<Statistics, CacheError> {
        let values = self
            .cache
            .hgetall(&keys::callback_count(subscription_id))
            .await?;

        let counter = |field: &str| {
            values
                .get(field)
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        Ok(Statistics {
            total: counter(keys::COUNT_TOTAL_FIELD),
            failure: counter(keys::COUNT_FAILURE_FIELD),
        })
    }
}
