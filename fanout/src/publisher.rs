use fanout_cache::{keys, Cache, CacheError};
use fanout_store::Subscription;
use parse_display::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("unknown change kind in `{0}`")]
    UnknownKind(String),

    #[error("serde_json `{0}`")]
    SerdeJson(#[from] serde_json::Error),

    #[error("{0}")]
    Cache(#[from] CacheError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl ChangeKind {
    const ALL: [ChangeKind; 3] = [ChangeKind::Create, ChangeKind::Update, ChangeKind::Delete];
}

/// A `"<kind><json>"` message of the process channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeNotification {
    pub kind: ChangeKind,
    pub subscription: Subscription,
}

impl ChangeNotification {
    pub fn encode(kind: ChangeKind, subscription: &Subscription) -> Result<String, PublishError> {
        Ok(format!("{kind}{}", serde_json::to_string(subscription)?))
    }

    pub fn parse(message: &str) -> Result<Self, PublishError> {
        for kind in ChangeKind::ALL {
            if let Some(json) = message.strip_prefix(kind.to_string().as_str()) {
                return Ok(Self {
                    kind,
                    subscription: serde_json::from_str(json)?,
                });
            }
        }

        Err(PublishError::UnknownKind(message.chars().take(16).collect()))
    }
}

/// Broadcasts registry mutations on the process channel.
///
/// Delivery to listeners is best effort. Messages from one publisher (and its
/// clones) leave in the order `publish` was called.
#[derive(Clone)]
pub struct Publisher {
    cache: Box<dyn Cache>,
    channel: String,
    order: Arc<Mutex<()>>,
}

impl Publisher {
    pub fn new(cache: Box<dyn Cache>) -> Self {
        Self {
            cache,
            channel: keys::PROCESS_CHANNEL.to_owned(),
            order: Arc::default(),
        }
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub async fn publish(
        &self,
        kind: ChangeKind,
        subscription: &Subscription,
    ) -> Result<u64, PublishError> {
        let message = ChangeNotification::encode(kind, subscription)?;

        let _order = self.order.lock().await;
        let receivers = self.cache.publish(&self.channel, &message).await?;

        debug!(
            "published {kind} of subscription {} to {receivers} listeners",
            subscription.subscription_id
        );

        Ok(receivers)
    }
}
