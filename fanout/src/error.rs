use fanout_cache::CacheError;
use fanout_store::StoreError;
use parse_display::Display;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::{index::IndexError, publisher::PublishError};

/// Stable, machine readable identifier of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Success,
    JsonUnmarshalFailed,
    ParamsInvalid,
    DuplicateItem,
    SubscriptionNotFound,
    SubscribeInsertFailed,
    SubscribeDeleteFailed,
    SubscribeUpdateFailed,
    SubscribeSelectFailed,
    PingFailed,
    TelnetFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum Operation {
    Subscribe,
    Unsubscribe,
    Rebook,
    Query,
}

impl Operation {
    pub fn failed_code(&self) -> ErrorCode {
        match self {
            Operation::Subscribe => ErrorCode::SubscribeInsertFailed,
            Operation::Unsubscribe => ErrorCode::SubscribeDeleteFailed,
            Operation::Rebook => ErrorCode::SubscribeUpdateFailed,
            Operation::Query => ErrorCode::SubscribeSelectFailed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("subscription name `{0}` already exists")]
    DuplicateItem(String),

    #[error("subscription `{0}` not found")]
    NotFound(i64),

    #[error("{op} failed: {source}")]
    Store {
        op: Operation,
        #[source]
        source: StoreError,
    },

    /// The record is durable but the fan-out index no longer matches it.
    #[error("{op} of subscription `{id}` persisted, {source}")]
    Index {
        op: Operation,
        id: i64,
        #[source]
        source: IndexError,
    },

    #[error("{op} of subscription `{id}`: delivery state failed: {source}")]
    State {
        op: Operation,
        id: i64,
        #[source]
        source: CacheError,
    },

    #[error("{op} of subscription `{id}`: notification failed: {source}")]
    Notify {
        op: Operation,
        id: i64,
        #[source]
        source: PublishError,
    },
}

impl RegistryError {
    /// Wraps a store failure, turning a unique violation into a duplicate name.
    pub fn store(op: Operation, err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(name) => RegistryError::DuplicateItem(name),
            source => RegistryError::Store { op, source },
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::Validation(_) => ErrorCode::ParamsInvalid,
            RegistryError::DuplicateItem(_) => ErrorCode::DuplicateItem,
            RegistryError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            RegistryError::Store { op, source } => match source {
                StoreError::InvalidSortField(_) => ErrorCode::ParamsInvalid,
                _ => op.failed_code(),
            },
            RegistryError::Index { op, .. }
            | RegistryError::State { op, .. }
            | RegistryError::Notify { op, .. } => op.failed_code(),
        }
    }

    /// Whether the caller sent something wrong, as opposed to a backend failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::ParamsInvalid | ErrorCode::DuplicateItem | ErrorCode::SubscriptionNotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
