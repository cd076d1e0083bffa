#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("subscription name `{0}` already exists")]
    UniqueViolation(String),

    #[error("invalid sort field `{0}`")]
    InvalidSortField(String),

    #[error("subscription record is not a json object")]
    RecordNotObject,

    #[cfg(feature = "pg")]
    #[error("sqlx `{0}`")]
    Sqlx(#[from] sqlx::Error),

    #[error("serde_json `{0}`")]
    SerdeJson(#[from] serde_json::Error),

    #[error("{0}")]
    Any(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
