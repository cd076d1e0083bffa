use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fanout::{ErrorCode, ProbeError, RegistryError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of every response, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub result: bool,
    pub code: ErrorCode,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            result: true,
            code: ErrorCode::Success,
            message: "success".to_owned(),
            data: Some(data),
        }
    }

    pub fn empty() -> Self {
        Self {
            result: true,
            code: ErrorCode::Success,
            message: "success".to_owned(),
            data: None,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            result: false,
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Json(String),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Probe(#[from] ProbeError),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Json(_) => ErrorCode::JsonUnmarshalFailed,
            ApiError::Registry(err) => err.code(),
            ApiError::Probe(err) => err.code(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::JsonUnmarshalFailed | ErrorCode::ParamsInvalid | ErrorCode::DuplicateItem => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PingFailed | ErrorCode::TelnetFailed => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("{self}");
        }

        (
            status,
            Json(Envelope::<()>::failure(self.code(), self.to_string())),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;
