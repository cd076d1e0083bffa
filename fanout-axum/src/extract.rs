use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::envelope::ApiError;

/// Header naming the principal behind a request.
pub const OPERATOR_HEADER: &str = "bk_user";

pub const DEFAULT_OPERATOR: &str = "admin";

/// JSON body whose rejection renders as a `json_unmarshal_failed` envelope.
#[derive(Debug, Clone)]
pub struct Body<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Body<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Json(rejection.body_text())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_OPERATOR);

        Ok(Self(operator.to_owned()))
    }
}
