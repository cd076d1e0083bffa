use axum::{
    extract::{Path, State},
    routing::{post, put},
    Router,
};
use fanout::{FindArgs, PingResult, Prober, Registry, SearchResult, Subscription};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extract::{Body, Operator},
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub prober: Prober,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCreated {
    pub subscription_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PingInput {
    pub callback_url: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelnetInput {
    pub callback_url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/subscribe/search", post(search))
        .route("/subscribe/ping", post(ping))
        .route("/subscribe/telnet", post(telnet))
        .route("/subscribe/:subscribe_id", put(rebook).delete(unsubscribe))
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Json(format!("invalid subscription id `{raw}`")))
}

async fn subscribe(
    State(state): State<AppState>,
    Operator(operator): Operator,
    Body(input): Body<Subscription>,
) -> ApiResult<SubscriptionCreated> {
    let subscription_id = state.registry.subscribe(&operator, input).await?;

    Ok(Envelope::success(SubscriptionCreated { subscription_id }))
}

async fn unsubscribe(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&raw)?;
    state.registry.unsubscribe(id).await?;

    Ok(Envelope::empty())
}

async fn rebook(
    State(state): State<AppState>,
    Operator(operator): Operator,
    Path(raw): Path<String>,
    Body(input): Body<Subscription>,
) -> ApiResult<()> {
    let id = parse_id(&raw)?;
    state.registry.rebook(&operator, id, input).await?;

    Ok(Envelope::empty())
}

async fn search(
    State(state): State<AppState>,
    Body(input): Body<FindArgs>,
) -> ApiResult<SearchResult> {
    info!("select subscription");
    let result = state.registry.query(&input).await?;

    Ok(Envelope::success(result))
}

async fn ping(State(state): State<AppState>, Body(input): Body<PingInput>) -> ApiResult<PingResult> {
    let result = state.prober.ping(&input.callback_url, input.data).await?;

    Ok(Envelope::success(result))
}

async fn telnet(State(state): State<AppState>, Body(input): Body<TelnetInput>) -> ApiResult<()> {
    state.prober.telnet(&input.callback_url).await?;

    Ok(Envelope::empty())
}
