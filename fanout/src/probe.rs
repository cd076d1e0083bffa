use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::{io, time::Duration};
use tokio::{net::TcpStream, time::timeout};
use tracing::{error, info};

use crate::{config::RegistryConfig, error::ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("connect to `{address}` failed: {source}")]
    ConnectFailed {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("request to `{url}` failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http client `{0}`")]
    Client(#[from] reqwest::Error),
}

impl ProbeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProbeError::InvalidAddress(_) => ErrorCode::ParamsInvalid,
            ProbeError::ConnectFailed { .. } => ErrorCode::TelnetFailed,
            ProbeError::Request { .. } | ProbeError::Client(_) => ErrorCode::PingFailed,
        }
    }
}

/// What a callback endpoint answered; any status counts as an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub http_status: u16,
    pub response_body: String,
}

/// One-shot reachability checks against callback endpoints.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, ProbeError> {
        Self::new(config.probe_timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POSTs `body` to `url`. A malformed url is an invalid address, otherwise
    /// only transport failures are errors.
    pub async fn ping(&self, url: &str, body: impl Into<String>) -> Result<PingResult, ProbeError> {
        let body = body.into();
        info!("requesting callback: {url}, {body}");

        let target = Url::parse(url.trim())
            .ok()
            .filter(|target| matches!(target.scheme(), "http" | "https") && target.has_host())
            .ok_or_else(|| ProbeError::InvalidAddress(url.to_owned()))?;

        let res = self
            .client
            .post(target)
            .body(body)
            .send()
            .await
            .map_err(|source| {
                error!("ping callback {url} failed: {source}");

                if source.is_builder() {
                    return ProbeError::InvalidAddress(url.to_owned());
                }

                ProbeError::Request {
                    url: url.to_owned(),
                    source,
                }
            })?;

        let http_status = res.status().as_u16();
        let response_body = match res.text().await {
            Ok(body) => body,
            Err(err) => {
                error!("read callback {url} response failed: {err}");
                String::new()
            }
        };

        Ok(PingResult {
            http_status,
            response_body,
        })
    }

    /// Opens then closes a TCP connection, returns the dialed `host:port`.
    pub async fn telnet(&self, address: &str) -> Result<String, ProbeError> {
        let dial = dial_address(address)?;
        info!("telnet {dial}");

        let connected = match timeout(self.timeout, TcpStream::connect(dial.as_str())).await {
            Ok(connected) => connected,
            Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "connect timed out")),
        };

        match connected {
            Ok(stream) => {
                drop(stream);
                Ok(dial)
            }
            Err(source) => {
                error!("telnet callback {dial} failed: {source}");
                Err(ProbeError::ConnectFailed {
                    address: dial,
                    source,
                })
            }
        }
    }
}

/// Turns a callback url, or a bare `host:port`, into a dialable `host:port`.
///
/// `http` and `https` urls without a port get their well known one.
pub fn dial_address(address: &str) -> Result<String, ProbeError> {
    let address = address.trim();
    let invalid = || ProbeError::InvalidAddress(address.to_owned());

    let url = if address.contains("://") {
        Url::parse(address)
    } else {
        Url::parse(&format!("tcp://{address}"))
    }
    .map_err(|_| invalid())?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(invalid)?;
    let port = url.port_or_known_default().ok_or_else(invalid)?;

    Ok(format!("{host}:{port}"))
}
