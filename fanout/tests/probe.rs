use axum::{http::StatusCode, routing::post, Router};
use fanout::{
    dial_address, ConfigBuilder, ErrorCode, ProbeError, Prober, RegistryConfig,
    DEFAULT_PROBE_TIMEOUT,
};
use std::time::Duration;
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn prober() -> Prober {
    Prober::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn ping_returns_any_status() {
    let app = Router::new().route(
        "/callback",
        post(|| async { (StatusCode::IM_A_TEAPOT, "teapot") }),
    );
    let base = serve(app).await;

    let res = prober()
        .ping(&format!("{base}/callback"), r#"{"event":"hostcreate"}"#)
        .await
        .unwrap();

    assert_eq!(res.http_status, 418);
    assert_eq!(res.response_body, "teapot");
}

#[tokio::test]
async fn ping_echoes_body() {
    let app = Router::new().route("/callback", post(|body: String| async move { body }));
    let base = serve(app).await;

    let res = prober()
        .ping(&format!("{base}/callback"), "hello")
        .await
        .unwrap();

    assert_eq!(res.http_status, 200);
    assert_eq!(res.response_body, "hello");
}

#[tokio::test]
async fn ping_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = prober()
        .ping(&format!("http://{addr}/callback"), "")
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Request { .. }));
    assert_eq!(err.code(), ErrorCode::PingFailed);
}

#[tokio::test]
async fn ping_malformed_url() {
    for url in ["not a url", "ftp://example.com/cb", "http://", ""] {
        let err = prober().ping(url, "").await.unwrap_err();

        assert!(matches!(err, ProbeError::InvalidAddress(_)), "{url}: {err}");
        assert_eq!(err.code(), ErrorCode::ParamsInvalid);
    }
}

#[test]
fn prober_from_config() {
    let config = ConfigBuilder::new()
        .probe_timeout(Duration::from_millis(1500))
        .build();

    let prober = Prober::from_config(&config).unwrap();
    assert_eq!(prober.timeout(), Duration::from_millis(1500));

    let prober = Prober::from_config(&RegistryConfig::default()).unwrap();
    assert_eq!(prober.timeout(), DEFAULT_PROBE_TIMEOUT);
}

#[tokio::test]
async fn telnet_open_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dialed = prober()
        .telnet(&format!("http://{addr}/callback"))
        .await
        .unwrap();

    assert_eq!(dialed, addr.to_string());
}

#[tokio::test]
async fn telnet_closed_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = prober().telnet(&addr.to_string()).await.unwrap_err();

    assert!(matches!(err, ProbeError::ConnectFailed { .. }));
    assert_eq!(err.code(), ErrorCode::TelnetFailed);
}

#[tokio::test]
async fn telnet_malformed_address() {
    let err = prober().telnet("http://exa mple.com").await.unwrap_err();

    assert!(matches!(err, ProbeError::InvalidAddress(_)));
    assert_eq!(err.code(), ErrorCode::ParamsInvalid);
}

#[test]
fn dial_addresses() {
    assert_eq!(dial_address("http://example.com/cb").unwrap(), "example.com:80");
    assert_eq!(dial_address("https://example.com").unwrap(), "example.com:443");
    assert_eq!(dial_address("http://10.0.0.1:8080/cb?x=1").unwrap(), "10.0.0.1:8080");
    assert_eq!(dial_address(" 127.0.0.1:9000 ").unwrap(), "127.0.0.1:9000");
    assert_eq!(dial_address("http://[::1]:81").unwrap(), "[::1]:81");

    assert!(matches!(dial_address("localhost"), Err(ProbeError::InvalidAddress(_))));
    assert!(matches!(dial_address(""), Err(ProbeError::InvalidAddress(_))));
    assert!(matches!(dial_address("http://"), Err(ProbeError::InvalidAddress(_))));
}
