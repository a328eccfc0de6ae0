// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP plumbing between the client and the Authik API.
//!
//! [`Transport`] is the single seam through which the client talks to the
//! backend: one request in, a raw status + body out. [`HttpTransport`] is the
//! production implementation; tests substitute a mock.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, ConfigError, SecretKey};
use crate::error::{ApiError, Error, TransportError};

/// Header identifying this SDK and its version to the backend.
pub const SDK_USER_AGENT_HEADER: &str = "X-Authik-Sdk-User-Agent";

/// Value sent in [`SDK_USER_AGENT_HEADER`].
pub const SDK_USER_AGENT: &str = concat!("authik-rust/", env!("CARGO_PKG_VERSION"));

/// Raw backend response: status plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as `T`, or as an [`ApiError`] when the status is not
    /// 2xx.
    ///
    /// A body that fails to decode is a transport error in both cases.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.status.is_success() {
            let api_error: ApiError =
                serde_json::from_slice(&self.body).map_err(TransportError::from)?;
            return Err(Error::Api(api_error));
        }
        let value = serde_json::from_slice(&self.body).map_err(TransportError::from)?;
        Ok(value)
    }
}

/// Executes authenticated requests against the Authik API.
///
/// Implementations add credentials and SDK headers themselves; callers only
/// supply the method, the API path and an optional JSON body.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_url: Url,
    secret_key: SecretKey,
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            secret_key: config.secret_key.clone(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        endpoint_url(&self.api_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(path);
        debug!(%method, %url, "Sending Authik API request");

        let mut request = self
            .http
            .request(method, &url)
            .header(
                "Authorization",
                format!("Bearer {}", self.secret_key.expose()),
            )
            .header("Content-Type", "application/json")
            .header(SDK_USER_AGENT_HEADER, SDK_USER_AGENT);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(%url, status = status.as_u16(), bytes = body.len(), "Authik API responded");
        Ok(RawResponse { status, body })
    }
}

/// Join the API base URL and a request path.
fn endpoint_url(api_url: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let base = Url::parse("https://api.authik.com").unwrap();
        assert_eq!(endpoint_url(&base, "/jwks"), "https://api.authik.com/jwks");

        let prefixed = Url::parse("http://localhost:4000/v1/").unwrap();
        assert_eq!(
            endpoint_url(&prefixed, "/users/user_1"),
            "http://localhost:4000/v1/users/user_1"
        );
    }

    #[test]
    fn user_agent_carries_crate_version() {
        assert!(SDK_USER_AGENT.starts_with("authik-rust/"));
        assert!(SDK_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn decode_success_body() {
        let raw = RawResponse::new(StatusCode::OK, r#"{"ok":true}"#);
        assert_eq!(raw.decode::<Ping>().unwrap(), Ping { ok: true });
    }

    #[test]
    fn decode_error_body_into_api_error() {
        let raw = RawResponse::new(
            StatusCode::NOT_FOUND,
            r#"{"resource":"users","type":"api_error","code":"not_found","message":"no user"}"#,
        );
        match raw.decode::<Ping>() {
            Err(Error::Api(api)) => {
                assert_eq!(api.resource, "users");
                assert_eq!(api.code, "not_found");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_error_body_is_decode_failure() {
        let raw = RawResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(
            raw.decode::<Ping>(),
            Err(Error::Transport(TransportError::Decode(_)))
        ));
    }

    #[test]
    fn malformed_success_body_is_decode_failure() {
        let raw = RawResponse::new(StatusCode::OK, r#"{"ok":"yes"}"#);
        assert!(matches!(
            raw.decode::<Ping>(),
            Err(Error::Transport(TransportError::Decode(_)))
        ));
    }

    mod http {
        use super::*;
        use axum::{
            http::HeaderMap,
            routing::{get, post},
            Json, Router,
        };
        use serde_json::{json, Value};
        use std::net::SocketAddr;
        use tokio::net::TcpListener;

        const SECRET: &str = "authik_sk_test_http";

        fn header(headers: &HeaderMap, name: &str) -> Value {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map_or(Value::Null, |v| json!(v))
        }

        async fn echo_headers(headers: HeaderMap) -> Json<Value> {
            Json(json!({
                "authorization": header(&headers, "authorization"),
                "content_type": header(&headers, "content-type"),
                "sdk": header(&headers, SDK_USER_AGENT_HEADER),
            }))
        }

        async fn echo_body(body: String) -> String {
            body
        }

        async fn rate_limited() -> (StatusCode, &'static str) {
            (
                StatusCode::TOO_MANY_REQUESTS,
                r#"{"resource":"jwks","type":"api_error","code":"rate_limited","message":"slow down"}"#,
            )
        }

        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }

        async fn serve() -> SocketAddr {
            let app = Router::new()
                .route("/headers", get(echo_headers))
                .route("/echo", post(echo_body))
                .route("/limited", get(rate_limited))
                .route("/slow", get(slow));
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            addr
        }

        fn transport(addr: SocketAddr, timeout: Duration) -> HttpTransport {
            let config = ClientConfig::new(SECRET)
                .unwrap()
                .with_api_url(&format!("http://{addr}"))
                .unwrap()
                .with_timeout(timeout);
            HttpTransport::new(&config).unwrap()
        }

        #[tokio::test]
        async fn sends_credentials_and_sdk_headers() {
            let addr = serve().await;
            let raw = transport(addr, Duration::from_secs(5))
                .request(Method::GET, "/headers", None)
                .await
                .unwrap();
            assert_eq!(raw.status, StatusCode::OK);

            let seen: Value = serde_json::from_slice(&raw.body).unwrap();
            assert_eq!(seen["authorization"], format!("Bearer {SECRET}"));
            assert_eq!(seen["content_type"], "application/json");
            assert_eq!(seen["sdk"], SDK_USER_AGENT);
        }

        #[tokio::test]
        async fn sends_request_body() {
            let addr = serve().await;
            let raw = transport(addr, Duration::from_secs(5))
                .request(Method::POST, "/echo", Some(br#"{"a":1}"#.to_vec()))
                .await
                .unwrap();
            assert_eq!(raw.body, br#"{"a":1}"#.to_vec());
        }

        #[tokio::test]
        async fn error_status_and_body_pass_through() {
            let addr = serve().await;
            let raw = transport(addr, Duration::from_secs(5))
                .request(Method::GET, "/limited", None)
                .await
                .unwrap();
            assert_eq!(raw.status, StatusCode::TOO_MANY_REQUESTS);

            match raw.decode::<Value>() {
                Err(Error::Api(api)) => assert_eq!(api.code, "rate_limited"),
                other => panic!("expected API error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn slow_backend_times_out() {
            let addr = serve().await;
            let result = transport(addr, Duration::from_millis(200))
                .request(Method::GET, "/slow", None)
                .await;
            match result {
                Err(e @ TransportError::Http(_)) => assert!(e.is_timeout()),
                other => panic!("expected HTTP timeout, got {other:?}"),
            }
        }
    }

    #[test]
    fn http_transport_builds_from_config() {
        let config = ClientConfig::new("authik_sk_test_123").unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.endpoint("/jwks"), "https://api.authik.com/jwks");
    }
}
