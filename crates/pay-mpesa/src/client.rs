//! # API Client
//!
//! Thin JSON-over-HTTP layer shared by every AfriArt endpoint client.
//! It owns the `reqwest::Client`, attaches the bearer credential and turns
//! transport failures and error bodies into [`PaymentError`]s:
//!
//! | response                 | error                 |
//! |--------------------------|-----------------------|
//! | request exceeded timeout | `Timeout`             |
//! | connect/DNS/reset        | `Unreachable`         |
//! | 401                      | `Unauthenticated`     |
//! | 403                      | `Forbidden`           |
//! | 400, 422                 | `ValidationFailed`    |
//! | 404                      | `NotFound`            |
//! | any other non-2xx        | `ServerRejected`      |

use crate::config::ApiConfig;
use pay_core::{Credential, PaymentError, PaymentResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Shared HTTP client for the AfriArt API
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> PaymentResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, http })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET` an absolute URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: Option<&Credential>,
        resource: &str,
    ) -> PaymentResult<T> {
        let request = self.authorize(self.http.get(url), credential);
        self.execute(request, resource).await
    }

    /// `POST` a JSON body to an absolute URL and decode the JSON reply
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        credential: Option<&Credential>,
        resource: &str,
    ) -> PaymentResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorize(self.http.post(url).json(body), credential);
        self.execute(request, resource).await
    }

    fn authorize(&self, request: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
        match credential {
            Some(credential) => request.header("Authorization", credential.bearer()),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> PaymentResult<T> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            error!("AfriArt API error: status={}, body={}", status, body);
            return Err(classify(status, &body, resource));
        }

        debug!(%status, resource, "AfriArt API response");

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse {} response: {}", resource, e))
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> PaymentError {
        if e.is_timeout() {
            PaymentError::Timeout {
                timeout_secs: self.config.request_timeout.as_secs(),
            }
        } else {
            PaymentError::Unreachable(e.to_string())
        }
    }
}

// =============================================================================
// Error bodies
// =============================================================================

/// `{ "error": "..." }` or `{ "message": "..." }`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn text(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.trim().is_empty())
    }
}

/// Map a non-success status and its body to an error
pub(crate) fn classify(status: StatusCode, body: &str, resource: &str) -> PaymentError {
    let message = ErrorBody::parse(body)
        .text()
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        StatusCode::UNAUTHORIZED => PaymentError::Unauthenticated(message),
        StatusCode::FORBIDDEN => PaymentError::Forbidden(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PaymentError::ValidationFailed(message)
        }
        StatusCode::NOT_FOUND => PaymentError::NotFound {
            resource: resource.to_string(),
        },
        _ => PaymentError::ServerRejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn test_classify() {
        let err = classify(StatusCode::UNAUTHORIZED, r#"{"error":"Token expired"}"#, "orders");
        assert!(matches!(err, PaymentError::Unauthenticated(ref m) if m == "Token expired"));

        let err = classify(StatusCode::FORBIDDEN, "", "orders");
        assert!(matches!(err, PaymentError::Forbidden(ref m) if m.contains("403")));

        let err = classify(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"bad phone"}"#, "x");
        assert!(matches!(err, PaymentError::ValidationFailed(ref m) if m == "bad phone"));

        let err = classify(StatusCode::NOT_FOUND, "", "artwork 9");
        assert!(matches!(err, PaymentError::NotFound { ref resource } if resource == "artwork 9"));

        let err = classify(StatusCode::BAD_GATEWAY, "<html>", "x");
        assert!(matches!(err, PaymentError::ServerRejected { status: 502, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_get_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = Credential::new("tok").unwrap();
        let pong: Pong = client
            .get_json(&client.config().url("/ping"), Some(&credential), "ping")
            .await
            .unwrap();

        assert!(pong.ok);
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = ApiConfig::new(server.uri()).with_request_timeout(Duration::from_millis(200));
        let client = ApiClient::new(config).unwrap();
        let result: PaymentResult<Pong> =
            client.get_json(&client.config().url("/slow"), None, "slow").await;

        assert!(matches!(result, Err(PaymentError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_unreachable() {
        // Nothing listens on the discard port
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
        let result: PaymentResult<Pong> =
            client.get_json(&client.config().url("/ping"), None, "ping").await;

        assert!(matches!(result, Err(PaymentError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: PaymentResult<Pong> =
            client.get_json(&client.config().url("/ping"), None, "ping").await;

        assert!(matches!(result, Err(PaymentError::Serialization(_))));
    }
}
