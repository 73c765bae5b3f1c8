//! # M-Pesa Push Payments
//!
//! [`PaymentGateway`] over the AfriArt backend's M-Pesa routes: one `POST`
//! that triggers the STK push prompt on the payer's phone, and a `GET` per
//! poll tick for the transaction status.

use crate::client::{ApiClient, ErrorBody};
use crate::config::ApiConfig;
use async_trait::async_trait;
use pay_core::{
    Credential, InitiatedPayment, PaymentError, PaymentGateway, PaymentHandle, PaymentRequest,
    PaymentResult, PaymentStatus, SubjectType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// M-Pesa STK push gateway
#[derive(Debug, Clone)]
pub struct MpesaGateway {
    client: ApiClient,
}

impl MpesaGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Ok(Self::new(ApiClient::from_env()?))
    }

    pub fn with_config(config: ApiConfig) -> PaymentResult<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }
}

#[async_trait]
impl PaymentGateway for MpesaGateway {
    #[instrument(skip(self, request, credential), fields(reference = %request.account_reference()))]
    async fn initiate(
        &self,
        request: &PaymentRequest,
        credential: &Credential,
    ) -> PaymentResult<InitiatedPayment> {
        let body = StkPushRequest::from(request);
        let url = self.client.config().initiate_url();

        debug!(amount = %request.amount(), "Sending STK push request");

        let response: StkPushResponse = self
            .client
            .post_json(&url, &body, Some(credential), "payment initiation")
            .await?;

        let handle = response.into_handle()?;
        info!(handle = %handle, "STK push accepted");

        Ok(InitiatedPayment::pending(handle))
    }

    #[instrument(skip(self))]
    async fn status(&self, handle: &PaymentHandle) -> PaymentResult<PaymentStatus> {
        let url = self.client.config().status_url(handle);
        let response: StatusResponse = self
            .client
            .get_json(&url, None, &format!("transaction {}", handle))
            .await?;

        response.into_status(handle)
    }

    fn provider_name(&self) -> &'static str {
        "mpesa"
    }
}

// =============================================================================
// M-Pesa API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StkPushRequest<'a> {
    phone_number: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    order_type: SubjectType,
    /// Required by the STK push route; same value as `reference_id`
    order_id: &'a str,
    reference_id: &'a str,
    user_id: &'a str,
    account_reference: String,
}

impl<'a> From<&'a PaymentRequest> for StkPushRequest<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        Self {
            phone_number: request.payer_contact(),
            amount: request.amount(),
            order_type: request.subject_type(),
            order_id: request.subject_id(),
            reference_id: request.subject_id(),
            user_id: request.initiator_user_id(),
            account_reference: request.account_reference(),
        }
    }
}

/// Either `{ success, stk: { checkout_request_id } }` (order routes) or a
/// flat `{ success, checkout_request_id }` (bare STK route)
#[derive(Debug, Deserialize)]
struct StkPushResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    stk: Option<StkResult>,
    #[serde(default, alias = "CheckoutRequestID")]
    checkout_request_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StkResult {
    #[serde(default, alias = "CheckoutRequestID")]
    checkout_request_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl StkPushResponse {
    fn into_handle(self) -> PaymentResult<PaymentHandle> {
        let nested_error = self.stk.as_ref().and_then(|stk| stk.error.clone());
        let handle = self
            .stk
            .and_then(|stk| stk.checkout_request_id)
            .or(self.checkout_request_id)
            .filter(|id| !id.trim().is_empty());

        match (self.success, handle) {
            (Some(false), _) | (_, None) => Err(PaymentError::ServerRejected {
                status: 200,
                message: self
                    .error
                    .or(nested_error)
                    .or(self.message)
                    .unwrap_or_else(|| "Payment initiation failed".to_string()),
            }),
            (_, Some(id)) => Ok(PaymentHandle::new(id)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result_desc: Option<String>,
    #[serde(flatten)]
    error: ErrorBody,
}

impl StatusResponse {
    fn into_status(self, handle: &PaymentHandle) -> PaymentResult<PaymentStatus> {
        match self.status {
            Some(status) => {
                let status: PaymentStatus =
                    status.parse().map_err(|_| PaymentError::ServerRejected {
                        status: 200,
                        message: format!("Unknown payment status: {}", status),
                    })?;
                debug!(%status, result_desc = ?self.result_desc, "Transaction status");
                Ok(status)
            }
            None => {
                let message = self
                    .error
                    .text()
                    .unwrap_or_else(|| "Status response has no status".to_string());
                if message.to_ascii_lowercase().contains("not found") {
                    Err(PaymentError::NotFound {
                        resource: format!("transaction {}", handle),
                    })
                } else {
                    Err(PaymentError::ServerRejected {
                        status: 200,
                        message,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> MpesaGateway {
        MpesaGateway::with_config(ApiConfig::new(server.uri())).unwrap()
    }

    fn request() -> PaymentRequest {
        PaymentRequest::new("0712345678", dec!(1500), SubjectType::Artwork, "42", "7").unwrap()
    }

    #[tokio::test]
    async fn test_initiate_sends_normalized_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(json!({
                "phoneNumber": "254712345678",
                "amount": 1500.0,
                "orderType": "artwork",
                "orderId": "42",
                "referenceId": "42",
                "userId": "7",
                "accountReference": "artwork-42"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "stk": {"checkout_request_id": "ws_20250105143000_42"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let initiated = gateway_for(&server)
            .initiate(&request(), &Credential::new("tok").unwrap())
            .await
            .unwrap();

        assert_eq!(initiated.handle.as_str(), "ws_20250105143000_42");
        assert_eq!(initiated.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_initiate_flat_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "checkout_request_id": "ws_flat"
            })))
            .mount(&server)
            .await;

        let initiated = gateway_for(&server)
            .initiate(&request(), &Credential::new("tok").unwrap())
            .await
            .unwrap();

        assert_eq!(initiated.handle, PaymentHandle::new("ws_flat"));
    }

    #[tokio::test]
    async fn test_initiate_success_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Artwork already sold"
            })))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .initiate(&request(), &Credential::new("tok").unwrap())
            .await
            .unwrap_err();

        assert!(
            matches!(err, PaymentError::ServerRejected { ref message, .. } if message == "Artwork already sold")
        );
    }

    #[tokio::test]
    async fn test_initiate_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .initiate(&request(), &Credential::new("stale").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mpesa/status/ws_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "checkout_request_id": "ws_1",
                "status": "completed",
                "result_code": 0,
                "result_desc": "The service request is processed successfully."
            })))
            .mount(&server)
            .await;

        let status = gateway_for(&server)
            .status(&PaymentHandle::new("ws_1"))
            .await
            .unwrap();

        assert_eq!(status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_status_not_found_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "Transaction not found"})),
            )
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .status(&PaymentHandle::new("ws_missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::NotFound { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_status_unknown_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "refunded"})))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .status(&PaymentHandle::new("ws_2"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PaymentError::ServerRejected { status: 200, ref message } if message.contains("refunded")
        ));
        assert!(!err.is_transient());
    }
}
