//! # Payment Gateway Trait
//!
//! The seam between the checkout workflow and whatever backend speaks the
//! push-payment protocol. The workflow only ever sees this trait, so tests
//! drive it with scripted in-memory gateways and the CLI plugs in the HTTP
//! client from `pay-mpesa`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentGateway (trait)                     │
//! │  ├── initiate()      POST  push-payment request             │
//! │  ├── status()        GET   status by handle                 │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!  ┌───────┴───────┐                   ┌───────┴───────┐
//!  │ MpesaGateway  │                   │  test doubles │
//!  └───────────────┘                   └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::payment::{InitiatedPayment, PaymentHandle, PaymentRequest, PaymentStatus};
use crate::session::Credential;
use async_trait::async_trait;
use std::sync::Arc;

/// Backend for initiating push payments and querying their status.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a push-payment request.
    ///
    /// # Arguments
    /// * `request` - The validated, normalized request
    /// * `credential` - Bearer credential of the paying user
    ///
    /// # Returns
    /// The handle to poll, with status `Pending`.
    async fn initiate(
        &self,
        request: &PaymentRequest,
        credential: &Credential,
    ) -> PaymentResult<InitiatedPayment>;

    /// Query the current status of a payment attempt.
    async fn status(&self, handle: &PaymentHandle) -> PaymentResult<PaymentStatus>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
