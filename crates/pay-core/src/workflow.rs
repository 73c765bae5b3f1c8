//! # Checkout Workflow
//!
//! Ties the pieces together: submit a push-payment request through a
//! [`PaymentGateway`](crate::gateway::PaymentGateway), then poll its status until a terminal outcome.

use crate::error::{PaymentError, PaymentResult};
use crate::gateway::BoxedPaymentGateway;
use crate::payment::{InitiatedPayment, PaymentHandle, PaymentRequest};
use crate::poll::{begin_polling, PollConfig, PollSession, PollState, PollUpdate};
use crate::session::Credential;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Final result of a confirmed checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub handle: PaymentHandle,
    pub account_reference: String,
}

/// Push-payment checkout against one gateway
#[derive(Clone)]
pub struct CheckoutWorkflow {
    gateway: BoxedPaymentGateway,
    poll_config: PollConfig,
}

impl CheckoutWorkflow {
    pub fn new(gateway: BoxedPaymentGateway) -> Self {
        Self {
            gateway,
            poll_config: PollConfig::default(),
        }
    }

    pub fn with_poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    pub fn poll_config(&self) -> PollConfig {
        self.poll_config
    }

    /// Submit the request; no polling.
    ///
    /// Never retried: a second submission would prompt the payer twice.
    #[instrument(skip(self, request, credential), fields(
        provider = self.gateway.provider_name(),
        subject = %request.account_reference(),
        amount = %request.amount(),
    ))]
    pub async fn submit_payment(
        &self,
        request: &PaymentRequest,
        credential: &Credential,
    ) -> PaymentResult<InitiatedPayment> {
        match self.gateway.initiate(request, credential).await {
            Ok(initiated) => {
                info!(handle = %initiated.handle, "Payment initiated, waiting for payer");
                Ok(initiated)
            }
            Err(e) => {
                error!("Payment initiation failed: {}", e);
                Err(e)
            }
        }
    }

    /// Start polling an already-initiated payment
    pub fn begin_polling<F>(&self, handle: PaymentHandle, on_update: F) -> PollSession
    where
        F: Fn(PollUpdate) + Send + Sync + 'static,
    {
        begin_polling(
            Arc::clone(&self.gateway),
            handle,
            self.poll_config,
            on_update,
        )
    }

    /// Submit, then start polling the returned handle.
    pub async fn checkout<F>(
        &self,
        request: &PaymentRequest,
        credential: &Credential,
        on_update: F,
    ) -> PaymentResult<PollSession>
    where
        F: Fn(PollUpdate) + Send + Sync + 'static,
    {
        let initiated = self.submit_payment(request, credential).await?;
        Ok(self.begin_polling(initiated.handle, on_update))
    }

    /// Run a checkout to its end and turn the terminal state into a result.
    pub async fn confirm<F>(
        &self,
        request: &PaymentRequest,
        credential: &Credential,
        on_update: F,
    ) -> PaymentResult<CheckoutReceipt>
    where
        F: Fn(PollUpdate) + Send + Sync + 'static,
    {
        let session = self.checkout(request, credential, on_update).await?;
        let handle = session.handle().clone();
        let state = session.wait().await;
        settle(
            state,
            handle,
            request.account_reference(),
            self.poll_config,
        )
    }
}

impl std::fmt::Debug for CheckoutWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutWorkflow")
            .field("provider", &self.gateway.provider_name())
            .field("poll_config", &self.poll_config)
            .finish()
    }
}

/// Map a terminal poll state onto the checkout outcome
pub fn settle(
    state: PollState,
    handle: PaymentHandle,
    account_reference: String,
    config: PollConfig,
) -> PaymentResult<CheckoutReceipt> {
    match state {
        PollState::Completed => Ok(CheckoutReceipt {
            handle,
            account_reference,
        }),
        PollState::Failed => Err(PaymentError::PaymentDeclined {
            handle: handle.to_string(),
        }),
        PollState::TimedOut => Err(PaymentError::PollingTimedOut {
            handle: handle.to_string(),
            elapsed_secs: config.budget.as_secs(),
        }),
        PollState::Cancelled => Err(PaymentError::Cancelled),
        PollState::Idle | PollState::Polling => Err(PaymentError::Configuration(format!(
            "poll session for {} ended while still {:?}",
            handle, state
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::PaymentGateway;
    use crate::payment::{PaymentStatus, SubjectType};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FixedGateway {
        initiate: Mutex<Option<PaymentResult<InitiatedPayment>>>,
        status: PaymentStatus,
        initiations: AtomicU32,
    }

    impl FixedGateway {
        fn new(initiate: PaymentResult<InitiatedPayment>, status: PaymentStatus) -> Arc<Self> {
            Arc::new(Self {
                initiate: Mutex::new(Some(initiate)),
                status,
                initiations: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl PaymentGateway for FixedGateway {
        async fn initiate(
            &self,
            _request: &PaymentRequest,
            _credential: &Credential,
        ) -> PaymentResult<InitiatedPayment> {
            self.initiations.fetch_add(1, Ordering::SeqCst);
            self.initiate
                .lock()
                .unwrap()
                .take()
                .expect("initiate called more than once")
        }

        async fn status(&self, _handle: &PaymentHandle) -> PaymentResult<PaymentStatus> {
            Ok(self.status)
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn request() -> PaymentRequest {
        PaymentRequest::new("0712345678", dec!(2500), SubjectType::Exhibition, "9", "7").unwrap()
    }

    fn credential() -> Credential {
        Credential::new("tok").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_completed() {
        let gateway = FixedGateway::new(
            Ok(InitiatedPayment::pending(PaymentHandle::new("ws_1"))),
            PaymentStatus::Completed,
        );
        let workflow = CheckoutWorkflow::new(gateway.clone());

        let receipt = workflow.confirm(&request(), &credential(), |_| {}).await.unwrap();

        assert_eq!(receipt.handle, PaymentHandle::new("ws_1"));
        assert_eq!(receipt.account_reference, "exhibition-9");
        assert_eq!(gateway.initiations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_declined() {
        let gateway = FixedGateway::new(
            Ok(InitiatedPayment::pending(PaymentHandle::new("ws_2"))),
            PaymentStatus::Failed,
        );
        let workflow = CheckoutWorkflow::new(gateway);

        let err = workflow.confirm(&request(), &credential(), |_| {}).await.unwrap_err();
        assert!(matches!(err, PaymentError::PaymentDeclined { ref handle } if handle == "ws_2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_times_out() {
        let gateway = FixedGateway::new(
            Ok(InitiatedPayment::pending(PaymentHandle::new("ws_3"))),
            PaymentStatus::Pending,
        );
        let config = PollConfig::from_secs(5, 20).unwrap();
        let workflow = CheckoutWorkflow::new(gateway).with_poll_config(config);

        let err = workflow.confirm(&request(), &credential(), |_| {}).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::PollingTimedOut { elapsed_secs: 20, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_initiation_starts_no_polling() {
        let gateway = FixedGateway::new(
            Err(PaymentError::ServerRejected {
                status: 400,
                message: "Invalid phone".into(),
            }),
            PaymentStatus::Completed,
        );
        let workflow = CheckoutWorkflow::new(gateway.clone());

        let updates = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&updates);
        let result = workflow
            .checkout(&request(), &credential(), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(matches!(result, Err(PaymentError::ServerRejected { .. })));
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_settle_cancelled() {
        let result = settle(
            PollState::Cancelled,
            PaymentHandle::new("ws_4"),
            "artwork-1".into(),
            PollConfig::default(),
        );
        assert!(matches!(result, Err(PaymentError::Cancelled)));
    }
}
