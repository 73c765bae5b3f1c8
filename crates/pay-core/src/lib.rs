//! # pay-core
//!
//! Core types and traits for the afriart-pay checkout client.
//!
//! This crate provides:
//! - `PaymentGateway` trait for backends that speak the push-payment protocol
//! - `PaymentRequest`, `PaymentHandle` and `PaymentStatus` for a checkout attempt
//! - `begin_polling` / `PollSession`, the status-confirmation loop
//! - `CheckoutWorkflow`, submit-then-poll in one place
//! - `SessionStore` for the persisted credential and identity
//! - `OrderSummary`, `Ticket`, `Artwork`, `Exhibition` and display helpers
//! - `PaymentError` for typed error handling
//!
//! The poll engine and workflow need tokio and live behind the default
//! `runtime` feature; the rest builds for `wasm32`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CheckoutWorkflow, PaymentRequest, PollUpdate, SubjectType};
//! use rust_decimal_macros::dec;
//!
//! let request = PaymentRequest::new("0712345678", dec!(1500), SubjectType::Artwork, "42", &user_id)?;
//! let workflow = CheckoutWorkflow::new(gateway);
//!
//! let session = workflow.checkout(&request, &credential, |update| match update {
//!     PollUpdate::StillPending { tick } => println!("waiting ({tick})"),
//!     PollUpdate::Success => println!("paid"),
//!     PollUpdate::Failure => println!("declined"),
//!     PollUpdate::TimedOut => println!("no answer"),
//! }).await?;
//!
//! // Dropping or cancelling the session stops polling
//! let state = session.wait().await;
//! ```

pub mod catalog;
pub mod error;
pub mod format;
pub mod gateway;
pub mod order;
pub mod payment;
pub mod phone;
#[cfg(feature = "runtime")]
pub mod poll;
pub mod serde_ext;
pub mod session;
pub mod ticket;
#[cfg(feature = "runtime")]
pub mod workflow;

// Re-exports for convenience
pub use catalog::{
    Artwork, ArtworkList, ArtworkStatus, Exhibition, ExhibitionList, ExhibitionStatus,
    Purchasable,
};
pub use error::{PaymentError, PaymentResult};
pub use format::{format_currency, format_date, image_url, status_label};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use order::{OrderList, OrderSummary, OrdersReport};
pub use payment::{
    validate_amount, InitiatedPayment, PaymentHandle, PaymentRequest, PaymentStatus, SubjectType,
};
pub use phone::normalize_phone_number;
#[cfg(feature = "runtime")]
pub use poll::{begin_polling, PollConfig, PollSession, PollState, PollUpdate};
pub use session::{
    clear_session, is_authenticated, load_session, store_session, Credential, FileSessionStore,
    Identity, MemorySessionStore, Session, SessionStore,
};
pub use ticket::{Ticket, TicketList};
#[cfg(feature = "runtime")]
pub use workflow::{CheckoutReceipt, CheckoutWorkflow};
