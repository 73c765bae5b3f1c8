//! # pay-mpesa
//!
//! HTTP clients for the AfriArt gallery API, with M-Pesa STK push as the
//! payment gateway.
//!
//! - **MpesaGateway** - `PaymentGateway` for push payments
//!   - `POST /mpesa/stkpush` prompts the payer's phone
//!   - `GET /mpesa/status/{id}` reports pending, completed or failed
//! - **AuthClient** - customer sign-up, customer and staff login
//! - **OrdersClient** - order listings
//! - **TicketsClient** - exhibition tickets
//! - **CatalogClient** - artworks and exhibitions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_mpesa::MpesaGateway;
//! use pay_core::CheckoutWorkflow;
//! use std::sync::Arc;
//!
//! // Create gateway from environment
//! let gateway = Arc::new(MpesaGateway::from_env()?);
//! let workflow = CheckoutWorkflow::new(gateway);
//!
//! let receipt = workflow.confirm(&request, &session.credential, |update| {
//!     println!("{:?}", update);
//! }).await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod gateway;
pub mod orders;
pub mod tickets;

// Re-exports
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use gateway::MpesaGateway;
pub use orders::OrdersClient;
pub use tickets::TicketsClient;
