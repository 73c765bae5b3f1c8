//! # Command Context
//!
//! Everything a command needs, built once from flags, environment and
//! the checkout config file.

use crate::cli::Cli;
use crate::config::CliConfig;
use pay_core::{
    load_session, BoxedPaymentGateway, CheckoutWorkflow, FileSessionStore, PaymentResult,
    PollConfig, Session,
};
use pay_mpesa::{
    ApiClient, ApiConfig, AuthClient, CatalogClient, MpesaGateway, OrdersClient, TicketsClient,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub store: FileSessionStore,
    pub poll_config: PollConfig,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = CliConfig::load(cli.config.as_deref())?;
        let poll_config = config.poll_config()?;

        let mut api_config = ApiConfig::from_env()?;
        if let Some(url) = &cli.api_url {
            api_config = api_config.with_api_base_url(url.as_str());
        }

        let store = FileSessionStore::new(config.session_file(cli.session_file.clone()));

        tracing::debug!(
            api = %api_config.api_base_url,
            session_file = %store.path().display(),
            ?poll_config,
            "Context ready"
        );

        Ok(Self {
            api: ApiClient::new(api_config)?,
            store,
            poll_config,
        })
    }

    /// Stored session, or `Unauthenticated`
    pub fn session(&self) -> PaymentResult<Session> {
        load_session(&self.store)
    }

    pub fn gateway(&self) -> BoxedPaymentGateway {
        Arc::new(MpesaGateway::new(self.api.clone()))
    }

    pub fn workflow(&self) -> CheckoutWorkflow {
        CheckoutWorkflow::new(self.gateway()).with_poll_config(self.poll_config)
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(self.api.clone())
    }

    pub fn tickets(&self) -> TicketsClient {
        TicketsClient::new(self.api.clone())
    }

    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::new(self.api.clone())
    }
}
