//! # Orders
//!
//! Order listings: every order (staff only) or the signed-in customer's own.

use crate::client::ApiClient;
use pay_core::{Credential, OrderList, OrderSummary, PaymentResult};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct OrdersClient {
    client: ApiClient,
}

impl OrdersClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All orders (staff credential required, otherwise `Forbidden`)
    #[instrument(skip(self, credential))]
    pub async fn all_orders(&self, credential: &Credential) -> PaymentResult<Vec<OrderSummary>> {
        let url = self.client.config().url("/orders");
        let list: OrderList = self.client.get_json(&url, Some(credential), "orders").await?;

        debug!(count = list.orders.len(), "Fetched all orders");
        Ok(list.orders)
    }

    /// Orders placed by one customer
    #[instrument(skip(self, credential))]
    pub async fn user_orders(
        &self,
        user_id: &str,
        credential: &Credential,
    ) -> PaymentResult<Vec<OrderSummary>> {
        let url = self.client.config().url(&format!("/users/{}/orders", user_id));
        let list: OrderList = self
            .client
            .get_json(&url, Some(credential), "user orders")
            .await?;

        debug!(count = list.orders.len(), "Fetched user orders");
        Ok(list.orders)
    }
}
