//! # Tickets
//!
//! Exhibition tickets issued for bookings: every ticket (staff only) or the
//! signed-in customer's own.

use crate::client::ApiClient;
use pay_core::{Credential, PaymentResult, Ticket, TicketList};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct TicketsClient {
    client: ApiClient,
}

impl TicketsClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All tickets (staff credential required, otherwise `Forbidden`)
    #[instrument(skip(self, credential))]
    pub async fn all_tickets(&self, credential: &Credential) -> PaymentResult<Vec<Ticket>> {
        let url = self.client.config().url("/tickets");
        let list: TicketList = self.client.get_json(&url, Some(credential), "tickets").await?;

        debug!(count = list.tickets.len(), "Fetched all tickets");
        Ok(list.tickets)
    }

    #[instrument(skip(self, credential))]
    pub async fn user_tickets(
        &self,
        user_id: &str,
        credential: &Credential,
    ) -> PaymentResult<Vec<Ticket>> {
        let url = self.client.config().url(&format!("/tickets/user/{}", user_id));
        let list: TicketList = self
            .client
            .get_json(&url, Some(credential), "user tickets")
            .await?;

        debug!(count = list.tickets.len(), "Fetched user tickets");
        Ok(list.tickets)
    }
}
