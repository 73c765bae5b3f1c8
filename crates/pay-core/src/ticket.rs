//! # Exhibition Tickets
//!
//! An exhibition checkout books slots and the backend issues a ticket code
//! for the booking. Tickets are listed per customer or, for staff, all at once.

use crate::payment::PaymentStatus;
use crate::serde_ext::string_or_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One exhibition booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,

    #[serde(default)]
    pub user_name: String,

    #[serde(deserialize_with = "string_or_number")]
    pub exhibition_id: String,

    #[serde(default)]
    pub exhibition_title: String,

    #[serde(default)]
    pub exhibition_image_url: Option<String>,

    /// `TKT-XXXXXXXX`; absent until the backend issues it
    #[serde(default)]
    pub ticket_code: Option<String>,

    #[serde(default = "default_slots")]
    pub slots: u32,

    #[serde(default)]
    pub booking_date: String,

    /// Payment status of the booking
    #[serde(default)]
    pub status: PaymentStatus,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

fn default_slots() -> u32 {
    1
}

impl Ticket {
    /// Paid for and carrying a code
    pub fn is_valid(&self) -> bool {
        self.status == PaymentStatus::Completed && self.ticket_code.is_some()
    }
}

/// `{ "tickets": [...] }` envelope; a missing key means no tickets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketList {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}
