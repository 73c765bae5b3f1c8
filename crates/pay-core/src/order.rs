//! # Order Types
//!
//! Orders as returned by the backend once a checkout has been recorded,
//! plus the aggregated view the gallery staff dashboard shows.

use crate::payment::{PaymentStatus, SubjectType};
use crate::serde_ext::string_or_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of an order listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,

    #[serde(default)]
    pub user_name: String,

    /// Artwork or exhibition id the order is for
    #[serde(deserialize_with = "string_or_number")]
    pub reference_id: String,

    /// Artwork or exhibition title (denormalized for display)
    #[serde(default)]
    pub item_title: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(rename = "type")]
    pub order_type: SubjectType,

    #[serde(default)]
    pub created_at: String,
}

impl OrderSummary {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

/// `{ "orders": [...] }` envelope; a missing key means no orders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<OrderSummary>,
}

/// Aggregated view over a set of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrdersReport {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    /// Sum of completed order amounts
    pub completed_revenue: Decimal,
}

impl OrdersReport {
    pub fn from_orders(orders: &[OrderSummary]) -> Self {
        let mut report = Self {
            total: orders.len(),
            ..Self::default()
        };

        for order in orders {
            *report
                .by_type
                .entry(order.order_type.as_str().to_string())
                .or_default() += 1;
            *report
                .by_status
                .entry(order.payment_status.as_str().to_string())
                .or_default() += 1;
            if order.is_paid() {
                report.completed_revenue += order.amount;
            }
        }

        report
    }

    pub fn count_for_status(&self, status: PaymentStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn count_for_type(&self, subject_type: SubjectType) -> usize {
        self.by_type.get(subject_type.as_str()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LISTING: &str = r#"{
        "orders": [
            {"id": 1, "user_id": 7, "user_name": "Wanjiru", "reference_id": 42,
             "item_title": "Maasai Dawn", "amount": 15000, "payment_status": "completed",
             "type": "artwork", "created_at": "2025-01-05 14:30:00"},
            {"id": 2, "user_id": 8, "user_name": "Otieno", "reference_id": 3,
             "item_title": "Nairobi Lights", "amount": 1500.5, "payment_status": "pending",
             "type": "exhibition", "created_at": "2025-01-06T09:00:00Z"},
            {"id": "3", "user_id": "7", "user_name": "Wanjiru", "reference_id": "9",
             "item_title": "Rift Valley", "amount": 2500, "payment_status": "completed",
             "type": "exhibition", "created_at": "2025-01-07 10:00:00"}
        ]
    }"#;

    #[test]
    fn test_parse_listing() {
        let list: OrderList = serde_json::from_str(LISTING).unwrap();
        assert_eq!(list.orders.len(), 3);

        let first = &list.orders[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.reference_id, "42");
        assert_eq!(first.amount, dec!(15000));
        assert_eq!(first.order_type, SubjectType::Artwork);
        assert!(first.is_paid());

        assert_eq!(list.orders[1].amount, dec!(1500.5));
    }

    #[test]
    fn test_missing_orders_key_is_empty() {
        let list: OrderList = serde_json::from_str("{}").unwrap();
        assert!(list.orders.is_empty());
    }

    #[test]
    fn test_report() {
        let list: OrderList = serde_json::from_str(LISTING).unwrap();
        let report = OrdersReport::from_orders(&list.orders);

        assert_eq!(report.total, 3);
        assert_eq!(report.count_for_type(SubjectType::Exhibition), 2);
        assert_eq!(report.count_for_status(PaymentStatus::Completed), 2);
        assert_eq!(report.count_for_status(PaymentStatus::Failed), 0);
        assert_eq!(report.completed_revenue, dec!(17500));
    }
}
