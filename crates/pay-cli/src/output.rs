//! # Terminal Output
//!
//! Row rendering and user-facing messages. Everything here returns
//! strings so the handlers stay thin and the wording is testable.

use pay_core::{
    format_currency, format_date, image_url, status_label, Artwork, Exhibition, OrderSummary,
    OrdersReport, PaymentError, PaymentStatus, PollUpdate, SubjectType, Ticket,
};

/// Progress line for a poll update
pub fn poll_update_line(update: PollUpdate) -> String {
    match update {
        PollUpdate::StillPending { tick } => {
            format!("   ⏳ Waiting for M-Pesa confirmation (check {})", tick)
        }
        PollUpdate::Success => "✅ Payment completed".to_string(),
        PollUpdate::Failure => "❌ Payment failed".to_string(),
        PollUpdate::TimedOut => "⌛ No confirmation received in time".to_string(),
    }
}

pub fn order_header() -> String {
    format!(
        "{:<6} {:<20} {:<11} {:<28} {:>16} {:<10}",
        "ID", "DATE", "TYPE", "ITEM", "AMOUNT", "STATUS"
    )
}

pub fn order_row(order: &OrderSummary) -> String {
    format!(
        "{:<6} {:<20} {:<11} {:<28} {:>16} {:<10}",
        order.id,
        format_date(&order.created_at),
        order.order_type,
        truncate(&order.item_title, 28),
        format_currency(order.amount),
        status_label(order.payment_status.as_str()),
    )
}

pub fn ticket_header() -> String {
    format!(
        "{:<6} {:<14} {:<28} {:>5} {:>16} {:<10}",
        "ID", "CODE", "EXHIBITION", "SLOTS", "TOTAL", "STATUS"
    )
}

pub fn ticket_row(ticket: &Ticket) -> String {
    format!(
        "{:<6} {:<14} {:<28} {:>5} {:>16} {:<10}",
        ticket.id,
        ticket.ticket_code.as_deref().unwrap_or("-"),
        truncate(&ticket.exhibition_title, 28),
        ticket.slots,
        format_currency(ticket.total_amount),
        status_label(ticket.status.as_str()),
    )
}

pub fn report_lines(report: &OrdersReport) -> Vec<String> {
    vec![
        format!("Orders:      {}", report.total),
        format!(
            "Artworks:    {}   Exhibitions: {}",
            report.count_for_type(SubjectType::Artwork),
            report.count_for_type(SubjectType::Exhibition)
        ),
        format!(
            "Completed:   {}   Pending: {}   Failed: {}",
            report.count_for_status(PaymentStatus::Completed),
            report.count_for_status(PaymentStatus::Pending),
            report.count_for_status(PaymentStatus::Failed)
        ),
        format!("Revenue:     {}", format_currency(report.completed_revenue)),
    ]
}

pub fn artwork_row(artwork: &Artwork) -> String {
    let status = if artwork.is_available() { "" } else { " [sold]" };
    format!(
        "{:<6} {} by {} · {}{}\n       {}",
        artwork.id,
        artwork.title,
        if artwork.artist.is_empty() { "unknown" } else { artwork.artist.as_str() },
        format_currency(artwork.price),
        status,
        image_url(artwork.image_url.as_deref()),
    )
}

pub fn exhibition_row(exhibition: &Exhibition) -> String {
    format!(
        "{:<6} {} @ {} · {} · {}/{} slots\n       {} to {}",
        exhibition.id,
        exhibition.title,
        exhibition.location,
        format_currency(exhibition.ticket_price),
        exhibition.available_slots,
        exhibition.total_slots,
        format_date(&exhibition.start_date),
        format_date(&exhibition.end_date),
    )
}

/// Message shown to the user for a failed command
pub fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PaymentError>() {
        Some(payment_error) => user_message(payment_error),
        None => format!("Error: {:#}", err),
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PaymentError>()
        .map(PaymentError::exit_code)
        .unwrap_or(1)
}

pub fn user_message(err: &PaymentError) -> String {
    match err {
        PaymentError::Unauthenticated(_) => {
            "Please login to complete your purchase (afriart-pay login).".to_string()
        }
        PaymentError::Forbidden(_) => "That needs a gallery staff account.".to_string(),
        PaymentError::ValidationFailed(message) => format!("Invalid input: {}", message),
        PaymentError::Unreachable(_) => {
            "Could not reach the AfriArt server. Check your connection and try again.".to_string()
        }
        PaymentError::Timeout { timeout_secs } => format!(
            "The AfriArt server did not answer within {}s. Please try again.",
            timeout_secs
        ),
        PaymentError::ServerRejected { message, .. } => {
            format!("Payment processing failed: {}", message)
        }
        PaymentError::NotFound { resource } => format!("Not found: {}", resource),
        PaymentError::PaymentDeclined { .. } => {
            "Your payment attempt failed. Please try again.".to_string()
        }
        PaymentError::PollingTimedOut { handle, .. } => format!(
            "Payment verification timed out. If you completed the payment, it will show in \
             `afriart-pay orders` shortly (ref {}).",
            handle
        ),
        PaymentError::Cancelled => "Stopped waiting for payment confirmation.".to_string(),
        other => format!("Error: {}", other),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order() -> OrderSummary {
        OrderSummary {
            id: "12".into(),
            user_id: "7".into(),
            user_name: "Wanjiru".into(),
            reference_id: "42".into(),
            item_title: "A Very Long Artwork Title That Keeps Going".into(),
            amount: dec!(15000),
            payment_status: PaymentStatus::Completed,
            order_type: SubjectType::Artwork,
            created_at: "2025-01-05 14:30:00".into(),
        }
    }

    #[test]
    fn test_order_row() {
        let row = order_row(&order());
        assert!(row.starts_with("12 "));
        assert!(row.contains("Jan 5, 2025, 14:30"));
        assert!(row.contains("KES 15,000"));
        assert!(row.contains("Completed"));
        assert!(row.contains('…'));
    }

    #[test]
    fn test_ticket_row() {
        let ticket = Ticket {
            id: "3".into(),
            user_id: "7".into(),
            user_name: "Wanjiru".into(),
            exhibition_id: "9".into(),
            exhibition_title: "Colours of the Rift".into(),
            exhibition_image_url: None,
            ticket_code: None,
            slots: 2,
            booking_date: "2025-02-01 10:00:00".into(),
            status: PaymentStatus::Pending,
            total_amount: dec!(5000),
        };

        let row = ticket_row(&ticket);
        assert!(row.starts_with("3 "));
        assert!(row.contains(" - "));
        assert!(row.contains("Colours of the Rift"));
        assert!(row.contains("KES 5,000"));
        assert!(row.contains("Pending"));
    }

    #[test]
    fn test_report_lines() {
        let report = OrdersReport::from_orders(&[order()]);
        let lines = report_lines(&report);
        assert_eq!(lines[0], "Orders:      1");
        assert_eq!(lines[3], "Revenue:     KES 15,000");
    }

    #[test]
    fn test_error_messages_and_codes() {
        let err = anyhow::Error::new(PaymentError::Unauthenticated("no token".into()));
        assert_eq!(exit_code(&err), 3);
        assert!(describe(&err).contains("login"));

        let err = anyhow::Error::new(PaymentError::PaymentDeclined {
            handle: "ws_1".into(),
        })
        .context("checkout");
        assert_eq!(exit_code(&err), 6);

        let err = anyhow::anyhow!("disk full");
        assert_eq!(exit_code(&err), 1);
        assert_eq!(describe(&err), "Error: disk full");
    }

    #[test]
    fn test_poll_update_line() {
        assert!(poll_update_line(PollUpdate::StillPending { tick: 3 }).contains("check 3"));
        assert_eq!(poll_update_line(PollUpdate::Success), "✅ Payment completed");
    }
}
