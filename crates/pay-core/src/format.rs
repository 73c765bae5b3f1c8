//! # Display Formatting
//!
//! Helpers shared by the terminal and browser front ends so both render
//! prices, timestamps and images the same way.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_CODE: &str = "KES";

/// Shown when an image is missing or points at a dev server
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

const DISPLAY_DATE_TIME: &str = "%b %-d, %Y, %H:%M";
const DISPLAY_DATE: &str = "%b %-d, %Y";

/// `KES 1,500`, `KES 1,500.5`, `KES 12,000.75`
///
/// At most two fraction digits, trailing zeros dropped.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{} {}{}.{}", CURRENCY_CODE, sign, grouped, fraction),
        None => format!("{} {}{}", CURRENCY_CODE, sign, grouped),
    }
}

/// `2025-01-05 14:30:00` or RFC 3339 to `Jan 5, 2025, 14:30`.
///
/// Timestamps keep their own offset. Unparseable input comes back
/// unchanged; empty input becomes `N/A`.
pub fn format_date(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "N/A".to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(DISPLAY_DATE_TIME).to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format(DISPLAY_DATE_TIME).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(DISPLAY_DATE).to_string();
    }

    input.to_string()
}

/// Resolve an image reference for display.
pub fn image_url(url: Option<&str>) -> String {
    let url = match url.map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return PLACEHOLDER_IMAGE.to_string(),
    };

    if url.contains("localhost") || url.contains("127.0.0.1") {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if url.starts_with("http") || url.starts_with("data:") {
        return url.to_string();
    }
    if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    }
}

/// Badge label for an order's payment status; unknown values pass through
pub fn status_label(status: &str) -> String {
    match status.trim().to_ascii_lowercase().as_str() {
        "completed" => "Completed".to_string(),
        "pending" => "Pending".to_string(),
        "failed" => "Failed".to_string(),
        _ => status.to_string(),
    }
}
