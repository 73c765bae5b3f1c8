//! # pay-wasm
//!
//! WebAssembly bindings for the AfriArt storefront.
//!
//! This crate exposes the same helpers the CLI uses, so the browser
//! checkout form and the terminal agree on:
//! - phone number normalization before an STK push
//! - amount validation
//! - currency, date and image formatting
//! - order status labels and the staff order summary
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { normalize_phone_number, format_currency } from 'afriart-pay-wasm';
//!
//! await init();
//!
//! normalize_phone_number('0712345678'); // "254712345678"
//! format_currency(1500.5);              // "KES 1,500.5"
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use pay_core::{OrderSummary, OrdersReport};
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

/// Normalize a payer phone number to `2547...` form
#[wasm_bindgen]
pub fn normalize_phone_number(input: &str) -> String {
    pay_core::normalize_phone_number(input)
}

/// `KES 1,500.5`
#[wasm_bindgen]
pub fn format_currency(amount: f64) -> String {
    match to_decimal(amount) {
        Ok(amount) => pay_core::format_currency(amount),
        Err(_) => "KES -".to_string(),
    }
}

#[wasm_bindgen]
pub fn format_date(input: &str) -> String {
    pay_core::format_date(input)
}

/// Resolve an image reference; `undefined`/`null` gives the placeholder
#[wasm_bindgen]
pub fn image_url(url: Option<String>) -> String {
    pay_core::image_url(url.as_deref())
}

#[wasm_bindgen]
pub fn status_label(status: &str) -> String {
    pay_core::status_label(status)
}

/// Throws with a user-facing message if the amount cannot be charged
#[wasm_bindgen]
pub fn validate_amount(amount: f64) -> Result<(), JsValue> {
    check_amount(amount).map_err(|message| JsValue::from_str(&message))
}

/// Summarize a JSON array of orders (staff dashboard tiles)
#[wasm_bindgen]
pub fn orders_report(orders_json: &str) -> Result<String, JsValue> {
    summarize(orders_json).map_err(|message| JsValue::from_str(&message))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_decimal(amount: f64) -> Result<Decimal, String> {
    Decimal::try_from(amount).map_err(|_| format!("Invalid amount: {}", amount))
}

fn check_amount(amount: f64) -> Result<(), String> {
    let amount = to_decimal(amount)?;
    pay_core::validate_amount(amount).map_err(|e| e.to_string())
}

fn summarize(orders_json: &str) -> Result<String, String> {
    let orders: Vec<OrderSummary> =
        serde_json::from_str(orders_json).map_err(|e| format!("Invalid orders: {}", e))?;
    let report = OrdersReport::from_orders(&orders);
    serde_json::to_string(&report).map_err(|e| e.to_string())
}
