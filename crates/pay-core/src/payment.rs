//! # Payment Types
//!
//! Request, handle and status types for the push-payment checkout flow.

use crate::error::{PaymentError, PaymentResult};
use crate::phone::normalize_phone_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the payment is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    /// Artwork purchase
    Artwork,
    /// Exhibition booking
    Exhibition,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Artwork => "artwork",
            SubjectType::Exhibition => "exhibition",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Reject zero, negative, and sub-cent amounts
pub fn validate_amount(amount: Decimal) -> PaymentResult<()> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::ValidationFailed(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(PaymentError::ValidationFailed(format!(
            "Amount has more than two decimal places: {}",
            amount
        )));
    }
    Ok(())
}

/// A single checkout attempt.
///
/// Built once per attempt; the phone number is normalized at construction
/// and the request is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    payer_contact: String,
    amount: Decimal,
    subject_type: SubjectType,
    subject_id: String,
    initiator_user_id: String,
}

impl PaymentRequest {
    /// Create a validated request
    ///
    /// # Errors
    /// `ValidationFailed` if the phone is blank, the amount is not positive,
    /// or either identifier is empty.
    pub fn new(
        payer_contact: impl AsRef<str>,
        amount: Decimal,
        subject_type: SubjectType,
        subject_id: impl Into<String>,
        initiator_user_id: impl Into<String>,
    ) -> PaymentResult<Self> {
        let raw_phone = payer_contact.as_ref();
        if raw_phone.trim().is_empty() {
            return Err(PaymentError::ValidationFailed(
                "Phone number is required".to_string(),
            ));
        }
        validate_amount(amount)?;

        let subject_id = subject_id.into();
        if subject_id.trim().is_empty() {
            return Err(PaymentError::ValidationFailed(format!(
                "Missing {} id",
                subject_type
            )));
        }
        let initiator_user_id = initiator_user_id.into();
        if initiator_user_id.trim().is_empty() {
            return Err(PaymentError::ValidationFailed(
                "Missing user id".to_string(),
            ));
        }

        Ok(Self {
            payer_contact: normalize_phone_number(raw_phone),
            amount,
            subject_type,
            subject_id,
            initiator_user_id,
        })
    }

    /// Normalized phone number (`2547...`)
    pub fn payer_contact(&self) -> &str {
        &self.payer_contact
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn initiator_user_id(&self) -> &str {
        &self.initiator_user_id
    }

    /// Account reference shown on the payer's phone (`artwork-42`)
    pub fn account_reference(&self) -> String {
        format!("{}-{}", self.subject_type, self.subject_id)
    }
}

/// Opaque identifier for one in-flight payment attempt.
///
/// Only compared for equality; the client never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentHandle(String);

impl PaymentHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Payment status as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(PaymentError::Serialization(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

/// Result of a successful payment initiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedPayment {
    /// Polling key for the status endpoint
    pub handle: PaymentHandle,
    /// Always `Pending` straight after initiation
    pub status: PaymentStatus,
}

impl InitiatedPayment {
    pub fn pending(handle: PaymentHandle) -> Self {
        Self {
            handle,
            status: PaymentStatus::Pending,
        }
    }
}
