//! # Payment Error Types
//!
//! Typed error handling for the afriart checkout client.
//! All payment and API operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No credential, or the server refused the one we sent
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Credential accepted but lacks permission (e.g. staff-only endpoints)
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Request body rejected, locally or by the server
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Transport-level failure (DNS, connect, reset)
    #[error("API unreachable: {0}")]
    Unreachable(String),

    /// A single request exceeded its bounded wait
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success status with a structured error body
    #[error("Server rejected request [{status}]: {message}")]
    ServerRejected { status: u16, message: String },

    /// Resource not found (artwork, exhibition, transaction)
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The polling budget expired without a terminal status
    #[error("Payment {handle} not confirmed within {elapsed_secs}s")]
    PollingTimedOut { handle: String, elapsed_secs: u64 },

    /// The payer declined or the push payment failed
    #[error("Payment {handle} failed")]
    PaymentDeclined { handle: String },

    /// Confirmation was cancelled before a terminal status
    #[error("Payment confirmation cancelled")]
    Cancelled,

    /// Configuration errors (bad env values, invalid poll settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session store I/O failure
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Returns true if a poll loop should keep going after this error
    pub fn is_transient(&self) -> bool {
        match self {
            PaymentError::Unreachable(_)
            | PaymentError::Timeout { .. }
            | PaymentError::Serialization(_)
            | PaymentError::NotFound { .. } => true,
            PaymentError::ServerRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            PaymentError::Unauthenticated(_) | PaymentError::Forbidden(_) => 3,
            PaymentError::ValidationFailed(_) | PaymentError::Configuration(_) => 2,
            PaymentError::Unreachable(_) | PaymentError::Timeout { .. } => 4,
            PaymentError::ServerRejected { .. } | PaymentError::NotFound { .. } => 5,
            PaymentError::PaymentDeclined { .. } => 6,
            PaymentError::PollingTimedOut { .. } => 7,
            PaymentError::Cancelled => 130,
            PaymentError::Serialization(_) | PaymentError::Storage(_) => 1,
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(PaymentError::Unreachable("connection reset".into()).is_transient());
        assert!(PaymentError::Timeout { timeout_secs: 10 }.is_transient());
        assert!(PaymentError::ServerRejected {
            status: 503,
            message: "db down".into()
        }
        .is_transient());
        assert!(!PaymentError::ServerRejected {
            status: 400,
            message: "bad".into()
        }
        .is_transient());
        assert!(!PaymentError::Unauthenticated("no token".into()).is_transient());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PaymentError::ValidationFailed("x".into()).exit_code(), 2);
        assert_eq!(
            PaymentError::PaymentDeclined {
                handle: "ws_1".into()
            }
            .exit_code(),
            6
        );
        assert_eq!(PaymentError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_display() {
        let err = PaymentError::PollingTimedOut {
            handle: "ws_123".into(),
            elapsed_secs: 120,
        };
        assert_eq!(err.to_string(), "Payment ws_123 not confirmed within 120s");
    }
}
