//! Error types for the FundMe contribution ledger.
//!
//! All errors use the `FM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Contribution errors
//! - 2xx: Authorization errors
//! - 3xx: Oracle errors
//! - 4xx: Query errors
//! - 5xx: Settlement errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, Wei};

/// Central error enum for all FundMe operations.
#[derive(Debug, Error)]
pub enum FundMeError {
    // =================================================================
    // Contribution Errors (1xx)
    // =================================================================
    /// The USD value of the contribution is below the configured minimum.
    #[error("FM_ERR_100: Insufficient contribution: USD value {usd_value} below minimum {minimum}")]
    InsufficientContribution { usd_value: u128, minimum: u128 },

    /// A conversion or accumulation would overflow `u128`.
    #[error("FM_ERR_101: Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: &'static str },

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// Settlement was attempted by someone other than the owner.
    #[error("FM_ERR_200: Not owner: {caller}")]
    NotOwner { caller: Address },

    // =================================================================
    // Oracle Errors (3xx)
    // =================================================================
    /// The price oracle could not produce a usable price.
    #[error("FM_ERR_300: Price oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    // =================================================================
    // Query Errors (4xx)
    // =================================================================
    /// Funder index past the end of the contributor order list.
    #[error("FM_ERR_400: Funder index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// The value transfer to the owner failed; the settlement was rolled back.
    #[error("FM_ERR_500: Transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        to: Address,
        amount: Wei,
        reason: String,
    },

    /// Held balance no longer reconciles with the contribution records.
    #[error("FM_ERR_501: Reconciliation failed: {reason}")]
    ReconciliationFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// An address string could not be parsed.
    #[error("FM_ERR_900: Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration error (invalid values, missing fields, etc.).
    #[error("FM_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("FM_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, FundMeError>;

impl From<serde_json::Error> for FundMeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_owner_display_contains_caller() {
        let caller = Address::from_low_u64(7);
        let msg = format!("{}", FundMeError::NotOwner { caller });
        assert!(msg.starts_with("FM_ERR_200"), "Got: {msg}");
        assert!(msg.contains(&caller.to_string()));
    }

    #[test]
    fn insufficient_contribution_display() {
        let err = FundMeError::InsufficientContribution {
            usd_value: 10,
            minimum: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("FM_ERR_100"));
        assert!(msg.contains("10"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn all_errors_have_fm_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(FundMeError::ArithmeticOverflow { operation: "fund" }),
            Box::new(FundMeError::OracleUnavailable {
                reason: "stale".into(),
            }),
            Box::new(FundMeError::IndexOutOfRange { index: 0, len: 0 }),
            Box::new(FundMeError::TransferFailed {
                to: Address::ZERO,
                amount: 1,
                reason: "rejected".into(),
            }),
            Box::new(FundMeError::ReconciliationFailed {
                reason: "drift".into(),
            }),
            Box::new(FundMeError::Configuration("bad".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("FM_ERR_"),
                "Error missing FM_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn serde_json_error_converts() {
        let err: FundMeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FundMeError::Serialization(_)));
    }
}
