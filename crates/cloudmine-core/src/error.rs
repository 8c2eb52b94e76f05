use thiserror::Error;

use crate::types::Amount;

#[derive(Debug, Error)]
pub enum CloudmineError {
    // ── Withdrawal form validation ───────────────────────────────────────────
    #[error("please enter a withdrawal address")]
    MissingAddress,

    #[error("please enter a valid amount")]
    InvalidAmount,

    #[error("minimum withdrawal is {min}")]
    BelowMinimum { min: Amount },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CloudmineError {
    /// True for the inline form messages of the withdrawal view.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CloudmineError::MissingAddress
                | CloudmineError::InvalidAmount
                | CloudmineError::BelowMinimum { .. }
                | CloudmineError::InsufficientBalance { .. }
        )
    }
}
