use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Amount, UserId, WithdrawalId};

/// Review state of a payout request. Admins may set any status from any
/// other; there is no enforced ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Reviewing,
    Paid,
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Reviewing => "reviewing",
            WithdrawalStatus::Paid => "paid",
        })
    }
}

impl FromStr for WithdrawalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "reviewing" => Ok(WithdrawalStatus::Reviewing),
            "paid" => Ok(WithdrawalStatus::Paid),
            other => Err(format!("unknown withdrawal status: {other}")),
        }
    }
}

/// A user-submitted payout request. No funds move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: WithdrawalId,
    pub user_id: UserId,
    /// Destination address as typed; never validated beyond non-emptiness.
    pub address: String,
    pub amount: Amount,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
}
