use serde::{Deserialize, Serialize};

use crate::types::{Amount, UserId};

// ── User ──────────────────────────────────────────────────────────────────────

/// A participant record. Created once at startup for the current user;
/// mutated in place by balance-affecting operations; never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// The single authoritative spendable balance.
    pub balance: Amount,
    /// Accrual per second last applied by the mining tick.
    pub mining_rate: Amount,
    pub referral_count: u32,
    /// Running total of referral credits (accumulated, never recomputed).
    pub referral_earnings: Amount,
    /// Sum of all withdrawal requests; does not reduce `balance`.
    pub total_withdrawn: Amount,
    pub is_blocked: bool,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            balance: Amount::ZERO,
            mining_rate: Amount::ZERO,
            referral_count: 0,
            referral_earnings: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
            is_blocked: false,
        }
    }

    /// Shallow-merge every field present in `patch`.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(v) = patch.balance {
            self.balance = v;
        }
        if let Some(v) = patch.mining_rate {
            self.mining_rate = v;
        }
        if let Some(v) = patch.referral_count {
            self.referral_count = v;
        }
        if let Some(v) = patch.referral_earnings {
            self.referral_earnings = v;
        }
        if let Some(v) = patch.total_withdrawn {
            self.total_withdrawn = v;
        }
        if let Some(v) = patch.is_blocked {
            self.is_blocked = v;
        }
    }
}

/// Partial update of a `User`. The id is not patchable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub balance: Option<Amount>,
    pub mining_rate: Option<Amount>,
    pub referral_count: Option<u32>,
    pub referral_earnings: Option<Amount>,
    pub total_withdrawn: Option<Amount>,
    pub is_blocked: Option<bool>,
}
