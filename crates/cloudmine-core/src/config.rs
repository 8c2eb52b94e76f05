use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DAILY_BONUS_UNITS, DEFAULT_MINING_AMOUNT_UNITS, DEFAULT_MIN_WITHDRAWAL_UNITS,
    DEFAULT_REFERRAL_PROFIT_PERCENT,
};
use crate::error::CloudmineError;
use crate::types::Amount;

/// Process-wide tunables, editable from the admin panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Accrual per mining tick (one second).
    pub mining_amount: Amount,
    pub daily_bonus: Amount,
    pub min_withdrawal: Amount,
    /// Percent of a referred user's balance credited to the referrer.
    pub referral_profit: u16,
    /// Opaque integration identifiers; stored and displayed, never called.
    pub telegram_bot_id: String,
    pub telegram_user_id: String,
    pub adsgram_code: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mining_amount: Amount::from_units(DEFAULT_MINING_AMOUNT_UNITS),
            daily_bonus: Amount::from_units(DEFAULT_DAILY_BONUS_UNITS),
            min_withdrawal: Amount::from_units(DEFAULT_MIN_WITHDRAWAL_UNITS),
            referral_profit: DEFAULT_REFERRAL_PROFIT_PERCENT,
            telegram_bot_id: String::new(),
            telegram_user_id: String::new(),
            adsgram_code: String::new(),
        }
    }
}

impl AppConfig {
    /// Shallow-merge: fields absent from `patch` keep their value.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.mining_amount {
            self.mining_amount = v;
        }
        if let Some(v) = patch.daily_bonus {
            self.daily_bonus = v;
        }
        if let Some(v) = patch.min_withdrawal {
            self.min_withdrawal = v;
        }
        if let Some(v) = patch.referral_profit {
            self.referral_profit = v;
        }
        if let Some(v) = &patch.telegram_bot_id {
            self.telegram_bot_id = v.clone();
        }
        if let Some(v) = &patch.telegram_user_id {
            self.telegram_user_id = v.clone();
        }
        if let Some(v) = &patch.adsgram_code {
            self.adsgram_code = v.clone();
        }
    }
}

/// Partial `AppConfig`, as submitted by the finance tab or a JSON file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    pub mining_amount: Option<Amount>,
    pub daily_bonus: Option<Amount>,
    pub min_withdrawal: Option<Amount>,
    pub referral_profit: Option<u16>,
    pub telegram_bot_id: Option<String>,
    pub telegram_user_id: Option<String>,
    pub adsgram_code: Option<String>,
}

impl ConfigPatch {
    pub fn from_json(json: &str) -> Result<Self, CloudmineError> {
        serde_json::from_str(json).map_err(|e| CloudmineError::Config(e.to_string()))
    }

    /// Build a single-field patch from a `key value` pair as typed in the
    /// finance tab.
    pub fn from_field(key: &str, value: &str) -> Result<Self, CloudmineError> {
        let amount = || {
            value
                .parse::<Amount>()
                .map_err(|e| CloudmineError::Config(format!("{key}: {e}")))
        };
        let mut patch = ConfigPatch::default();
        match key {
            "mining_amount" => patch.mining_amount = Some(amount()?),
            "daily_bonus" => patch.daily_bonus = Some(amount()?),
            "min_withdrawal" => patch.min_withdrawal = Some(amount()?),
            "referral_profit" => {
                patch.referral_profit = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|e| CloudmineError::Config(format!("{key}: {e}")))?,
                )
            }
            "telegram_bot_id" => patch.telegram_bot_id = Some(value.to_string()),
            "telegram_user_id" => patch.telegram_user_id = Some(value.to_string()),
            "adsgram_code" => patch.adsgram_code = Some(value.to_string()),
            other => return Err(CloudmineError::Config(format!("unknown setting: {other}"))),
        }
        Ok(patch)
    }
}
