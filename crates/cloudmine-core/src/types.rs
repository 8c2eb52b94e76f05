use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{AMOUNT_DECIMALS, UNITS_PER_COIN};

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

// ── Amount ───────────────────────────────────────────────────────────────────

/// A monetary scalar counted in base units (1 coin = 100,000,000 units).
///
/// Integer units make the eight-decimal rounding of the mining tick exact:
/// adding 0.00000001 five times yields 0.00000005, never 0.000000049999.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// `floor(self × percent / 100)`.
    pub fn percent(self, percent: u16) -> Amount {
        Amount(self.0.saturating_mul(percent as u128) / 100)
    }

    /// Eight-decimal rendering with trailing zeros (and a bare dot) removed.
    pub fn trimmed(self) -> String {
        let fixed = self.to_string();
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / UNITS_PER_COIN,
            self.0 % UNITS_PER_COIN,
            width = AMOUNT_DECIMALS
        )
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

/// Why a string could not be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a number")]
    NotANumber,

    #[error("amount has more than {max} decimal places")]
    TooPrecise { max: usize },

    #[error("amount is too large")]
    Overflow,
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts `123`, `0.0001`, `.5`, `5.` with optional surrounding
    /// whitespace. Signs, exponents and separators are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseAmountError::NotANumber);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(ParseAmountError::NotANumber);
        }
        if frac.len() > AMOUNT_DECIMALS {
            return Err(ParseAmountError::TooPrecise { max: AMOUNT_DECIMALS });
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| ParseAmountError::Overflow)?
                .checked_mul(UNITS_PER_COIN)
                .ok_or(ParseAmountError::Overflow)?
        };
        let frac_units = if frac.is_empty() {
            0
        } else {
            // Right-pad to eight digits: ".5" → 50_000_000 units.
            format!("{frac:0<width$}", width = AMOUNT_DECIMALS)
                .parse::<u128>()
                .map_err(|_| ParseAmountError::NotANumber)?
        };
        whole_units
            .checked_add(frac_units)
            .map(Amount)
            .ok_or(ParseAmountError::Overflow)
    }
}

impl TryFrom<String> for Amount {
    type Error = ParseAmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> String {
        amount.to_string()
    }
}

// ── UserId ───────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

// ── TaskId ───────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

// ── WithdrawalId ─────────────────────────────────────────────────────────────

/// Store-assigned, strictly increasing withdrawal identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
pub struct WithdrawalId(pub u64);

impl fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W-{}", self.0)
    }
}

impl FromStr for WithdrawalId {
    type Err = std::num::ParseIntError;

    /// Accepts both `W-7` and `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix("W-").unwrap_or(s).parse().map(WithdrawalId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(amt("0.00000001").units(), 1);
        assert_eq!(amt("0.0001").units(), 10_000);
        assert_eq!(amt("1").units(), UNITS_PER_COIN);
        assert_eq!(amt(" .5 ").units(), 50_000_000);
        assert_eq!(amt("5.").units(), 5 * UNITS_PER_COIN);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!("".parse::<Amount>(), Err(ParseAmountError::Empty));
        assert_eq!("   ".parse::<Amount>(), Err(ParseAmountError::Empty));
        assert_eq!(".".parse::<Amount>(), Err(ParseAmountError::NotANumber));
        assert_eq!("abc".parse::<Amount>(), Err(ParseAmountError::NotANumber));
        assert_eq!("-1".parse::<Amount>(), Err(ParseAmountError::NotANumber));
        assert_eq!("1e5".parse::<Amount>(), Err(ParseAmountError::NotANumber));
        assert_eq!("1.2.3".parse::<Amount>(), Err(ParseAmountError::NotANumber));
        assert_eq!(
            "0.000000001".parse::<Amount>(),
            Err(ParseAmountError::TooPrecise { max: 8 })
        );
    }

    #[test]
    fn display_is_fixed_eight_decimals() {
        assert_eq!(Amount::from_units(5).to_string(), "0.00000005");
        assert_eq!(Amount::from_units(UNITS_PER_COIN + 1).to_string(), "1.00000001");
        assert_eq!(Amount::ZERO.to_string(), "0.00000000");
    }

    #[test]
    fn trimmed_drops_trailing_zeros() {
        assert_eq!(Amount::ZERO.trimmed(), "0");
        assert_eq!(Amount::from_units(5).trimmed(), "0.00000005");
        assert_eq!(amt("10").trimmed(), "10");
        assert_eq!(amt("0.5").trimmed(), "0.5");
    }

    #[test]
    fn percent_floors() {
        assert_eq!(amt("1").percent(10), amt("0.1"));
        assert_eq!(Amount::from_units(15).percent(10), Amount::from_units(1));
        assert_eq!(Amount::from_units(9).percent(10), Amount::ZERO);
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let json = serde_json::to_string(&Amount::from_units(10_000)).unwrap();
        assert_eq!(json, "\"0.00010000\"");
        let back: Amount = serde_json::from_str("\"0.0001\"").unwrap();
        assert_eq!(back.units(), 10_000);
        assert!(serde_json::from_str::<Amount>("\"lots\"").is_err());
    }

    #[test]
    fn withdrawal_id_round_trips_display() {
        let id: WithdrawalId = "W-7".parse().unwrap();
        assert_eq!(id, WithdrawalId(7));
        assert_eq!("7".parse::<WithdrawalId>().unwrap(), WithdrawalId(7));
        assert_eq!(id.to_string(), "W-7");
    }
}
