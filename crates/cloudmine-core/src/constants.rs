/// ─── CloudMine Constants ────────────────────────────────────────────────────
///
/// Base unit: 1 coin = 100,000,000 units (eight decimal places).
/// Every balance, reward and threshold is an integer count of units.

// ── Units ────────────────────────────────────────────────────────────────────

/// Number of base units in one displayed coin.
pub const UNITS_PER_COIN: u128 = 100_000_000;

/// Fractional digits shown and accepted for any amount.
pub const AMOUNT_DECIMALS: usize = 8;

// ── Default finance settings ─────────────────────────────────────────────────

/// Mining accrual per second: 0.00000001.
pub const DEFAULT_MINING_AMOUNT_UNITS: u128 = 1;

/// Once-per-day bonus: 0.00000005.
pub const DEFAULT_DAILY_BONUS_UNITS: u128 = 5;

/// Smallest withdrawal request accepted: 0.0001.
pub const DEFAULT_MIN_WITHDRAWAL_UNITS: u128 = 10_000;

/// Share of a referred user's balance credited to the referrer (percent).
pub const DEFAULT_REFERRAL_PROFIT_PERCENT: u16 = 10;

// ── Mining timer ─────────────────────────────────────────────────────────────

/// Period of the mining tick in milliseconds.
pub const MINING_TICK_MILLIS: u64 = 1_000;

// ── Admin unlock gesture ─────────────────────────────────────────────────────

/// Taps required to unlock the admin overlay.
pub const DEFAULT_UNLOCK_TAPS: u32 = 8;

/// Longest allowed gap between consecutive taps before progress resets.
pub const UNLOCK_TAP_WINDOW_MILLIS: u64 = 2_000;

// ── Persistent slot ──────────────────────────────────────────────────────────

/// The single persisted key: the calendar day of the last bonus claim.
pub const LAST_BONUS_DATE_KEY: &str = "last_bonus_date";

/// Calendar-day format stored under `LAST_BONUS_DATE_KEY`.
pub const BONUS_DAY_FORMAT: &str = "%Y-%m-%d";

// ── Deep links ───────────────────────────────────────────────────────────────

/// Bot handle used in referral links until an admin configures one.
pub const FALLBACK_BOT_NAME: &str = "YourBotName";

pub const TELEGRAM_BASE_URL: &str = "https://t.me";

pub const TELEGRAM_SHARE_URL: &str = "https://t.me/share/url";

/// Text attached to a shared referral link.
pub const REFERRAL_SHARE_TEXT: &str = "Join me in Cloud Mining!";

/// Identifier of the user created at startup.
pub const DEFAULT_USER_ID: &str = "1";
