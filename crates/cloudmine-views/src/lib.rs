//! cloudmine-views
//!
//! The consumers of the shared store. Each view is constructed with an
//! `AppContext` and never talks to another view.
//!
//!   mining     one-second accrual timer
//!   bonus      once-per-calendar-day bonus gated by the persistent slot
//!   tasks      reward list, outbound links, one-shot completion
//!   referrals  referral link and recomputed earnings
//!   withdraw   payout request form
//!   unlock     tap-gesture state machine guarding the admin overlay
//!   admin      config, catalog, withdrawal and user moderation

pub mod admin;
pub mod bonus;
pub mod mining;
pub mod referrals;
pub mod tasks;
pub mod unlock;
pub mod withdraw;

pub use admin::{AdminPanel, AdminTab, NewTask};
pub use bonus::DailyBonus;
pub use mining::MiningView;
pub use referrals::{ReferralRow, ReferralSummary, ReferralView};
pub use tasks::TaskView;
pub use unlock::{AdminGate, SecretUnlock};
pub use withdraw::WithdrawForm;
