//! cloudmine-state
//!
//! The shared state store, the persistent bonus-date slot, and the
//! `AppContext` handle that views receive at construction.

pub mod context;
pub mod db;
pub mod store;

pub use context::AppContext;
pub use db::{BonusRecord, SlotDb};
pub use store::{Store, StoreSnapshot};
