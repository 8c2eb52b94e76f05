pub mod config;
pub mod constants;
pub mod error;
pub mod task;
pub mod types;
pub mod user;
pub mod withdrawal;

pub use config::*;
pub use constants::*;
pub use error::CloudmineError;
pub use task::*;
pub use types::*;
pub use user::*;
pub use withdrawal::*;
