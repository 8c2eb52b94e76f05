//! cloudmine-app
//!
//! Terminal front-end. Each input line is one "click": it feeds the admin
//! unlock gesture and then runs as a command against the views.

pub mod command;
pub mod shell;

pub use command::{AdminCommand, Command};
pub use shell::{Outcome, Shell};
