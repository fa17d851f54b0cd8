//! CLI command modules

pub mod check;
pub mod serve;

pub use check::{execute_check_command, CheckArgs};
pub use serve::{execute_serve_command, ServeArgs};
