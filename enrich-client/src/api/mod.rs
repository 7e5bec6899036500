//! API Module
//!
//! Operator-facing commands. Each command drives the store or the client and
//! returns rendered text; printing and exit codes are left to the binary.
//!
//! Usage:
//! - `api::commands::submit_log(&store, raw, source)`
//! - `api::commands::run_batch(&store, lines, source)`
//! - `api::commands::check_health(&client)`

pub mod commands;

pub use commands::*;
