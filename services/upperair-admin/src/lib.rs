//! Operator commands for the upper-air observation database and cache.
//!
//! Each binary under `src/bin` is a thin wrapper: it parses flags, loads
//! configuration, connects the collaborators it needs and hands them to the
//! matching function in [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
pub mod tasks;

pub use config::AdminConfig;
pub use output::Output;
pub use tasks::{FetchOutcome, HttpTaskTrigger, UpperAirFetch};
