//! Command implementations, one module per binary.

pub mod check_data;
pub mod clear_cache;
pub mod fetch;
pub mod migrate;
