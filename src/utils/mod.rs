//! Utility functions and helpers.

pub mod http;
pub mod log;
#[cfg(feature = "cli")]
pub mod table;
