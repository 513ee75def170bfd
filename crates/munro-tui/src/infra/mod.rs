//! Infrastructure adapters for HTTP and configuration.

pub mod api;
pub mod config;
