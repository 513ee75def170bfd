//! Application layer orchestrating domain state and infrastructure.

pub mod catalog;
pub mod fetch;
