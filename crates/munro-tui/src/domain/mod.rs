//! Domain models and errors.

pub mod errors;
pub mod model;
