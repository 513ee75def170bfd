//! Collection of reusable TUI components.

pub mod detail;
pub mod munro_list;
