//! Process-wide services

pub mod terminal_modes;
pub mod tracing_setup;
