//! View and UI layer
//!
//! Rendering helpers shared by the screens.

pub mod chrome;
pub mod markdown;
pub mod status_bar;
pub mod text_input;
pub mod theme;
pub mod viewport;
