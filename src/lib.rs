// terminull library - content loading, screens and sessions, exposed for testing

pub mod config;
pub mod content;
pub mod navigator;
pub mod screens;
pub mod services;
pub mod session;
pub mod view;
