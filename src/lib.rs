pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod state;
pub mod template;
pub mod terminal;
pub mod ui;
