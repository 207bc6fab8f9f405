pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use gtd_core as core;
pub use gtd_core::capture;
pub use gtd_core::database as db;
pub use gtd_core::model;
pub use gtd_core::parser;

pub use gtd_core::AppConfig;
