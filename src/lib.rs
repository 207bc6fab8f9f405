pub use gtd_tui::cli;
pub use gtd_tui::commands;
pub use gtd_tui::config;
pub use gtd_tui::logging;
pub use gtd_tui::tui;
pub use gtd_tui::AppConfig;

pub use gtd_core as core;
pub use gtd_core::capture;
pub use gtd_core::database as db;
pub use gtd_core::model;
pub use gtd_core::parser;
