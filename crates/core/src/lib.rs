pub mod capture;
pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod parser;

pub use capture::TaskInput;
pub use config::AppConfig;
pub use database::Database;
pub use error::{StoreError, ValidationError};
pub use model::*;
