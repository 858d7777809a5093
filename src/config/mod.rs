/// Record Store connection and table creation
pub mod database;

/// Application configuration loading from config.toml
pub mod app;

pub use app::{AppConfig, load_config, load_default_config};
