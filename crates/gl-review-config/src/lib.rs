//! Configuration for gl-review
//!
//! This crate provides:
//! - Config file discovery (CWD, then the platform config directory)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
