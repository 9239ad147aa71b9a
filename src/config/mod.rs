//! Configuration management module
//!
//! Loads and validates CLI defaults from environment variables and `.env`
//! files.

pub mod settings;

pub use settings::Settings;
