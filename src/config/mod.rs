/// Database configuration and connection management
pub mod database;

/// Business settings and service catalog loading from config.toml
pub mod settings;
