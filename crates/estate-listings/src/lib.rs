pub mod admin;
pub mod analytics;
pub mod config;
pub mod error;
pub mod listings;
pub mod telemetry;
