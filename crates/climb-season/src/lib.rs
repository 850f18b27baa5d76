pub mod config;
pub mod error;
pub mod import;
pub mod season;
pub mod telemetry;
