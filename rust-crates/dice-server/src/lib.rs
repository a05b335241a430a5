pub mod api;

pub mod config;

pub mod telemetry;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
