pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod logging;
pub mod pipeline;
pub mod types;
