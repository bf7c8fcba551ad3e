//! Data models for bot commands and services
//!
//! Each model represents the output of a service operation.

pub mod ping;
pub mod report;

pub use ping::PingMetrics;
pub use report::PizzaReport;
