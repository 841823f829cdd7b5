//! Winter Temperature Tracker Library
//!
//! Exposes the aggregation pipeline, the HTTP API and the terminal viewer so
//! the binary and the integration tests share them.

pub mod aggregate;
pub mod app;
pub mod cache;
pub mod chart_data;
pub mod cli;
pub mod config;
pub mod data;
pub mod server;
pub mod ui;
pub mod winter;
