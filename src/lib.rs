//! Library exports for reuse in integration tests.

/// Application directory resolution.
pub mod app_dirs;
/// External product catalog client.
pub mod catalog;
/// Persisted application configuration.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Append-only consumption ledger.
pub mod ledger;
/// Logging setup.
pub mod logging;
/// Nutrition scaling and quantity parsing.
pub mod nutrition;
/// Relevance ranking of search results.
pub mod ranking;

pub(crate) mod http_client;
