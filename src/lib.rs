//! Telegram Raw Loader - Landing-zone loader for scraped Telegram messages
//!
//! Reads one date partition of scraped message dumps
//! (`<base>/raw/telegram_messages/<YYYY-MM-DD>/*.json`) and bulk-loads it into
//! the PostgreSQL table `raw.telegram_messages`.
//!
//! # Features
//!
//! - Typed parsing of message records with missing fields loaded as NULL
//! - Full-refresh schema preparation (drop and recreate on every run)
//! - Batched multi-row inserts committed in a single transaction
//! - Post-load verification of total and per-channel row counts

/// Configuration management
pub mod config;
/// Database connection and landing table operations
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Partition discovery and parsing
pub mod partition;
/// Repository trait for the landing table
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Load pipeline
pub mod service;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{LoaderError, Result};
pub use models::{ChannelCount, LoadSummary, RawMessage};
pub use partition::Partition;
pub use service::LoadService;
