use chrono::NaiveDate;
use std::path::Path;

use crate::error::{LoaderError, Result};

/// Largest accepted batch: PostgreSQL allows 65535 bind parameters per
/// statement and every landing row binds nine.
pub const MAX_BATCH_SIZE: usize = 7000;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a partition date and return it parsed
    ///
    /// The date doubles as a directory name, so only the canonical
    /// `YYYY-MM-DD` spelling is accepted.
    pub fn validate_partition_date(date: &str) -> Result<NaiveDate> {
        if date.trim().is_empty() {
            return Err(LoaderError::InvalidPartition("date cannot be empty".to_string()));
        }

        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| LoaderError::InvalidPartition(format!("{date}: {e}, use YYYY-MM-DD")))?;

        // Reject non-canonical spellings such as "2026-1-8"
        if parsed.format("%Y-%m-%d").to_string() != date {
            return Err(LoaderError::InvalidPartition(format!("{date}: use YYYY-MM-DD")));
        }

        Ok(parsed)
    }

    /// Validate the base data directory
    pub fn validate_base_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(LoaderError::Config("Base data path cannot be empty".to_string()));
        }

        if path.to_string_lossy().len() > 4096 {
            return Err(LoaderError::Config(
                "Base data path too long (max 4096 characters)".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate rows per insert statement
    pub fn validate_batch_size(batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(LoaderError::Config("Batch size must be greater than 0".to_string()));
        }

        if batch_size > MAX_BATCH_SIZE {
            return Err(LoaderError::Config(format!(
                "Batch size too large (max {MAX_BATCH_SIZE})"
            )));
        }

        Ok(())
    }
}
