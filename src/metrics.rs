use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metric names emitted by a load run
///
/// Nothing is exported unless the embedding process installs a recorder;
/// without one every call is a no-op.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    /// Message files read from the partition
    pub files_read_total: &'static str,
    /// Records parsed from those files
    pub messages_parsed_total: &'static str,
    /// Rows inserted into the landing table
    pub rows_loaded_total: &'static str,
    /// Landing table size after verification
    pub landing_rows: &'static str,
    /// Duration per pipeline stage
    pub stage_duration: &'static str,
    /// Failed runs by stage
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            files_read_total: "raw_loader_files_read_total",
            messages_parsed_total: "raw_loader_messages_parsed_total",
            rows_loaded_total: "raw_loader_rows_loaded_total",
            landing_rows: "raw_loader_landing_rows",
            stage_duration: "raw_loader_stage_duration_seconds",
            errors_total: "raw_loader_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record what was read from a partition
    pub fn record_partition_read(&self, files: usize, messages: usize) {
        counter!(self.files_read_total).increment(files as u64);
        counter!(self.messages_parsed_total).increment(messages as u64);
    }

    /// Record rows inserted by the bulk load
    pub fn record_rows_loaded(&self, rows: usize) {
        counter!(self.rows_loaded_total).increment(rows as u64);
    }

    /// Record the verified table size
    #[allow(clippy::cast_precision_loss)]
    pub fn record_landing_rows(&self, rows: i64) {
        gauge!(self.landing_rows).set(rows as f64);
    }

    /// Record how long a stage took
    pub fn record_stage(&self, stage: &'static str, duration: Duration) {
        histogram!(self.stage_duration, "stage" => stage).record(duration.as_secs_f64());
    }

    /// Record a failed run
    pub fn record_error(&self, stage: &'static str) {
        counter!(self.errors_total, "stage" => stage).increment(1);
    }
}
