//! Load pipeline: read a partition, refresh the landing table, load, verify.

use tracing::{info, warn};

use crate::error::Result;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{LoadSummary, LoadVerification};
use crate::partition::{read_partition, Partition};
use crate::repository::LandingRepository;
use crate::validation::InputValidator;

/// Runs one full-refresh load against a [`LandingRepository`]
pub struct LoadService {
    repository: Box<dyn LandingRepository>,
    batch_size: usize,
    metrics: MetricsCollector,
}

impl LoadService {
    /// Create a service inserting `batch_size` rows per statement
    pub fn new(repository: Box<dyn LandingRepository>, batch_size: usize) -> Result<Self> {
        InputValidator::validate_batch_size(batch_size)?;
        Ok(Self {
            repository,
            batch_size,
            metrics: MetricsCollector::default(),
        })
    }

    /// Load `partition`, replacing whatever the landing table held before
    ///
    /// The partition is read and parsed before the table is touched, so a
    /// missing directory or a malformed file leaves the previous load intact.
    /// An empty partition still recreates the table.
    pub fn run(&mut self, partition: &Partition) -> Result<LoadSummary> {
        let result = self.run_stages(partition);
        if let Err(err) = &result {
            self.metrics.record_error(err.stage());
        }
        result
    }

    fn run_stages(&mut self, partition: &Partition) -> Result<LoadSummary> {
        InputValidator::validate_partition_date(partition.date())?;
        InputValidator::validate_base_path(partition.base())?;

        let timer = OperationTimer::new("read_partition");
        let batch = read_partition(partition)?;
        self.metrics.record_stage("read", timer.finish());
        self.metrics.record_partition_read(batch.files.len(), batch.messages.len());

        let timer = OperationTimer::new("prepare_schema");
        self.repository.prepare_schema()?;
        self.metrics.record_stage("schema", timer.finish());

        let mut summary = LoadSummary {
            date: partition.date().to_string(),
            files_read: batch.files.len(),
            messages_read: batch.messages.len(),
            rows_loaded: 0,
            verification: None,
        };

        if batch.messages.is_empty() {
            warn!("No messages found to load");
            return Ok(summary);
        }

        let timer = OperationTimer::new("load_messages");
        summary.rows_loaded = self.repository.load_messages(&batch.messages, self.batch_size)?;
        self.metrics.record_stage("load", timer.finish());
        self.metrics.record_rows_loaded(summary.rows_loaded);

        let timer = OperationTimer::new("verify_load");
        let verification = self.verify()?;
        self.metrics.record_stage("verify", timer.finish());
        self.metrics.record_landing_rows(verification.total_rows);
        summary.verification = Some(verification);

        info!(
            date = %summary.date,
            files = summary.files_read,
            rows = summary.rows_loaded,
            "Process completed successfully"
        );
        Ok(summary)
    }

    /// Read back total and per-channel counts and log them
    pub fn verify(&mut self) -> Result<LoadVerification> {
        let total_rows = self.repository.count_rows()?;
        info!("Total records in raw.telegram_messages: {}", total_rows);

        let per_channel = self.repository.count_by_channel()?;
        info!("Messages per channel:");
        for channel in &per_channel {
            info!("  {}: {} messages", channel.label(), channel.message_count);
        }

        Ok(LoadVerification {
            total_rows,
            per_channel,
        })
    }
}
