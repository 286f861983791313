use crate::error::Result;
use crate::models::{ChannelCount, RawMessage};

/// Storage seam for the landing table
///
/// [`crate::db::Database`] is the PostgreSQL implementation; the pipeline in
/// [`crate::service`] only talks to this trait.
pub trait LandingRepository {
    /// Ensure the `raw` namespace exists, then drop and recreate the landing table.
    fn prepare_schema(&mut self) -> Result<()>;

    /// Insert all messages in pages of `batch_size` rows inside one
    /// transaction. Returns the number of rows inserted.
    fn load_messages(&mut self, messages: &[RawMessage], batch_size: usize) -> Result<usize>;

    /// Total rows in the landing table.
    fn count_rows(&mut self) -> Result<i64>;

    /// Rows per channel, largest count first.
    fn count_by_channel(&mut self) -> Result<Vec<ChannelCount>>;
}
