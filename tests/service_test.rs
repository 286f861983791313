//! Pipeline ordering and failure tests against a mocked landing repository

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use mockall::{mock, Sequence};
use tempfile::TempDir;
use telegram_raw_loader::models::{ChannelCount, RawMessage};
use telegram_raw_loader::partition::MANIFEST_FILE;
use telegram_raw_loader::repository::LandingRepository;
use telegram_raw_loader::{LoadService, LoaderError, Partition, Result};

use common::{channel_messages, partition_dir, write_file, write_json, TEST_DATE};

mock! {
    pub Repo {}

    impl LandingRepository for Repo {
        fn prepare_schema(&mut self) -> Result<()>;
        fn load_messages(&mut self, messages: &[RawMessage], batch_size: usize) -> Result<usize>;
        fn count_rows(&mut self) -> Result<i64>;
        fn count_by_channel(&mut self) -> Result<Vec<ChannelCount>>;
    }
}

fn channel(name: &str, count: i64) -> ChannelCount {
    ChannelCount {
        channel_name: Some(name.to_string()),
        message_count: count,
    }
}

#[test]
fn test_full_run_order_and_summary() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 3));
    write_json(&dir, "b.json", &channel_messages("B", 5));
    write_json(&dir, MANIFEST_FILE, &channel_messages("manifest", 7));

    let mut seq = Sequence::new();
    let mut repo = MockRepo::new();
    repo.expect_prepare_schema()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    repo.expect_load_messages()
        .withf(|messages, batch_size| {
            messages.len() == 8
                && *batch_size == 1000
                && messages.iter().all(|m| m.channel_name.as_deref() != Some("manifest"))
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|messages, _| Ok(messages.len()));
    repo.expect_count_rows()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(8));
    repo.expect_count_by_channel()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![channel("B", 5), channel("A", 3)]));

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let summary = service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect("load succeeds");

    assert_eq!(summary.date, TEST_DATE);
    assert_eq!(summary.files_read, 2);
    assert_eq!(summary.messages_read, 8);
    assert_eq!(summary.rows_loaded, 8);
    let verification = summary.verification.expect("verification ran");
    assert_eq!(verification.total_rows, 8);
    assert_eq!(verification.per_channel, vec![channel("B", 5), channel("A", 3)]);
}

#[test]
fn test_configured_batch_size_reaches_repository() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 4));

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().returning(|| Ok(()));
    repo.expect_load_messages()
        .withf(|_, batch_size| *batch_size == 250)
        .times(1)
        .returning(|messages, _| Ok(messages.len()));
    repo.expect_count_rows().returning(|| Ok(4));
    repo.expect_count_by_channel().returning(|| Ok(vec![channel("A", 4)]));

    let mut service = LoadService::new(Box::new(repo), 250).expect("service");
    service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect("load succeeds");
}

#[test]
fn test_missing_partition_leaves_schema_untouched() {
    let temp = TempDir::new().expect("temp dir");

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().times(0);
    repo.expect_load_messages().times(0);
    repo.expect_count_rows().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let err = service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect_err("partition is missing");

    assert!(matches!(err, LoaderError::PartitionNotFound(_)));
    assert!(err.to_string().starts_with("Directory not found"));
}

#[test]
fn test_malformed_file_leaves_schema_untouched() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 3));
    write_file(&dir, "b.json", "not json at all");

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().times(0);
    repo.expect_load_messages().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let err = service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect_err("file is malformed");

    assert!(matches!(err, LoaderError::Parse { .. }));
}

#[test]
fn test_invalid_date_touches_nothing() {
    let temp = TempDir::new().expect("temp dir");

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let err = service
        .run(&Partition::new(temp.path(), "18-01-2026"))
        .expect_err("date is not YYYY-MM-DD");

    assert!(matches!(err, LoaderError::InvalidPartition(_)));
}

#[test]
fn test_empty_partition_recreates_table_without_loading() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, MANIFEST_FILE, &serde_json::json!({"total_messages": 0}));

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().times(1).returning(|| Ok(()));
    repo.expect_load_messages().times(0);
    repo.expect_count_rows().times(0);
    repo.expect_count_by_channel().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let summary = service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect("empty partition is not an error");

    assert_eq!(summary.files_read, 0);
    assert_eq!(summary.rows_loaded, 0);
    assert!(summary.verification.is_none());
}

#[test]
fn test_load_failure_skips_verification() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 2));

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema().returning(|| Ok(()));
    repo.expect_load_messages()
        .returning(|_, _| Err(LoaderError::Database(diesel::result::Error::NotFound)));
    repo.expect_count_rows().times(0);
    repo.expect_count_by_channel().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let err = service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect_err("insert failed");

    assert!(matches!(err, LoaderError::Database(_)));
}

#[test]
fn test_schema_failure_stops_pipeline() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 2));

    let mut repo = MockRepo::new();
    repo.expect_prepare_schema()
        .returning(|| Err(LoaderError::Database(diesel::result::Error::BrokenTransactionManager)));
    repo.expect_load_messages().times(0);

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    assert!(service.run(&Partition::new(temp.path(), TEST_DATE)).is_err());
}

#[test]
fn test_zero_batch_size_rejected() {
    let repo = MockRepo::new();
    assert!(matches!(
        LoadService::new(Box::new(repo), 0),
        Err(LoaderError::Config(_))
    ));
}

#[test]
fn test_verify_passes_counts_through() {
    let mut repo = MockRepo::new();
    repo.expect_count_rows().returning(|| Ok(7));
    repo.expect_count_by_channel()
        .returning(|| Ok(vec![channel("B", 5), channel("A", 2)]));

    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");
    let verification = service.verify().expect("verify");

    assert_eq!(verification.total_rows, 7);
    assert_eq!(verification.per_channel[0], channel("B", 5));
    assert_eq!(verification.per_channel[1], channel("A", 2));
}

/// In-memory table with drop-and-recreate semantics
#[derive(Clone, Default)]
struct MemoryRepo {
    rows: Rc<RefCell<Vec<RawMessage>>>,
}

impl LandingRepository for MemoryRepo {
    fn prepare_schema(&mut self) -> Result<()> {
        self.rows.borrow_mut().clear();
        Ok(())
    }

    fn load_messages(&mut self, messages: &[RawMessage], _batch_size: usize) -> Result<usize> {
        self.rows.borrow_mut().extend_from_slice(messages);
        Ok(messages.len())
    }

    fn count_rows(&mut self) -> Result<i64> {
        Ok(i64::try_from(self.rows.borrow().len()).unwrap())
    }

    fn count_by_channel(&mut self) -> Result<Vec<ChannelCount>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_rerun_replaces_instead_of_appending() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 3));
    write_json(&dir, "b.json", &channel_messages("B", 5));

    let repo = MemoryRepo::default();
    let rows = Rc::clone(&repo.rows);
    let mut service = LoadService::new(Box::new(repo), 2).expect("service");
    let partition = Partition::new(temp.path(), TEST_DATE);

    let first = service.run(&partition).expect("first run");
    let second = service.run(&partition).expect("second run");

    assert_eq!(first.verification.unwrap().total_rows, 8);
    assert_eq!(second.verification.unwrap().total_rows, 8);
    assert_eq!(rows.borrow().len(), 8);
}

#[test]
fn test_previous_partition_is_discarded() {
    let temp = TempDir::new().expect("temp dir");
    let day_one = partition_dir(temp.path(), "2026-01-17");
    write_json(&day_one, "a.json", &channel_messages("A", 6));
    let day_two = partition_dir(temp.path(), TEST_DATE);
    write_json(&day_two, "b.json", &channel_messages("B", 2));

    let repo = MemoryRepo::default();
    let rows = Rc::clone(&repo.rows);
    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");

    service
        .run(&Partition::new(temp.path(), "2026-01-17"))
        .expect("day one");
    service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect("day two");

    let rows = rows.borrow();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|m| m.channel_name.as_deref() == Some("B")));
}

#[test]
fn test_failed_rerun_keeps_previous_rows() {
    let temp = TempDir::new().expect("temp dir");
    let dir = partition_dir(temp.path(), TEST_DATE);
    write_json(&dir, "a.json", &channel_messages("A", 4));

    let repo = MemoryRepo::default();
    let rows = Rc::clone(&repo.rows);
    let mut service = LoadService::new(Box::new(repo), 1000).expect("service");

    service
        .run(&Partition::new(temp.path(), TEST_DATE))
        .expect("first run");
    assert!(service
        .run(&Partition::new(temp.path(), "2026-01-19"))
        .is_err());

    assert_eq!(rows.borrow().len(), 4);
}
