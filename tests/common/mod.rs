#![allow(dead_code)]

use issue_tracker::model::Fields;
use issue_tracker::storage::{MemoryStore, SqliteStore};
use issue_tracker::IssueStore;
use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;
use tracing::info;

pub mod cli;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        issue_tracker::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

pub fn memory_store() -> IssueStore<MemoryStore> {
    init_test_logging();
    IssueStore::new(MemoryStore::new())
}

pub fn sqlite_store() -> IssueStore<SqliteStore> {
    init_test_logging();
    IssueStore::new(SqliteStore::open_memory().expect("Failed to create test database"))
}

pub fn sqlite_store_with_dir() -> (IssueStore<SqliteStore>, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(".issue-tracker").join("issues.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let store = SqliteStore::open(&db_path).expect("Failed to create test database");
    (IssueStore::new(store), dir)
}

pub mod fixtures {
    use super::Fields;

    /// The canonical "Fix auth" submission.
    pub fn fix_auth() -> Fields {
        Fields::new()
            .with("issue_title", "Fix auth")
            .with("issue_text", "User auth is not working.")
            .with("created_by", "Mike")
            .with("assigned_to", "Joe")
            .with("status_text", "Not yet started")
    }

    /// Only the required fields.
    pub fn minimal(title: &str, created_by: &str) -> Fields {
        Fields::new()
            .with("issue_title", title)
            .with("issue_text", format!("{title} details"))
            .with("created_by", created_by)
    }

    /// An update submission for `id`.
    pub fn update(id: &str) -> Fields {
        Fields::new().with("_id", id)
    }
}
