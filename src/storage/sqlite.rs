//! `SQLite` storage implementation.

use crate::error::Result;
use crate::model::{Issue, Project, format_timestamp};
use crate::storage::{ProjectMutation, ProjectStore};
use crate::storage::schema::apply_schema;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const ISSUE_COLUMNS: &str = "id, issue_title, issue_text, created_by, assigned_to, status_text, \
                             open, created_on, updated_on";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        tracing::debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn issue_from_row(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
        Ok(Issue {
            id: row.get(0)?,
            issue_title: row.get(1)?,
            issue_text: row.get(2)?,
            created_by: row.get(3)?,
            assigned_to: row.get(4)?,
            status_text: row.get(5)?,
            open: row.get::<_, i64>(6)? != 0,
            created_on: timestamp_column(row, 7)?,
            updated_on: timestamp_column(row, 8)?,
        })
    }

    fn read_project(conn: &Connection, name: &str) -> Result<Option<Project>> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM projects WHERE project_name = ?",
                [name],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE project_name = ? ORDER BY position"
        );
        let mut stmt = conn.prepare(&sql)?;
        let issues = stmt
            .query_map([name], Self::issue_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(Project {
            project_name: name.to_string(),
            issues,
        }))
    }

    fn write_project(conn: &Connection, project: &Project) -> Result<()> {
        let now = format_timestamp(&Utc::now());

        conn.execute(
            "INSERT OR IGNORE INTO projects (project_name, created_on) VALUES (?, ?)",
            rusqlite::params![project.project_name, now],
        )?;
        conn.execute(
            "DELETE FROM issues WHERE project_name = ?",
            [&project.project_name],
        )?;

        let sql = format!(
            "INSERT INTO issues (project_name, position, {ISSUE_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let mut insert = conn.prepare(&sql)?;
        let mut issued =
            conn.prepare("INSERT OR IGNORE INTO issued_ids (id, issued_at) VALUES (?, ?)")?;

        for (position, issue) in project.issues.iter().enumerate() {
            let position = i64::try_from(position).unwrap_or(i64::MAX);
            insert.execute(rusqlite::params![
                project.project_name,
                position,
                issue.id,
                issue.issue_title,
                issue.issue_text,
                issue.created_by,
                issue.assigned_to,
                issue.status_text,
                i64::from(issue.open),
                format_timestamp(&issue.created_on),
                format_timestamp(&issue.updated_on),
            ])?;
            issued.execute(rusqlite::params![issue.id, now])?;
        }

        tracing::trace!(
            project = %project.project_name,
            issues = project.issues.len(),
            "Wrote project"
        );
        Ok(())
    }
}

impl ProjectStore for SqliteStore {
    fn load_project(&self, name: &str) -> Result<Option<Project>> {
        let mut conn = self.conn.lock()?;
        // One read snapshot for the project row and its issues.
        let tx = conn.transaction()?;
        let project = Self::read_project(&tx, name)?;
        tx.commit()?;
        Ok(project)
    }

    fn save_project(&self, project: &Project) -> Result<()> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        Self::write_project(&tx, project)?;
        tx.commit()?;
        Ok(())
    }

    fn mutate_project(&self, name: &str, mutation: &mut ProjectMutation<'_>) -> Result<()> {
        let mut conn = self.conn.lock()?;
        // IMMEDIATE takes the write lock before the read, so a concurrent
        // writer on the same file waits instead of working from a stale copy.
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let current = Self::read_project(&tx, name)?;
        if let Some(updated) = mutation(current)? {
            Self::write_project(&tx, &updated)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn project_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT project_name FROM projects ORDER BY project_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn reserve_id(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO issued_ids (id, issued_at) VALUES (?, ?)",
            rusqlite::params![id, format_timestamp(&Utc::now())],
        )?;
        Ok(inserted == 1)
    }

    fn id_issued(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock()?;
        let found = conn
            .query_row("SELECT 1 FROM issued_ids WHERE id = ?", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    })
}

/// Parse a stored timestamp. Accepts RFC3339 and the bare `SQLite` datetime form.
fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}
