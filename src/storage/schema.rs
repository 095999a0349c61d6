//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the issue database.
pub const SCHEMA_SQL: &str = r"
    -- Projects: created lazily on first write, may hold zero issues
    CREATE TABLE IF NOT EXISTS projects (
        project_name TEXT PRIMARY KEY,
        created_on TEXT NOT NULL
    );

    -- Issues: position preserves per-project insertion order
    CREATE TABLE IF NOT EXISTS issues (
        id TEXT PRIMARY KEY,
        project_name TEXT NOT NULL,
        position INTEGER NOT NULL,
        issue_title TEXT NOT NULL,
        issue_text TEXT NOT NULL,
        created_by TEXT NOT NULL,
        assigned_to TEXT NOT NULL DEFAULT '',
        status_text TEXT NOT NULL DEFAULT '',
        open INTEGER NOT NULL DEFAULT 1,
        created_on TEXT NOT NULL,
        updated_on TEXT NOT NULL,
        CHECK (length(issue_title) >= 1),
        CHECK (length(issue_text) >= 1),
        CHECK (length(created_by) >= 1),
        FOREIGN KEY (project_name) REFERENCES projects(project_name) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_name, position);

    -- Every id ever handed out; ids are never reused after deletion
    CREATE TABLE IF NOT EXISTS issued_ids (
        id TEXT PRIMARY KEY,
        issued_at TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// Idempotent: all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < CURRENT_SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    }

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}
