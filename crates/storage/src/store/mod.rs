#![forbid(unsafe_code)]

mod backup;
mod error;
mod goals;
mod progress;
mod requests;
mod tasks;

pub use error::StoreError;
pub use requests::*;

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use sg_core::model::{Goal, GoalId, GoalStatus, Task};
use sg_core::progress::{aggregate_progress, parse_deadline};
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const DB_FILE: &str = "smart_goals.db";
const SCHEMA_VERSION: &str = "1";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS goals (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          title TEXT NOT NULL,
          type TEXT NOT NULL,
          specific TEXT NOT NULL,
          measurable TEXT NOT NULL,
          achievable TEXT NOT NULL,
          relevant TEXT NOT NULL,
          time_bound TEXT NOT NULL,
          status TEXT NOT NULL CHECK(status IN ('active', 'completed')),
          progress INTEGER NOT NULL CHECK(progress BETWEEN 0 AND 100),
          created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_goals_title ON goals(title);
        CREATE INDEX IF NOT EXISTS idx_goals_status ON goals(status);
        CREATE INDEX IF NOT EXISTS idx_goals_type ON goals(type);

        CREATE TABLE IF NOT EXISTS tasks (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          goal_id INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
          title TEXT NOT NULL,
          completed INTEGER NOT NULL CHECK(completed IN (0, 1)),
          created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_goal_id ON tasks(goal_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES ('schema_version', ?1)",
        params![SCHEMA_VERSION],
    )?;
    let version: String = conn.query_row(
        "SELECT value FROM meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    if version != SCHEMA_VERSION {
        return Err(StoreError::Validation("unsupported schema version"));
    }

    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn goal_exists_tx(tx: &Transaction<'_>, id: GoalId) -> Result<bool, StoreError> {
    let row = tx
        .query_row("SELECT 1 FROM goals WHERE id = ?1", params![id], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    Ok(row.is_some())
}

fn ensure_goal_exists_tx(tx: &Transaction<'_>, id: GoalId) -> Result<(), StoreError> {
    if goal_exists_tx(tx, id)? {
        Ok(())
    } else {
        Err(StoreError::GoalNotFound(id))
    }
}

fn validate_goal_fields(title: &str, goal_type: &str, time_bound: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("title must not be empty"));
    }
    if goal_type.trim().is_empty() {
        return Err(StoreError::Validation("type must not be empty"));
    }
    if time_bound.trim().is_empty() {
        return Err(StoreError::Validation("timeBound must not be empty"));
    }
    if parse_deadline(time_bound).is_err() {
        return Err(StoreError::Validation(
            "timeBound must be an ISO date or date-time",
        ));
    }
    Ok(())
}

// Recomputed inside the same transaction as every task mutation so the
// stored percentage can never drift from the task rows.
fn recompute_progress_tx(tx: &Transaction<'_>, goal_id: GoalId) -> Result<u8, StoreError> {
    let (total, completed): (i64, i64) = tx.query_row(
        "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks WHERE goal_id = ?1",
        params![goal_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let progress = aggregate_progress(completed as usize, total as usize);
    let changed = tx.execute(
        "UPDATE goals SET progress = ?2 WHERE id = ?1",
        params![goal_id, progress as i64],
    )?;
    if changed == 0 {
        return Err(StoreError::GoalNotFound(goal_id));
    }
    Ok(progress)
}

struct GoalRecord {
    id: GoalId,
    title: String,
    goal_type: String,
    specific: String,
    measurable: String,
    achievable: String,
    relevant: String,
    time_bound: String,
    status: String,
    progress: i64,
    created_at: String,
}

fn goal_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<GoalRecord> {
    Ok(GoalRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        goal_type: row.get(2)?,
        specific: row.get(3)?,
        measurable: row.get(4)?,
        achievable: row.get(5)?,
        relevant: row.get(6)?,
        time_bound: row.get(7)?,
        status: row.get(8)?,
        progress: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn goal_from_record(record: GoalRecord) -> Result<Goal, StoreError> {
    let Some(status) = GoalStatus::parse(&record.status) else {
        return Err(StoreError::Validation("invalid goal row"));
    };
    Ok(Goal {
        id: record.id,
        title: record.title,
        goal_type: record.goal_type,
        specific: record.specific,
        measurable: record.measurable,
        achievable: record.achievable,
        relevant: record.relevant,
        time_bound: record.time_bound,
        status,
        progress: record.progress.clamp(0, 100) as u8,
        created_at: record.created_at,
    })
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        title: row.get(2)?,
        completed: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
    })
}
