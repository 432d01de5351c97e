#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, Transaction, params};
use sg_core::backup::{BACKUP_VERSION, Backup, BackupData};
use sg_core::progress::parse_deadline;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const LAST_EXPORT_KEY: &str = "last_export_at";
const BACKUP_STALE_AFTER_DAYS: i64 = 7;

impl SqliteStore {
    /// Snapshots both collections and records the export time.
    pub fn export_backup(&mut self) -> Result<Backup, StoreError> {
        let timestamp = now_rfc3339();
        let tx = self.conn.transaction()?;

        let mut goals = Vec::new();
        {
            let mut stmt = tx.prepare(
                r#"
                SELECT id, title, type, specific, measurable, achievable, relevant,
                       time_bound, status, progress, created_at
                  FROM goals
                 ORDER BY id ASC
                "#,
            )?;
            let records = stmt.query_map([], goal_record)?;
            for record in records {
                goals.push(goal_from_record(record?)?);
            }
        }

        let mut tasks = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT id, goal_id, title, completed, created_at FROM tasks ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], task_from_row)?;
            for task in rows {
                tasks.push(task?);
            }
        }

        meta_set_tx(&tx, LAST_EXPORT_KEY, &timestamp)?;
        tx.commit()?;

        Ok(Backup {
            version: BACKUP_VERSION.to_string(),
            timestamp,
            data: BackupData { goals, tasks },
        })
    }

    /// Replaces the whole database with the contents of a backup. The
    /// snapshot is validated up front; nothing is written unless every
    /// record passes, and the replacement itself is one transaction.
    pub fn import_backup(&mut self, backup: &Backup) -> Result<ImportStats, StoreError> {
        validate_backup(backup)?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM goals", [])?;

        for goal in &backup.data.goals {
            tx.execute(
                r#"
                INSERT INTO goals(id, title, type, specific, measurable, achievable, relevant, time_bound, status, progress, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    goal.id,
                    goal.title,
                    goal.goal_type,
                    goal.specific,
                    goal.measurable,
                    goal.achievable,
                    goal.relevant,
                    goal.time_bound,
                    goal.status.as_str(),
                    goal.progress as i64,
                    goal.created_at,
                ],
            )?;
        }
        for task in &backup.data.tasks {
            tx.execute(
                "INSERT INTO tasks(id, goal_id, title, completed, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task.id,
                    task.goal_id,
                    task.title,
                    if task.completed { 1i64 } else { 0i64 },
                    task.created_at,
                ],
            )?;
        }
        tx.commit()?;

        Ok(ImportStats {
            goals: backup.data.goals.len(),
            tasks: backup.data.tasks.len(),
        })
    }

    pub fn import_backup_json(&mut self, json: &str) -> Result<ImportStats, StoreError> {
        let backup: Backup =
            serde_json::from_str(json).map_err(|err| StoreError::ImportFormat(err.to_string()))?;
        self.import_backup(&backup)
    }

    pub fn last_export_at(&self) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_EXPORT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// True when the last export is more than seven days old or was never
    /// taken. An unreadable export timestamp also counts as stale.
    pub fn backup_needed(&self, now: OffsetDateTime) -> Result<bool, StoreError> {
        let Some(raw) = self.last_export_at()? else {
            return Ok(true);
        };
        let Ok(last) = OffsetDateTime::parse(&raw, &Rfc3339) else {
            return Ok(true);
        };
        Ok((now - last).whole_days() > BACKUP_STALE_AFTER_DAYS)
    }
}

fn validate_backup(backup: &Backup) -> Result<(), StoreError> {
    let mut goal_ids = BTreeSet::new();
    for goal in &backup.data.goals {
        if goal.id <= 0 {
            return Err(StoreError::ImportFormat(format!(
                "goal id {} is not a positive integer",
                goal.id
            )));
        }
        if !goal_ids.insert(goal.id) {
            return Err(StoreError::ImportFormat(format!(
                "duplicate goal id {}",
                goal.id
            )));
        }
        if goal.title.trim().is_empty() {
            return Err(StoreError::ImportFormat(format!(
                "goal {}: title must not be empty",
                goal.id
            )));
        }
        if goal.goal_type.trim().is_empty() {
            return Err(StoreError::ImportFormat(format!(
                "goal {}: type must not be empty",
                goal.id
            )));
        }
        if parse_deadline(&goal.time_bound).is_err() {
            return Err(StoreError::ImportFormat(format!(
                "goal {}: timeBound must be an ISO date or date-time",
                goal.id
            )));
        }
        if goal.progress > 100 {
            return Err(StoreError::ImportFormat(format!(
                "goal {}: progress must be within 0..=100",
                goal.id
            )));
        }
    }

    let mut task_ids = BTreeSet::new();
    for task in &backup.data.tasks {
        if task.id <= 0 {
            return Err(StoreError::ImportFormat(format!(
                "task id {} is not a positive integer",
                task.id
            )));
        }
        if !task_ids.insert(task.id) {
            return Err(StoreError::ImportFormat(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        if task.title.trim().is_empty() {
            return Err(StoreError::ImportFormat(format!(
                "task {}: title must not be empty",
                task.id
            )));
        }
        if !goal_ids.contains(&task.goal_id) {
            return Err(StoreError::ImportFormat(format!(
                "task {}: goalId {} does not match any imported goal",
                task.id, task.goal_id
            )));
        }
    }
    Ok(())
}

fn meta_set_tx(tx: &Transaction<'_>, key: &str, value: &str) -> Result<(), StoreError> {
    tx.execute(
        r#"
        INSERT INTO meta(key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
        params![key, value],
    )?;
    Ok(())
}
