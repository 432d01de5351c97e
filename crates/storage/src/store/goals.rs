#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, params};
use sg_core::model::{Goal, GoalId, GoalStatus};

impl SqliteStore {
    pub fn create_goal(&mut self, request: CreateGoalRequest) -> Result<Goal, StoreError> {
        validate_goal_fields(&request.title, &request.goal_type, &request.time_bound)?;

        let created_at = now_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO goals(title, type, specific, measurable, achievable, relevant, time_bound, status, progress, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9)
            "#,
            params![
                request.title,
                request.goal_type,
                request.specific,
                request.measurable,
                request.achievable,
                request.relevant,
                request.time_bound,
                GoalStatus::Active.as_str(),
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Goal {
            id,
            title: request.title,
            goal_type: request.goal_type,
            specific: request.specific,
            measurable: request.measurable,
            achievable: request.achievable,
            relevant: request.relevant,
            time_bound: request.time_bound,
            status: GoalStatus::Active,
            progress: 0,
            created_at,
        })
    }

    /// Replaces the descriptive fields of a goal. Status, progress and the
    /// creation timestamp are kept as stored.
    pub fn update_goal(
        &mut self,
        id: GoalId,
        request: UpdateGoalRequest,
    ) -> Result<Goal, StoreError> {
        validate_goal_fields(&request.title, &request.goal_type, &request.time_bound)?;

        let tx = self.conn.transaction()?;
        let row = tx
            .query_row(
                "SELECT status, progress, created_at FROM goals WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((status_raw, progress, created_at)) = row else {
            return Err(StoreError::GoalNotFound(id));
        };
        let Some(status) = GoalStatus::parse(&status_raw) else {
            return Err(StoreError::Validation("invalid goal row"));
        };

        tx.execute(
            r#"
            UPDATE goals
               SET title = ?2, type = ?3, specific = ?4, measurable = ?5,
                   achievable = ?6, relevant = ?7, time_bound = ?8
             WHERE id = ?1
            "#,
            params![
                id,
                request.title,
                request.goal_type,
                request.specific,
                request.measurable,
                request.achievable,
                request.relevant,
                request.time_bound,
            ],
        )?;
        tx.commit()?;

        Ok(Goal {
            id,
            title: request.title,
            goal_type: request.goal_type,
            specific: request.specific,
            measurable: request.measurable,
            achievable: request.achievable,
            relevant: request.relevant,
            time_bound: request.time_bound,
            status,
            progress: progress.clamp(0, 100) as u8,
            created_at,
        })
    }

    pub fn get_goal(&self, id: GoalId) -> Result<Goal, StoreError> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT id, title, type, specific, measurable, achievable, relevant,
                       time_bound, status, progress, created_at
                  FROM goals
                 WHERE id = ?1
                "#,
                params![id],
                goal_record,
            )
            .optional()?;
        let Some(record) = record else {
            return Err(StoreError::GoalNotFound(id));
        };
        goal_from_record(record)
    }

    pub fn list_goals(&self, filter: GoalFilter) -> Result<Vec<Goal>, StoreError> {
        let sql = match filter {
            GoalFilter::All => {
                r#"
                SELECT id, title, type, specific, measurable, achievable, relevant,
                       time_bound, status, progress, created_at
                  FROM goals
                 ORDER BY id ASC
                "#
            }
            GoalFilter::Active => {
                r#"
                SELECT id, title, type, specific, measurable, achievable, relevant,
                       time_bound, status, progress, created_at
                  FROM goals
                 WHERE status = 'active'
                 ORDER BY id ASC
                "#
            }
            GoalFilter::Completed => {
                r#"
                SELECT id, title, type, specific, measurable, achievable, relevant,
                       time_bound, status, progress, created_at
                  FROM goals
                 WHERE status = 'completed'
                 ORDER BY id ASC
                "#
            }
        };

        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt.query_map([], goal_record)?;
        let mut goals = Vec::new();
        for record in records {
            goals.push(goal_from_record(record?)?);
        }
        Ok(goals)
    }

    /// Deletes a goal together with its tasks in one transaction. Returns
    /// the number of tasks removed with it.
    pub fn delete_goal(&mut self, id: GoalId) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        ensure_goal_exists_tx(&tx, id)?;
        let tasks_deleted = tx.execute("DELETE FROM tasks WHERE goal_id = ?1", params![id])?;
        tx.execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(tasks_deleted as u64)
    }

    pub fn set_goal_status(&mut self, id: GoalId, status: GoalStatus) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE goals SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if changed == 0 {
            return Err(StoreError::GoalNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    pub fn set_goal_progress(&mut self, id: GoalId, percent: u8) -> Result<(), StoreError> {
        let percent = percent.min(100);
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE goals SET progress = ?2 WHERE id = ?1",
            params![id, percent as i64],
        )?;
        if changed == 0 {
            return Err(StoreError::GoalNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }
}
