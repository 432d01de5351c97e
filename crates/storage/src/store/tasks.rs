#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, params};
use sg_core::model::{GoalId, Task, TaskId};

impl SqliteStore {
    pub fn create_task(&mut self, request: CreateTaskRequest) -> Result<Task, StoreError> {
        if request.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty"));
        }

        let created_at = now_rfc3339();
        let tx = self.conn.transaction()?;
        if !goal_exists_tx(&tx, request.goal_id)? {
            return Err(StoreError::Validation(
                "goalId must reference an existing goal",
            ));
        }
        tx.execute(
            "INSERT INTO tasks(goal_id, title, completed, created_at) VALUES (?1, ?2, 0, ?3)",
            params![request.goal_id, request.title, created_at],
        )?;
        let id = tx.last_insert_rowid();
        recompute_progress_tx(&tx, request.goal_id)?;
        tx.commit()?;

        Ok(Task {
            id,
            goal_id: request.goal_id,
            title: request.title,
            completed: false,
            created_at,
        })
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task, StoreError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, goal_id, title, completed, created_at FROM tasks WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()?;
        let Some(task) = task else {
            return Err(StoreError::TaskNotFound(id));
        };
        Ok(task)
    }

    /// Tasks of a goal in insertion order. A goal without tasks (or an
    /// unknown goal id) yields an empty list.
    pub fn list_tasks_for_goal(&self, goal_id: GoalId) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, goal_id, title, completed, created_at
              FROM tasks
             WHERE goal_id = ?1
             ORDER BY id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![goal_id], task_from_row)?;
        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn set_task_completed(&mut self, id: TaskId, completed: bool) -> Result<Task, StoreError> {
        let tx = self.conn.transaction()?;
        let row = tx
            .query_row(
                "SELECT goal_id, title, created_at FROM tasks WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, GoalId>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((goal_id, title, created_at)) = row else {
            return Err(StoreError::TaskNotFound(id));
        };

        tx.execute(
            "UPDATE tasks SET completed = ?2 WHERE id = ?1",
            params![id, if completed { 1i64 } else { 0i64 }],
        )?;
        recompute_progress_tx(&tx, goal_id)?;
        tx.commit()?;

        Ok(Task {
            id,
            goal_id,
            title,
            completed,
            created_at,
        })
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let goal_id = tx
            .query_row(
                "SELECT goal_id FROM tasks WHERE id = ?1",
                params![id],
                |row| row.get::<_, GoalId>(0),
            )
            .optional()?;
        let Some(goal_id) = goal_id else {
            return Err(StoreError::TaskNotFound(id));
        };

        tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        recompute_progress_tx(&tx, goal_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Removes every task of a goal and resets its progress to 0. Returns
    /// the number of tasks removed.
    pub fn delete_tasks_for_goal(&mut self, goal_id: GoalId) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        ensure_goal_exists_tx(&tx, goal_id)?;
        let deleted = tx.execute("DELETE FROM tasks WHERE goal_id = ?1", params![goal_id])?;
        recompute_progress_tx(&tx, goal_id)?;
        tx.commit()?;
        Ok(deleted as u64)
    }
}
