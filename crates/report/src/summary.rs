#![forbid(unsafe_code)]

use sg_core::model::EffectiveStatus;
use sg_core::progress::parse_deadline;
use sg_storage::{GoalFilter, SqliteStore, StoreError};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

const UPCOMING_WINDOW_DAYS: i64 = 7;

/// One goal as it appears in the summary table: stored fields plus the
/// derived status and its task counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSummaryRow {
    pub goal_type: String,
    pub title: String,
    pub status: EffectiveStatus,
    pub progress: u8,
    pub time_bound: String,
    pub tasks_completed: usize,
    pub tasks_total: usize,
}

pub fn summary_rows(
    store: &SqliteStore,
    now: OffsetDateTime,
) -> Result<Vec<GoalSummaryRow>, StoreError> {
    let goals = store.list_goals(GoalFilter::All)?;
    let mut rows = Vec::with_capacity(goals.len());
    for goal in goals {
        let tasks = store.list_tasks_for_goal(goal.id)?;
        let tasks_completed = tasks.iter().filter(|task| task.completed).count();
        let status = goal.effective_status(now);
        rows.push(GoalSummaryRow {
            goal_type: goal.goal_type,
            title: goal.title,
            status,
            progress: goal.progress,
            time_bound: goal.time_bound,
            tasks_completed,
            tasks_total: tasks.len(),
        });
    }
    Ok(rows)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl StatusTally {
    pub fn total(self) -> usize {
        self.active + self.completed + self.overdue
    }
}

pub fn status_tally(rows: &[GoalSummaryRow]) -> StatusTally {
    let mut tally = StatusTally::default();
    for row in rows {
        match row.status {
            EffectiveStatus::Active => tally.active += 1,
            EffectiveStatus::Completed => tally.completed += 1,
            EffectiveStatus::Overdue => tally.overdue += 1,
        }
    }
    tally
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    progress_sum: u64,
}

impl CategoryStats {
    pub fn average_progress(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.progress_sum as f64 / self.total as f64
    }
}

/// Per-type breakdown, keyed by the goal `type` field in sorted order.
pub fn category_stats(rows: &[GoalSummaryRow]) -> BTreeMap<String, CategoryStats> {
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for row in rows {
        let stats = categories.entry(row.goal_type.clone()).or_default();
        stats.total += 1;
        stats.progress_sum += u64::from(row.progress);
        match row.status {
            EffectiveStatus::Active => stats.active += 1,
            EffectiveStatus::Completed => stats.completed += 1,
            EffectiveStatus::Overdue => stats.overdue += 1,
        }
    }
    categories
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpcomingDeadline {
    pub title: String,
    pub goal_type: String,
    pub due: OffsetDateTime,
    pub progress: u8,
}

/// Goals due within the next seven days, soonest first. Overdue goals
/// are excluded; a completed goal whose deadline falls in the window is
/// still listed.
pub fn upcoming_deadlines(rows: &[GoalSummaryRow], now: OffsetDateTime) -> Vec<UpcomingDeadline> {
    let window_end = now + Duration::days(UPCOMING_WINDOW_DAYS);
    let mut upcoming = Vec::new();
    for row in rows {
        if row.status == EffectiveStatus::Overdue {
            continue;
        }
        let Ok(due) = parse_deadline(&row.time_bound) else {
            continue;
        };
        if due <= window_end {
            upcoming.push(UpcomingDeadline {
                title: row.title.clone(),
                goal_type: row.goal_type.clone(),
                due,
                progress: row.progress,
            });
        }
    }
    upcoming.sort_by(|a, b| a.due.cmp(&b.due));
    upcoming
}
