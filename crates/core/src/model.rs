#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::progress::parse_deadline;

pub type GoalId = i64;
pub type TaskId = i64;

/// Stored lifecycle state of a goal. `Overdue` is intentionally absent:
/// it is derived from the deadline at read time, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(GoalStatus::Active),
            "completed" => Some(GoalStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveStatus {
    Active,
    Completed,
    Overdue,
}

impl EffectiveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveStatus::Active => "active",
            EffectiveStatus::Completed => "completed",
            EffectiveStatus::Overdue => "overdue",
        }
    }

    pub fn derive(status: GoalStatus, deadline: OffsetDateTime, now: OffsetDateTime) -> Self {
        if status == GoalStatus::Completed {
            return EffectiveStatus::Completed;
        }
        if deadline < now {
            return EffectiveStatus::Overdue;
        }
        EffectiveStatus::Active
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(rename = "type")]
    pub goal_type: String,
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
    pub status: GoalStatus,
    pub progress: u8,
    pub created_at: String,
}

impl Goal {
    pub fn effective_status(&self, now: OffsetDateTime) -> EffectiveStatus {
        match parse_deadline(&self.time_bound) {
            Ok(deadline) => EffectiveStatus::derive(self.status, deadline, now),
            // An unreadable deadline never counts as overdue.
            Err(_) => match self.status {
                GoalStatus::Active => EffectiveStatus::Active,
                GoalStatus::Completed => EffectiveStatus::Completed,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub goal_id: GoalId,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}
