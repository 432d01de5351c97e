#![forbid(unsafe_code)]

use sg_core::model::GoalId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateGoalRequest {
    pub title: String,
    pub goal_type: String,
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateGoalRequest {
    pub title: String,
    pub goal_type: String,
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub goal_id: GoalId,
    pub title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalFilter {
    All,
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub goals: usize,
    pub tasks: usize,
}
