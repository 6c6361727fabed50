use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::goal::Goal;
use shared_models::validation::NumberInput;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_value: Option<NumberInput>,
    pub current_value: Option<NumberInput>,
    pub unit: Option<String>,
    pub start_date: Option<String>,
    pub target_date: Option<String>,
    pub milestones: Option<Vec<MilestoneInput>>,
    pub reminders: Option<RemindersInput>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_value: Option<NumberInput>,
    pub current_value: Option<NumberInput>,
    pub unit: Option<String>,
    pub target_date: Option<String>,
    pub status: Option<String>,
    pub milestones: Option<Vec<MilestoneInput>>,
    pub reminders: Option<RemindersInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneInput {
    pub value: f64,
    pub achieved: Option<bool>,
    pub achieved_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemindersInput {
    pub frequency: Option<String>,
    pub time: Option<String>,
    pub enabled: Option<bool>,
}

/// A goal as returned to the client, with the days left until its target date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub time_remaining: i64,
}

impl GoalView {
    pub fn new(goal: Goal, now: DateTime<Utc>) -> Self {
        let time_remaining = goal.days_remaining(now);
        Self { goal, time_remaining }
    }
}
