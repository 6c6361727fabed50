use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealPrepStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl MealPrepStatus {
    pub const ALL: [MealPrepStatus; 3] = [
        MealPrepStatus::Planned,
        MealPrepStatus::InProgress,
        MealPrepStatus::Completed,
    ];
}

impl fmt::Display for MealPrepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealPrepStatus::Planned => write!(f, "planned"),
            MealPrepStatus::InProgress => write!(f, "in_progress"),
            MealPrepStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepStep {
    pub step: String,
    pub duration: String,
    pub tasks: Vec<String>,
    pub tips: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPrep {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub title: String,
    pub description: String,
    pub total_time: String,
    pub scheduled_date: String,
    pub steps: Vec<PrepStep>,
    pub status: MealPrepStatus,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        for status in MealPrepStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
        assert_eq!(MealPrepStatus::default(), MealPrepStatus::Planned);
    }
}
