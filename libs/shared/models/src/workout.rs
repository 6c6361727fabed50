use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FREQUENCY: &str = "Weekly";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub duration: String,
    pub frequency: String,
    pub category: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}
