use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_LENGTH: (usize, usize) = (3, 100);
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalCategory {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    Cardio,
    Strength,
    Nutrition,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[default]
    Other,
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 7] = [
        GoalCategory::WeightLoss,
        GoalCategory::MuscleGain,
        GoalCategory::Cardio,
        GoalCategory::Strength,
        GoalCategory::Nutrition,
        GoalCategory::MentalHealth,
        GoalCategory::Other,
    ];
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalCategory::WeightLoss => "Weight Loss",
            GoalCategory::MuscleGain => "Muscle Gain",
            GoalCategory::Cardio => "Cardio",
            GoalCategory::Strength => "Strength",
            GoalCategory::Nutrition => "Nutrition",
            GoalCategory::MentalHealth => "Mental Health",
            GoalCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Behind Schedule")]
    BehindSchedule,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 6] = [
        GoalStatus::NotStarted,
        GoalStatus::InProgress,
        GoalStatus::OnTrack,
        GoalStatus::BehindSchedule,
        GoalStatus::Completed,
        GoalStatus::Abandoned,
    ];
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::OnTrack => "On Track",
            GoalStatus::BehindSchedule => "Behind Schedule",
            GoalStatus::Completed => "Completed",
            GoalStatus::Abandoned => "Abandoned",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
    #[default]
    None,
}

impl ReminderFrequency {
    pub const ALL: [ReminderFrequency; 4] = [
        ReminderFrequency::Daily,
        ReminderFrequency::Weekly,
        ReminderFrequency::Monthly,
        ReminderFrequency::None,
    ];
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderFrequency::Daily => write!(f, "daily"),
            ReminderFrequency::Weekly => write!(f, "weekly"),
            ReminderFrequency::Monthly => write!(f, "monthly"),
            ReminderFrequency::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub value: f64,
    #[serde(default)]
    pub achieved: bool,
    #[serde(default)]
    pub achieved_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub frequency: ReminderFrequency,
    pub time: String,
    pub enabled: bool,
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            frequency: ReminderFrequency::None,
            time: "09:00".to_string(),
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub status: GoalStatus,
    pub progress: f64,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub reminders: Reminders,
    pub is_completed: bool,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Recomputes derived state before every save.
    ///
    /// Progress is the share of the target reached, capped at 100. Reaching 100 completes
    /// the goal once; later saves keep the original completion date.
    pub fn refresh_progress(&mut self, now: DateTime<Utc>) {
        if self.target_value > 0.0 {
            self.progress = (self.current_value / self.target_value * 100.0).clamp(0.0, 100.0);
        }

        if self.progress >= 100.0 && !self.is_completed {
            self.is_completed = true;
            self.completed_date = Some(now);
            self.status = GoalStatus::Completed;
        }
    }

    /// Whole days left until the target date, rounded up and never negative.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let remaining = (self.target_date - now).num_seconds();
        if remaining <= 0 {
            return 0;
        }
        (remaining + 86_399) / 86_400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_goal(now: DateTime<Utc>) -> Goal {
        Goal {
            id: "goal-1".to_string(),
            user: "user-1".to_string(),
            title: "Run 100km".to_string(),
            description: "Accumulated distance this quarter".to_string(),
            category: GoalCategory::Cardio,
            target_value: 100.0,
            current_value: 0.0,
            unit: "km".to_string(),
            start_date: now,
            target_date: now + Duration::days(90),
            status: GoalStatus::NotStarted,
            progress: 0.0,
            milestones: Vec::new(),
            reminders: Reminders::default(),
            is_completed: false,
            completed_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_progress_is_share_of_target() {
        let now = Utc::now();
        let mut goal = sample_goal(now);
        goal.current_value = 25.0;
        goal.refresh_progress(now);

        assert_eq!(goal.progress, 25.0);
        assert!(!goal.is_completed);
        assert_eq!(goal.status, GoalStatus::NotStarted);
    }

    #[test]
    fn test_reaching_target_completes_once() {
        let now = Utc::now();
        let mut goal = sample_goal(now);
        goal.current_value = 130.0;
        goal.refresh_progress(now);

        assert_eq!(goal.progress, 100.0);
        assert!(goal.is_completed);
        assert_eq!(goal.completed_date, Some(now));
        assert_eq!(goal.status, GoalStatus::Completed);

        let later = now + Duration::days(1);
        goal.refresh_progress(later);
        assert_eq!(goal.completed_date, Some(now));
    }

    #[test]
    fn test_zero_target_leaves_progress_alone() {
        let now = Utc::now();
        let mut goal = sample_goal(now);
        goal.target_value = 0.0;
        goal.progress = 40.0;
        goal.refresh_progress(now);

        assert_eq!(goal.progress, 40.0);
    }

    #[test]
    fn test_days_remaining() {
        let now = Utc::now();
        let mut goal = sample_goal(now);
        assert_eq!(goal.days_remaining(now), 90);

        goal.target_date = now + Duration::hours(1);
        assert_eq!(goal.days_remaining(now), 1);

        goal.target_date = now - Duration::days(3);
        assert_eq!(goal.days_remaining(now), 0);
    }

    #[test]
    fn test_enum_labels() {
        assert_eq!(serde_json::to_value(GoalCategory::MuscleGain).unwrap(), "Muscle Gain");
        assert_eq!(serde_json::to_value(GoalStatus::BehindSchedule).unwrap(), "Behind Schedule");
        assert_eq!(serde_json::to_value(ReminderFrequency::None).unwrap(), "none");
        for status in GoalStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
    }
}
