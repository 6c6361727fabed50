use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::goal::{
    Goal, GoalCategory, GoalStatus, Milestone, ReminderFrequency, Reminders, DESCRIPTION_MAX_LENGTH,
    TITLE_LENGTH,
};
use shared_models::validation::{non_blank, one_of, parse_datetime, parse_enum, text_length, FieldErrors, NumberInput};

use crate::models::{CreateGoalRequest, MilestoneInput, RemindersInput, UpdateGoalRequest};

/// Builds a new goal for `owner`. Progress is not derived yet.
pub fn build_goal(owner: &str, request: &CreateGoalRequest, now: DateTime<Utc>) -> Result<Goal, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = errors.check("title", title(request.title.as_deref()));
    let description = errors.check("description", description(request.description.as_deref()));
    let category = errors.check("category", category(request.category.as_deref()));
    let target_value = errors.check("targetValue", target_value(request.target_value.as_ref()));
    let current_value = errors.check("currentValue", current_value(request.current_value.as_ref()));
    let unit = errors.check("unit", unit(request.unit.as_deref()));
    let target_date = errors.check("targetDate", required_date(request.target_date.as_deref(), "Target date"));
    let start_date = match request.start_date.as_deref().and_then(|raw| non_blank(Some(raw))) {
        Some(raw) => errors.check("startDate", date(&raw, "Start date")),
        None => Some(now),
    };
    let milestones = match request.milestones.as_deref() {
        Some(inputs) => errors.check("milestones", milestones(inputs)),
        None => Some(Vec::new()),
    };
    let reminders = match request.reminders.as_ref() {
        Some(input) => errors.check("reminders", reminders(Reminders::default(), input)),
        None => Some(Reminders::default()),
    };

    let (
        Some(title),
        Some(description),
        Some(category),
        Some(target_value),
        Some(current_value),
        Some(unit),
        Some(target_date),
        Some(start_date),
        Some(milestones),
        Some(reminders),
    ) = (
        title,
        description,
        category,
        target_value,
        current_value,
        unit,
        target_date,
        start_date,
        milestones,
        reminders,
    )
    else {
        return Err(errors);
    };

    Ok(Goal {
        id: Uuid::new_v4().to_string(),
        user: owner.to_string(),
        title,
        description,
        category,
        target_value,
        current_value: current_value.unwrap_or(0.0),
        unit,
        start_date,
        target_date,
        status: GoalStatus::NotStarted,
        progress: 0.0,
        milestones,
        reminders,
        is_completed: false,
        completed_date: None,
        created_at: now,
        updated_at: now,
    })
}

/// Applies the present fields to a copy of `goal`. Nothing changes unless every field is valid.
pub fn apply_update(goal: &Goal, update: &UpdateGoalRequest) -> Result<Goal, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut updated = goal.clone();

    if let Some(raw) = update.title.as_deref() {
        if let Some(value) = errors.check("title", title(Some(raw))) {
            updated.title = value;
        }
    }
    if let Some(raw) = update.description.as_deref() {
        if let Some(value) = errors.check("description", description(Some(raw))) {
            updated.description = value;
        }
    }
    if let Some(raw) = update.category.as_deref() {
        if let Some(value) = errors.check("category", category(Some(raw))) {
            updated.category = value;
        }
    }
    if let Some(raw) = update.target_value.as_ref() {
        if let Some(value) = errors.check("targetValue", target_value(Some(raw))) {
            updated.target_value = value;
        }
    }
    if let Some(raw) = update.current_value.as_ref() {
        if let Some(Some(value)) = errors.check("currentValue", current_value(Some(raw))) {
            updated.current_value = value;
        }
    }
    if let Some(raw) = update.unit.as_deref() {
        if let Some(value) = errors.check("unit", unit(Some(raw))) {
            updated.unit = value;
        }
    }
    if let Some(raw) = update.target_date.as_deref() {
        if let Some(value) = errors.check("targetDate", required_date(Some(raw), "Target date")) {
            updated.target_date = value;
        }
    }
    if let Some(raw) = update.status.as_deref() {
        if let Some(value) = errors.check("status", status(raw)) {
            updated.status = value;
        }
    }
    if let Some(inputs) = update.milestones.as_deref() {
        if let Some(value) = errors.check("milestones", milestones(inputs)) {
            updated.milestones = value;
        }
    }
    if let Some(input) = update.reminders.as_ref() {
        if let Some(value) = errors.check("reminders", reminders(goal.reminders.clone(), input)) {
            updated.reminders = value;
        }
    }

    if errors.is_empty() {
        Ok(updated)
    } else {
        Err(errors)
    }
}

fn title(raw: Option<&str>) -> Result<String, String> {
    let (min, max) = TITLE_LENGTH;
    let title = non_blank(raw).ok_or_else(|| "Goal title is required".to_string())?;
    let length = text_length(&title);
    if length < min {
        return Err(format!("Goal title must be at least {} characters long", min));
    }
    if length > max {
        return Err(format!("Goal title cannot exceed {} characters", max));
    }
    Ok(title)
}

fn description(raw: Option<&str>) -> Result<String, String> {
    let description = non_blank(raw).ok_or_else(|| "Goal description is required".to_string())?;
    if text_length(&description) > DESCRIPTION_MAX_LENGTH {
        return Err(format!("Description cannot exceed {} characters", DESCRIPTION_MAX_LENGTH));
    }
    Ok(description)
}

fn category(raw: Option<&str>) -> Result<GoalCategory, String> {
    let raw = non_blank(raw).ok_or_else(|| "Category is required".to_string())?;
    parse_enum(&raw).ok_or_else(|| format!("Category must be one of: {}", one_of(&GoalCategory::ALL)))
}

fn status(raw: &str) -> Result<GoalStatus, String> {
    parse_enum(raw).ok_or_else(|| format!("Status must be one of: {}", one_of(&GoalStatus::ALL)))
}

fn number(raw: Option<&NumberInput>, label: &str) -> Result<Option<f64>, String> {
    match raw.and_then(NumberInput::value) {
        None => Ok(None),
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(())) => Err(format!("{} must be a number", label)),
    }
}

fn target_value(raw: Option<&NumberInput>) -> Result<f64, String> {
    let value = number(raw, "Target value")?.ok_or_else(|| "Target value is required".to_string())?;
    if value <= 0.0 {
        return Err("Target value must be greater than 0".to_string());
    }
    Ok(value)
}

/// `None` when absent; new goals then start from zero.
fn current_value(raw: Option<&NumberInput>) -> Result<Option<f64>, String> {
    let value = number(raw, "Current value")?;
    if value.is_some_and(|v| v < 0.0) {
        return Err("Current value cannot be negative".to_string());
    }
    Ok(value)
}

fn unit(raw: Option<&str>) -> Result<String, String> {
    non_blank(raw).ok_or_else(|| "Unit is required".to_string())
}

fn date(raw: &str, label: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(raw).ok_or_else(|| format!("{} must be a valid date", label))
}

fn required_date(raw: Option<&str>, label: &str) -> Result<DateTime<Utc>, String> {
    let raw = non_blank(raw).ok_or_else(|| format!("{} is required", label))?;
    date(&raw, label)
}

fn milestones(inputs: &[MilestoneInput]) -> Result<Vec<Milestone>, String> {
    inputs
        .iter()
        .map(|input| -> Result<Milestone, String> {
            let achieved_date = match non_blank(input.achieved_date.as_deref()) {
                Some(raw) => Some(date(&raw, "Milestone achieved date")?),
                None => None,
            };
            Ok(Milestone {
                value: input.value,
                achieved: input.achieved.unwrap_or(false),
                achieved_date,
            })
        })
        .collect()
}

fn reminders(current: Reminders, input: &RemindersInput) -> Result<Reminders, String> {
    let mut reminders = current;
    if let Some(raw) = input.frequency.as_deref() {
        reminders.frequency = parse_enum::<ReminderFrequency>(raw).ok_or_else(|| {
            format!("Reminder frequency must be one of: {}", one_of(&ReminderFrequency::ALL))
        })?;
    }
    if let Some(time) = non_blank(input.time.as_deref()) {
        reminders.time = time;
    }
    if let Some(enabled) = input.enabled {
        reminders.enabled = enabled;
    }
    Ok(reminders)
}
