use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{DocumentRepository, ListFilter};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::meal_prep::{MealPrep, MealPrepStatus, PrepStep};
use shared_models::validation::{non_blank, one_of, parse_enum, FieldErrors};
use shared_utils::access::{load_owned, not_found};
use shared_utils::AppState;

use crate::models::{MealPrepRequest, PrepStepInput};

pub struct MealPrepService {
    meal_preps: Arc<dyn DocumentRepository<MealPrep>>,
}

impl MealPrepService {
    pub fn new(state: &AppState) -> Self {
        Self {
            meal_preps: state.repos.meal_preps.clone(),
        }
    }

    pub async fn create_meal_prep(&self, user: &AuthUser, request: MealPrepRequest) -> Result<MealPrep, AppError> {
        let mut errors = FieldErrors::new();

        let title = errors.check("title", required(request.title.as_deref(), "Title"));
        let description = errors.check("description", required(request.description.as_deref(), "Description"));
        let total_time = errors.check("totalTime", required(request.total_time.as_deref(), "Total time"));
        let scheduled_date = errors.check("scheduledDate", required(request.scheduled_date.as_deref(), "Scheduled date"));
        let steps = errors.check(
            "steps",
            request.steps.as_deref().ok_or_else(|| "Steps are required".to_string()).and_then(prep_steps),
        );
        let status = match request.status.as_deref() {
            Some(raw) => errors.check("status", status(raw)),
            None => Some(MealPrepStatus::default()),
        };

        let (Some(title), Some(description), Some(total_time), Some(scheduled_date), Some(steps), Some(status)) =
            (title, description, total_time, scheduled_date, steps, status)
        else {
            return Err(AppError::Validation(errors));
        };

        let now = Utc::now();
        let meal_prep = MealPrep {
            id: Uuid::new_v4().to_string(),
            user: user.id.clone(),
            title,
            description,
            total_time,
            scheduled_date,
            steps,
            status,
            created_at: now,
            updated_at: now,
        };

        let meal_prep = self.meal_preps.insert(meal_prep).await?;
        info!("Meal preparation {} created for user {}", meal_prep.id, user.id);
        Ok(meal_prep)
    }

    /// Latest scheduled first, ties broken by creation time.
    pub async fn list_meal_preps(&self, user: &AuthUser, status_filter: Option<&str>) -> Result<Vec<MealPrep>, AppError> {
        let mut filter = ListFilter::new();
        if let Some(raw) = status_filter.filter(|raw| !raw.trim().is_empty()) {
            let status = status(raw).map_err(|message| {
                let mut errors = FieldErrors::new();
                errors.add("status", message);
                AppError::Validation(errors)
            })?;
            filter = filter.eq("status", status.to_string());
        }

        debug!("Listing meal preparations for user: {}", user.id);
        Ok(self.meal_preps.list(&user.id, &filter).await?)
    }

    pub async fn get_meal_prep(&self, user: &AuthUser, id: &str) -> Result<MealPrep, AppError> {
        load_owned(self.meal_preps.as_ref(), id, user).await
    }

    pub async fn update_meal_prep(&self, user: &AuthUser, id: &str, request: MealPrepRequest) -> Result<MealPrep, AppError> {
        let mut meal_prep = load_owned(self.meal_preps.as_ref(), id, user).await?;
        let mut errors = FieldErrors::new();

        for (field, label, raw, target) in [
            ("title", "Title", &request.title, &mut meal_prep.title),
            ("description", "Description", &request.description, &mut meal_prep.description),
            ("totalTime", "Total time", &request.total_time, &mut meal_prep.total_time),
            ("scheduledDate", "Scheduled date", &request.scheduled_date, &mut meal_prep.scheduled_date),
        ] {
            if let Some(raw) = raw.as_deref() {
                if let Some(value) = errors.check(field, required(Some(raw), label)) {
                    *target = value;
                }
            }
        }
        if let Some(inputs) = request.steps.as_deref() {
            if let Some(steps) = errors.check("steps", prep_steps(inputs)) {
                meal_prep.steps = steps;
            }
        }
        if let Some(raw) = request.status.as_deref() {
            if let Some(status) = errors.check("status", status(raw)) {
                meal_prep.status = status;
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        meal_prep.updated_at = Utc::now();

        let meal_prep = self.meal_preps.replace(meal_prep).await?.ok_or_else(not_found::<MealPrep>)?;
        debug!("Meal preparation {} updated to {}", meal_prep.id, meal_prep.status);
        Ok(meal_prep)
    }

    /// Returns the removed document.
    pub async fn delete_meal_prep(&self, user: &AuthUser, id: &str) -> Result<MealPrep, AppError> {
        load_owned(self.meal_preps.as_ref(), id, user).await?;

        let removed = self.meal_preps.delete(id).await?.ok_or_else(not_found::<MealPrep>)?;
        info!("Meal preparation {} deleted by user {}", id, user.id);
        Ok(removed)
    }
}

fn required(raw: Option<&str>, label: &str) -> Result<String, String> {
    non_blank(raw).ok_or_else(|| format!("{} is required", label))
}

fn status(raw: &str) -> Result<MealPrepStatus, String> {
    parse_enum(raw).ok_or_else(|| format!("Status must be one of: {}", one_of(&MealPrepStatus::ALL)))
}

fn prep_steps(inputs: &[PrepStepInput]) -> Result<Vec<PrepStep>, String> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| -> Result<PrepStep, String> {
            let missing = |field: &str| format!("Step {}: {} is required", i + 1, field);
            Ok(PrepStep {
                step: non_blank(input.step.as_deref()).ok_or_else(|| missing("step"))?,
                duration: non_blank(input.duration.as_deref()).ok_or_else(|| missing("duration"))?,
                tasks: input.tasks.clone().ok_or_else(|| missing("tasks"))?,
                tips: input.tips.clone().ok_or_else(|| missing("tips"))?,
                icon: input.icon.clone().ok_or_else(|| missing("icon"))?,
            })
        })
        .collect()
}
