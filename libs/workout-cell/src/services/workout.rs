use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{DocumentRepository, ListFilter};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::validation::{non_blank, FieldErrors, NumberInput};
use shared_models::workout::{Exercise, Workout, DEFAULT_FREQUENCY};
use shared_utils::access::{load_owned, not_found};
use shared_utils::AppState;

use crate::models::{ExerciseInput, WorkoutRequest};

pub struct WorkoutService {
    workouts: Arc<dyn DocumentRepository<Workout>>,
}

impl WorkoutService {
    pub fn new(state: &AppState) -> Self {
        Self {
            workouts: state.repos.workouts.clone(),
        }
    }

    pub async fn create_workout(&self, user: &AuthUser, request: WorkoutRequest) -> Result<Workout, AppError> {
        let mut errors = FieldErrors::new();

        let title = errors.check("title", required(request.title.as_deref(), "Title"));
        let description = errors.check("description", required(request.description.as_deref(), "Description"));
        let difficulty = errors.check("difficulty", required(request.difficulty.as_deref(), "Difficulty"));
        let duration = errors.check("duration", required(request.duration.as_deref(), "Duration"));
        let category = errors.check("category", required(request.category.as_deref(), "Category"));
        let exercises = match request.exercises.as_deref() {
            Some(inputs) => errors.check("exercises", exercises(inputs)),
            None => Some(Vec::new()),
        };

        let (Some(title), Some(description), Some(difficulty), Some(duration), Some(category), Some(exercises)) =
            (title, description, difficulty, duration, category, exercises)
        else {
            return Err(AppError::Validation(errors));
        };

        let now = Utc::now();
        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            user: user.id.clone(),
            title,
            description,
            difficulty,
            duration,
            frequency: non_blank(request.frequency.as_deref()).unwrap_or_else(|| DEFAULT_FREQUENCY.to_string()),
            category,
            exercises,
            created_at: now,
            updated_at: now,
        };

        let workout = self.workouts.insert(workout).await?;
        info!("Workout {} created for user {}", workout.id, user.id);
        Ok(workout)
    }

    /// Newest first.
    pub async fn list_workouts(&self, user: &AuthUser) -> Result<Vec<Workout>, AppError> {
        debug!("Listing workouts for user: {}", user.id);
        Ok(self.workouts.list(&user.id, &ListFilter::new()).await?)
    }

    pub async fn get_workout(&self, user: &AuthUser, id: &str) -> Result<Workout, AppError> {
        load_owned(self.workouts.as_ref(), id, user).await
    }

    pub async fn update_workout(&self, user: &AuthUser, id: &str, request: WorkoutRequest) -> Result<Workout, AppError> {
        let mut workout = load_owned(self.workouts.as_ref(), id, user).await?;
        let mut errors = FieldErrors::new();

        for (field, label, raw, target) in [
            ("title", "Title", &request.title, &mut workout.title),
            ("description", "Description", &request.description, &mut workout.description),
            ("difficulty", "Difficulty", &request.difficulty, &mut workout.difficulty),
            ("duration", "Duration", &request.duration, &mut workout.duration),
            ("frequency", "Frequency", &request.frequency, &mut workout.frequency),
            ("category", "Category", &request.category, &mut workout.category),
        ] {
            if let Some(raw) = raw.as_deref() {
                if let Some(value) = errors.check(field, required(Some(raw), label)) {
                    *target = value;
                }
            }
        }
        if let Some(inputs) = request.exercises.as_deref() {
            if let Some(value) = errors.check("exercises", exercises(inputs)) {
                workout.exercises = value;
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        workout.updated_at = Utc::now();

        let workout = self.workouts.replace(workout).await?.ok_or_else(not_found::<Workout>)?;
        debug!("Workout {} updated", workout.id);
        Ok(workout)
    }

    pub async fn delete_workout(&self, user: &AuthUser, id: &str) -> Result<(), AppError> {
        load_owned(self.workouts.as_ref(), id, user).await?;

        self.workouts.delete(id).await?.ok_or_else(not_found::<Workout>)?;
        info!("Workout {} deleted by user {}", id, user.id);
        Ok(())
    }
}

fn required(raw: Option<&str>, label: &str) -> Result<String, String> {
    non_blank(raw).ok_or_else(|| format!("{} is required", label))
}

fn exercises(inputs: &[ExerciseInput]) -> Result<Vec<Exercise>, String> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| -> Result<Exercise, String> {
            let name = non_blank(input.name.as_deref())
                .ok_or_else(|| format!("Exercise {} needs a name", i + 1))?;
            let sets = match input.sets.as_ref().and_then(NumberInput::value) {
                None => 0,
                Some(Ok(n)) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => n as u32,
                Some(_) => return Err(format!("Exercise {} sets must be a whole number", i + 1)),
            };
            Ok(Exercise {
                name,
                sets,
                reps: input.reps.clone().unwrap_or_default(),
                rest: input.rest.clone().unwrap_or_default(),
            })
        })
        .collect()
}
