use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use shared_database::{DocumentRepository, ListFilter};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::goal::Goal;
use shared_utils::access::{load_owned, not_found};
use shared_utils::AppState;

use crate::models::{CreateGoalRequest, UpdateGoalRequest};
use crate::services::validation::{apply_update, build_goal};

pub struct GoalService {
    goals: Arc<dyn DocumentRepository<Goal>>,
}

impl GoalService {
    pub fn new(state: &AppState) -> Self {
        Self {
            goals: state.repos.goals.clone(),
        }
    }

    pub async fn create_goal(&self, user: &AuthUser, request: CreateGoalRequest) -> Result<Goal, AppError> {
        let now = Utc::now();
        let mut goal = build_goal(&user.id, &request, now).map_err(AppError::Validation)?;
        goal.refresh_progress(now);

        let goal = self.goals.insert(goal).await?;
        info!("Goal {} created for user {}", goal.id, user.id);
        Ok(goal)
    }

    /// Newest first.
    pub async fn list_goals(&self, user: &AuthUser) -> Result<Vec<Goal>, AppError> {
        debug!("Listing goals for user: {}", user.id);
        Ok(self.goals.list(&user.id, &ListFilter::new()).await?)
    }

    pub async fn get_goal(&self, user: &AuthUser, id: &str) -> Result<Goal, AppError> {
        load_owned(self.goals.as_ref(), id, user).await
    }

    /// Applies a partial update and re-derives progress and completion.
    pub async fn update_goal(&self, user: &AuthUser, id: &str, request: UpdateGoalRequest) -> Result<Goal, AppError> {
        let current = load_owned(self.goals.as_ref(), id, user).await?;

        let now = Utc::now();
        let mut goal = apply_update(&current, &request).map_err(AppError::Validation)?;
        goal.refresh_progress(now);
        goal.updated_at = now;

        let goal = self.goals.replace(goal).await?.ok_or_else(not_found::<Goal>)?;
        debug!("Goal {} updated, progress {}", goal.id, goal.progress);
        Ok(goal)
    }

    pub async fn delete_goal(&self, user: &AuthUser, id: &str) -> Result<(), AppError> {
        load_owned(self.goals.as_ref(), id, user).await?;

        self.goals.delete(id).await?.ok_or_else(not_found::<Goal>)?;
        info!("Goal {} deleted by user {}", id, user.id);
        Ok(())
    }
}
