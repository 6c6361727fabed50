use shared_database::{DocumentRepository, OwnedDocument};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

pub fn not_found<T: OwnedDocument>() -> AppError {
    let mut label = T::LABEL.to_string();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    AppError::NotFound(format!("{} not found", label))
}

/// Only the owner may read or change a document. Admins get no exception.
pub fn ensure_owner<T: OwnedDocument>(document: &T, user: &AuthUser) -> Result<(), AppError> {
    if document.owner() != user.id {
        return Err(AppError::Forbidden(format!(
            "Not authorized to access this {}",
            T::LABEL
        )));
    }
    Ok(())
}

/// Loads a document by id: 404 when it does not exist, 403 when it belongs to someone else.
pub async fn load_owned<T: OwnedDocument>(
    repo: &dyn DocumentRepository<T>,
    id: &str,
    user: &AuthUser,
) -> Result<T, AppError> {
    let document = repo.find(id).await?.ok_or_else(not_found::<T>)?;
    ensure_owner(&document, user)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestUser;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use shared_database::Repositories;
    use shared_models::workout::Workout;

    fn workout(owner: &str) -> Workout {
        let now = Utc::now();
        Workout {
            id: "workout-1".to_string(),
            user: owner.to_string(),
            title: "Leg day".to_string(),
            description: "Squats and lunges".to_string(),
            difficulty: "Intermediate".to_string(),
            duration: "45 min".to_string(),
            frequency: "Weekly".to_string(),
            category: "Strength".to_string(),
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_load_owned() {
        let repos = Repositories::in_memory();
        let owner = TestUser::patient("owner@example.com");
        let other = TestUser::patient("other@example.com");
        repos.workouts.insert(workout(&owner.id)).await.unwrap();

        let found = load_owned(repos.workouts.as_ref(), "workout-1", &owner.to_auth_user()).await;
        assert_matches!(found, Ok(w) if w.title == "Leg day");

        let denied = load_owned(repos.workouts.as_ref(), "workout-1", &other.to_auth_user()).await;
        assert_matches!(denied, Err(AppError::Forbidden(msg)) if msg == "Not authorized to access this workout");

        let missing = load_owned(repos.workouts.as_ref(), "nope", &owner.to_auth_user()).await;
        assert_matches!(missing, Err(AppError::NotFound(msg)) if msg == "Workout not found");
    }

    #[test]
    fn test_admin_is_not_an_owner() {
        let owner = TestUser::patient("owner@example.com");
        let admin = TestUser::admin("admin@example.com");

        assert_matches!(
            ensure_owner(&workout(&owner.id), &admin.to_auth_user()),
            Err(AppError::Forbidden(_))
        );
    }
}
