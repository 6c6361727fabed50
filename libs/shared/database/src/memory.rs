//! In-process repositories, used by the test suites and by `DATABASE_URL=memory://`.
//!
//! Nothing is persisted across restarts.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use shared_models::user::{ProfileChanges, User, UserCredentials};

use crate::error::DatabaseError;
use crate::repository::{DocumentRepository, ListFilter, OwnedDocument, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, UserCredentials>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, record: UserCredentials) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;

        // Same guarantee as the unique index: checked and written under one lock
        if users.values().any(|u| u.user.email == record.user.email) {
            return Err(DatabaseError::DuplicateKey(format!(
                "email already exists: {}",
                record.user.email
            )));
        }

        let user = record.user.clone();
        users.insert(user.id.clone(), record);
        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.user.email == email))
    }

    async fn find_public(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.get(id).map(|u| u.user.clone()))
    }

    async fn find_with_credentials(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.user.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(id).map(|stored| {
            changes.apply(&mut stored.user, now);
            stored.user.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id).is_some())
    }
}

pub struct MemoryRepository<T> {
    documents: RwLock<HashMap<String, T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

/// Documents are compared through their serialized form so filters and sort keys use
/// the same field names as the MongoDB queries.
fn field_text<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

fn compare_descending(a: &Value, b: &Value, order: &[&str]) -> Ordering {
    for field in order {
        let ordering = field_text(b, field).cmp(&field_text(a, field));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn to_value<T: OwnedDocument>(document: &T) -> Result<Value, DatabaseError> {
    serde_json::to_value(document).map_err(|e| DatabaseError::Query(format!("serialization: {}", e)))
}

#[async_trait]
impl<T: OwnedDocument> DocumentRepository<T> for MemoryRepository<T> {
    async fn insert(&self, document: T) -> Result<T, DatabaseError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(document.id()) {
            return Err(DatabaseError::DuplicateKey(format!("{} {}", T::LABEL, document.id())));
        }
        documents.insert(document.id().to_string(), document.clone());
        Ok(document)
    }

    async fn find(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).cloned())
    }

    async fn list(&self, owner: &str, filter: &ListFilter) -> Result<Vec<T>, DatabaseError> {
        let documents = self.documents.read().await;

        let mut matching = Vec::new();
        for document in documents.values().filter(|d| d.owner() == owner) {
            let value = to_value(document)?;
            let keep = filter
                .conditions()
                .iter()
                .all(|(field, expected)| field_text(&value, field) == Some(expected.as_str()));
            if keep {
                matching.push((value, document.clone()));
            }
        }

        matching.sort_by(|(a, _), (b, _)| compare_descending(a, b, T::LIST_ORDER));
        Ok(matching.into_iter().map(|(_, document)| document).collect())
    }

    async fn replace(&self, document: T) -> Result<Option<T>, DatabaseError> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(document.id()) {
            Some(stored) => {
                *stored = document.clone();
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let mut documents = self.documents.write().await;
        Ok(documents.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate};
    use shared_models::meal_prep::{MealPrep, MealPrepStatus};
    use shared_models::user::{BloodType, Gender, Role};

    fn credentials(id: &str, email: &str) -> UserCredentials {
        let now = Utc::now();
        UserCredentials {
            user: User {
                id: id.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                role: Role::Patient,
                gender: Gender::Other,
                date_of_birth: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
                height: 180.0,
                weight: 80.0,
                blood_type: BloodType::BPositive,
                past_medical_issues: None,
                allergies: None,
                current_health_issues: None,
                is_active: true,
                is_email_verified: false,
                created_at: now,
                updated_at: now,
            },
            password_hash: "hash".to_string(),
        }
    }

    fn meal_prep(id: &str, user: &str, scheduled: &str, status: MealPrepStatus, age_minutes: i64) -> MealPrep {
        let created = Utc::now() - Duration::minutes(age_minutes);
        MealPrep {
            id: id.to_string(),
            user: user.to_string(),
            title: format!("Prep {}", id),
            description: "Batch cooking".to_string(),
            total_time: "2 hours".to_string(),
            scheduled_date: scheduled.to_string(),
            steps: Vec::new(),
            status,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MemoryUserRepository::default();
        repo.insert(credentials("u1", "a@b.com")).await.unwrap();

        let second = repo.insert(credentials("u2", "a@b.com")).await;
        assert_matches!(second, Err(DatabaseError::DuplicateKey(_)));
        assert!(repo.email_exists("a@b.com").await.unwrap());
        assert!(!repo.email_exists("c@d.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_credentials_only_through_email_lookup() {
        let repo = MemoryUserRepository::default();
        repo.insert(credentials("u1", "a@b.com")).await.unwrap();

        let public = repo.find_public("u1").await.unwrap().unwrap();
        assert_eq!(public.email, "a@b.com");

        let with_credentials = repo.find_with_credentials("a@b.com").await.unwrap().unwrap();
        assert_eq!(with_credentials.password_hash, "hash");

        assert!(repo.find_public("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_and_delete() {
        let repo = MemoryUserRepository::default();
        repo.insert(credentials("u1", "a@b.com")).await.unwrap();

        let changes = ProfileChanges {
            height: Some(175.0),
            ..Default::default()
        };
        let updated = repo.update_profile("u1", &changes, Utc::now()).await.unwrap().unwrap();
        assert_eq!(updated.height, 175.0);

        assert!(repo.delete("u1").await.unwrap());
        assert!(repo.update_profile("u1", &changes, Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_filtered_and_ordered() {
        let repo = MemoryRepository::<MealPrep>::default();
        repo.insert(meal_prep("m1", "u1", "2030-01-01", MealPrepStatus::Planned, 30)).await.unwrap();
        repo.insert(meal_prep("m2", "u1", "2030-02-01", MealPrepStatus::Planned, 20)).await.unwrap();
        repo.insert(meal_prep("m3", "u1", "2030-02-01", MealPrepStatus::Planned, 10)).await.unwrap();
        repo.insert(meal_prep("m4", "u1", "2030-03-01", MealPrepStatus::Completed, 5)).await.unwrap();
        repo.insert(meal_prep("m5", "u2", "2030-04-01", MealPrepStatus::Planned, 1)).await.unwrap();

        let all = repo.list("u1", &ListFilter::new()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m4", "m3", "m2", "m1"]);

        let planned = repo
            .list("u1", &ListFilter::new().eq("status", "planned"))
            .await
            .unwrap();
        assert_eq!(planned.len(), 3);
        assert!(planned.iter().all(|m| m.status == MealPrepStatus::Planned));
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing() {
        let repo = MemoryRepository::<MealPrep>::default();
        let mut prep = meal_prep("m1", "u1", "2030-01-01", MealPrepStatus::Planned, 0);

        assert!(repo.replace(prep.clone()).await.unwrap().is_none());

        repo.insert(prep.clone()).await.unwrap();
        prep.status = MealPrepStatus::InProgress;
        let replaced = repo.replace(prep.clone()).await.unwrap().unwrap();
        assert_eq!(replaced.status, MealPrepStatus::InProgress);

        assert!(repo.delete("m1").await.unwrap().is_some());
        assert!(repo.delete("m1").await.unwrap().is_none());
    }
}
