use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use shared_models::goal::Goal;
use shared_models::meal_prep::MealPrep;
use shared_models::user::{ProfileChanges, User, UserCredentials};
use shared_models::workout::Workout;

use crate::error::DatabaseError;

/// Access to the `users` collection.
///
/// Reads come in two flavours: `find_public` never carries credential material, and
/// `find_with_credentials` is the only way to see a password hash.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::DuplicateKey` when the email is taken.
    async fn insert(&self, record: UserCredentials) -> Result<User, DatabaseError>;

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError>;

    async fn find_public(&self, id: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_with_credentials(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError>;

    /// Applies the changes and stamps `updatedAt`. `None` when no such user exists.
    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError>;
}

/// A document that belongs to one user and lives in its own collection.
pub trait OwnedDocument: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
    /// Human name used in error messages.
    const LABEL: &'static str;
    /// Listing order: each field sorted descending, in priority order.
    const LIST_ORDER: &'static [&'static str];

    fn id(&self) -> &str;
    fn owner(&self) -> &str;
}

impl OwnedDocument for Goal {
    const COLLECTION: &'static str = "goals";
    const LABEL: &'static str = "goal";
    const LIST_ORDER: &'static [&'static str] = &["createdAt"];

    fn id(&self) -> &str { &self.id }
    fn owner(&self) -> &str { &self.user }
}

impl OwnedDocument for Workout {
    const COLLECTION: &'static str = "workouts";
    const LABEL: &'static str = "workout";
    const LIST_ORDER: &'static [&'static str] = &["createdAt"];

    fn id(&self) -> &str { &self.id }
    fn owner(&self) -> &str { &self.user }
}

impl OwnedDocument for MealPrep {
    const COLLECTION: &'static str = "meal_preparations";
    const LABEL: &'static str = "meal preparation";
    const LIST_ORDER: &'static [&'static str] = &["scheduledDate", "createdAt"];

    fn id(&self) -> &str { &self.id }
    fn owner(&self) -> &str { &self.user }
}

/// Exact-match conditions on string fields, applied on top of the owner filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    conditions: Vec<(&'static str, String)>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.conditions.push((field, value.into()));
        self
    }

    pub fn conditions(&self) -> &[(&'static str, String)] {
        &self.conditions
    }
}

#[async_trait]
pub trait DocumentRepository<T: OwnedDocument>: Send + Sync {
    async fn insert(&self, document: T) -> Result<T, DatabaseError>;

    async fn find(&self, id: &str) -> Result<Option<T>, DatabaseError>;

    async fn list(&self, owner: &str, filter: &ListFilter) -> Result<Vec<T>, DatabaseError>;

    /// Replaces the stored document with the same id. `None` when it no longer exists.
    async fn replace(&self, document: T) -> Result<Option<T>, DatabaseError>;

    /// Returns the removed document, if there was one.
    async fn delete(&self, id: &str) -> Result<Option<T>, DatabaseError>;
}
