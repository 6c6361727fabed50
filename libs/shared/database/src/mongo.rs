use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_document, Document},
    options::ReturnDocument,
    Collection,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shared_models::timestamp;
use shared_models::user::{ProfileChanges, User, UserCredentials};

use crate::error::DatabaseError;
use crate::gateway::{MongoGateway, USERS_COLLECTION};
use crate::repository::{DocumentRepository, ListFilter, OwnedDocument, UserRepository};

/// Stored shape of a user: the public record plus the password hash.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(flatten)]
    user: User,
    password: String,
}

pub struct MongoUserRepository {
    gateway: Arc<MongoGateway>,
}

impl MongoUserRepository {
    pub fn new(gateway: Arc<MongoGateway>) -> Self {
        Self { gateway }
    }

    async fn collection(&self) -> Result<Collection<UserDocument>, DatabaseError> {
        let database = self.gateway.get_connection().await?;
        Ok(database.collection(USERS_COLLECTION))
    }

    async fn public_collection(&self) -> Result<Collection<User>, DatabaseError> {
        Ok(self.collection().await?.clone_with_type())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, record: UserCredentials) -> Result<User, DatabaseError> {
        debug!("Inserting user {}", record.user.id);

        let document = UserDocument {
            user: record.user,
            password: record.password_hash,
        };
        self.collection().await?.insert_one(&document).await?;

        Ok(document.user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let count = self
            .collection()
            .await?
            .count_documents(doc! { "email": email })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn find_public(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let user = self
            .public_collection()
            .await?
            .find_one(doc! { "_id": id })
            .projection(doc! { "password": 0 })
            .await?;
        Ok(user)
    }

    async fn find_with_credentials(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let document = self
            .collection()
            .await?
            .find_one(doc! { "email": email })
            .await?;

        Ok(document.map(|d| UserCredentials {
            user: d.user,
            password_hash: d.password,
        }))
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError> {
        debug!("Updating profile for user {}", id);

        let mut set = to_document(changes)?;
        set.insert("updatedAt", timestamp::format(&now));

        let user = self
            .public_collection()
            .await?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .projection(doc! { "password": 0 })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = self
            .collection()
            .await?
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoRepository<T> {
    gateway: Arc<MongoGateway>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: OwnedDocument> MongoRepository<T> {
    pub fn new(gateway: Arc<MongoGateway>) -> Self {
        Self {
            gateway,
            _marker: PhantomData,
        }
    }

    async fn collection(&self) -> Result<Collection<T>, DatabaseError> {
        let database = self.gateway.get_connection().await?;
        Ok(database.collection(T::COLLECTION))
    }
}

fn list_query(owner: &str, filter: &ListFilter) -> Document {
    let mut query = doc! { "user": owner };
    for (field, value) in filter.conditions() {
        query.insert(*field, value.as_str());
    }
    query
}

fn list_sort(order: &[&str]) -> Document {
    let mut sort = Document::new();
    for field in order {
        sort.insert(*field, -1);
    }
    sort
}

#[async_trait]
impl<T: OwnedDocument> DocumentRepository<T> for MongoRepository<T> {
    async fn insert(&self, document: T) -> Result<T, DatabaseError> {
        debug!("Inserting {} {}", T::LABEL, document.id());
        self.collection().await?.insert_one(&document).await?;
        Ok(document)
    }

    async fn find(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let document = self.collection().await?.find_one(doc! { "_id": id }).await?;
        Ok(document)
    }

    async fn list(&self, owner: &str, filter: &ListFilter) -> Result<Vec<T>, DatabaseError> {
        let cursor = self
            .collection()
            .await?
            .find(list_query(owner, filter))
            .sort(list_sort(T::LIST_ORDER))
            .await?;
        let documents: Vec<T> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn replace(&self, document: T) -> Result<Option<T>, DatabaseError> {
        let result = self
            .collection()
            .await?
            .replace_one(doc! { "_id": document.id() }, &document)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(document))
    }

    async fn delete(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let document = self
            .collection()
            .await?
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(document)
    }
}
