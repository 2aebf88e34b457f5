use api_utils::ApiError;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use db_utils::{
    mongodb::{MongoCollection, MongoDbAPI},
    schemas::user::User,
};
use mongodb::options::UpdateModifications;

/// Persistence the user service needs.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError>;

    /// Inserts and returns the new id; a taken login is a `conflict`.
    async fn insert(&self, user: User) -> Result<ObjectId, ApiError>;

    /// Returns false when no user has `id`.
    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, ApiError>;

    /// Returns false when no user has `id`.
    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError>;
}

#[async_trait]
impl UserStore for MongoCollection<User> {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, ApiError> {
        Ok(self.get_one_from(doc! { "login": login }).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError> {
        Ok(self.get_one_from(doc! { "_id": id }).await?)
    }

    async fn insert(&self, user: User) -> Result<ObjectId, ApiError> {
        let inserted = self.insert_one_into(user).await.map_err(|err| {
            if err.is_duplicate_key() {
                ApiError::conflict("login is already taken")
            } else {
                err.into()
            }
        })?;
        inserted
            .as_object_id()
            .ok_or_else(|| ApiError::internal(format!("unexpected inserted id {inserted}")))
    }

    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, ApiError> {
        let update = UpdateModifications::Document(doc! { "$set": { "login": login } });
        let result = self
            .update_one_within(doc! { "_id": id }, update)
            .await
            .map_err(|err| {
                if err.is_duplicate_key() {
                    ApiError::conflict("login is already taken")
                } else {
                    err.into()
                }
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError> {
        Ok(self.delete_one_from(doc! { "_id": id }).await? > 0)
    }
}
