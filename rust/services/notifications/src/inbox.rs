use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use db_utils::{
    mongodb::{MongoCollection, MongoDbAPI},
    schemas::inbox::{Inbox, Notification},
    DbError,
};
use mongodb::options::UpdateModifications;

/// Inbox persistence. Every write is keyed by the owning user's id.
#[async_trait]
pub trait InboxStore: Send + Sync {
    async fn exists(&self, id: ObjectId) -> Result<bool, DbError>;

    async fn get(&self, id: ObjectId) -> Result<Option<Inbox>, DbError>;

    /// Creates the inbox; an inbox that already exists is left untouched.
    async fn create(&self, inbox: Inbox) -> Result<(), DbError>;

    /// Puts `notification` first. Returns false when the inbox is missing.
    async fn push_front(&self, id: ObjectId, notification: Notification)
        -> Result<bool, DbError>;

    /// Returns false when the inbox is missing.
    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, DbError>;

    /// Returns false when the inbox is missing.
    async fn delete(&self, id: ObjectId) -> Result<bool, DbError>;
}

#[async_trait]
impl InboxStore for MongoCollection<Inbox> {
    async fn exists(&self, id: ObjectId) -> Result<bool, DbError> {
        Ok(self.count_in(doc! { "_id": id }, Some(1)).await? > 0)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Inbox>, DbError> {
        self.get_one_from(doc! { "_id": id }).await
    }

    async fn create(&self, inbox: Inbox) -> Result<(), DbError> {
        match self.insert_one_into(inbox).await {
            Ok(_) => Ok(()),
            // a concurrent delivery created it first
            Err(err) if err.is_duplicate_key() => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn push_front(
        &self,
        id: ObjectId,
        notification: Notification,
    ) -> Result<bool, DbError> {
        let notification = bson::to_bson(&notification)
            .map_err(|err| DbError::internal("push_front", err.to_string()))?;
        let update = UpdateModifications::Document(doc! {
            "$push": { "notifications": { "$each": [notification], "$position": 0 } }
        });
        let result = self.update_one_within(doc! { "_id": id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn update_login(&self, id: ObjectId, login: &str) -> Result<bool, DbError> {
        let update = UpdateModifications::Document(doc! { "$set": { "login": login } });
        let result = self.update_one_within(doc! { "_id": id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DbError> {
        Ok(self.delete_one_from(doc! { "_id": id }).await? > 0)
    }
}
