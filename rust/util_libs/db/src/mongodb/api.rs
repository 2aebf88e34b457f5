use async_trait::async_trait;
use bson::{Bson, Document};
use futures::stream::TryStreamExt;
use mongodb::{options::UpdateModifications, results::UpdateResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::{collection::MongoCollection, traits::IntoIndexes};
use crate::error::DbError;

/// Core trait defining MongoDB operations for a collection of type `T`.
#[async_trait]
pub trait MongoDbAPI<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    /// The error type returned by operations in this trait.
    type Error;

    /// Retrieves a single document matching the filter criteria.
    async fn get_one_from(&self, filter: Document) -> Result<Option<T>, Self::Error>;

    /// Retrieves every document matching the filter criteria.
    async fn get_many_from(&self, filter: Document) -> Result<Vec<T>, Self::Error>;

    /// Counts matching documents, stopping at `limit` when given.
    async fn count_in(&self, filter: Document, limit: Option<u64>) -> Result<u64, Self::Error>;

    /// Inserts a single document and returns its `_id`.
    async fn insert_one_into(&self, item: T) -> Result<Bson, Self::Error>;

    /// Updates the first document matching `query`.
    async fn update_one_within(
        &self,
        query: Document,
        updated_doc: UpdateModifications,
    ) -> Result<UpdateResult, Self::Error>;

    /// Deletes the first document matching `query` and returns how many were
    /// removed (zero or one).
    async fn delete_one_from(&self, query: Document) -> Result<u64, Self::Error>;
}

#[async_trait]
impl<T> MongoDbAPI<T> for MongoCollection<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync + Debug + IntoIndexes,
{
    type Error = DbError;

    async fn get_one_from(&self, filter: Document) -> Result<Option<T>, Self::Error> {
        log::debug!("Getting one document with filter: {:?}", filter);
        let item = self
            .inner
            .find_one(filter)
            .await
            .map_err(|e| Self::handle_db_error("get_one_from", e))?;

        if item.is_none() {
            log::debug!("No document found matching filter");
        }
        Ok(item)
    }

    async fn get_many_from(&self, filter: Document) -> Result<Vec<T>, Self::Error> {
        log::debug!("Getting multiple documents with filter: {:?}", filter);
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| Self::handle_db_error("get_many_from", e))?;

        let results: Vec<T> = cursor
            .try_collect()
            .await
            .map_err(|e| Self::handle_db_error("get_many_from collect", e))?;

        log::debug!("Found {} documents", results.len());
        Ok(results)
    }

    async fn count_in(&self, filter: Document, limit: Option<u64>) -> Result<u64, Self::Error> {
        let mut action = self.inner.count_documents(filter);
        if let Some(limit) = limit {
            action = action.limit(limit);
        }
        action
            .await
            .map_err(|e| Self::handle_db_error("count_in", e))
    }

    async fn insert_one_into(&self, item: T) -> Result<Bson, Self::Error> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| Self::handle_db_error("insert_one_into", e))?;

        log::debug!("Inserted document with ID: {}", result.inserted_id);
        Ok(result.inserted_id)
    }

    async fn update_one_within(
        &self,
        query: Document,
        updated_doc: UpdateModifications,
    ) -> Result<UpdateResult, Self::Error> {
        log::debug!("Updating single document - Query: {:?}", query);
        let result = self
            .inner
            .update_one(query, updated_doc)
            .await
            .map_err(|e| Self::handle_db_error("update_one_within", e))?;

        log::debug!(
            "Updated document (matched: {}, modified: {})",
            result.matched_count,
            result.modified_count
        );
        Ok(result)
    }

    async fn delete_one_from(&self, query: Document) -> Result<u64, Self::Error> {
        log::debug!("Deleting document with query: {:?}", query);
        let result = self
            .inner
            .delete_one(query)
            .await
            .map_err(|e| Self::handle_db_error("delete_one_from", e))?;

        log::debug!("Deleted document (deleted count: {})", result.deleted_count);
        Ok(result.deleted_count)
    }
}
