use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use super::traits::IntoIndexes;
use crate::error::DbError;

/// Wrapper type for MongoDB collections that applies the document type's
/// indexes on open and implements [`super::MongoDbAPI`].
///
// NB: `Database` (like `Client`) is an Arc alias, so clones share one pool.
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync + IntoIndexes,
{
    /// The underlying MongoDB collection
    pub inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync + IntoIndexes,
{
    pub async fn new(database: &Database, collection_name: &str) -> Result<Self, DbError> {
        log::debug!(
            "Opening MongoDB collection: {}.{}",
            database.name(),
            collection_name
        );
        let collection = MongoCollection {
            inner: database.collection::<T>(collection_name),
        };
        collection.apply_indexing().await?;
        Ok(collection)
    }

    pub async fn apply_indexing(&self) -> Result<(), DbError> {
        let indices: Vec<IndexModel> = T::indexes()
            .into_iter()
            .map(|(keys, options)| {
                log::debug!("Adding index: {:?} with options: {:?}", keys, options);
                IndexModel::builder().keys(keys).options(options).build()
            })
            .collect();

        if indices.is_empty() {
            log::debug!("No indices to apply for {}", self.inner.name());
            return Ok(());
        }

        let count = indices.len();
        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| Self::handle_db_error("create_indexes", e))?;
        log::info!("Applied {} indices to {}", count, self.inner.name());
        Ok(())
    }

    /// Helper method to handle MongoDB errors consistently
    pub fn handle_db_error(operation: &str, error: mongodb::error::Error) -> DbError {
        log::error!("MongoDB {} operation failed: {}", operation, error);
        DbError::database(operation, error)
    }
}
