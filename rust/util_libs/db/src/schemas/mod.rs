//! Document layouts persisted by the bookstore services.
//!
//! ```rust,no_run
//! use db_utils::{mongodb::MongoCollection, schemas::user::{User, USER_COLLECTION_NAME}, DbConfig};
//!
//! async fn example(config: DbConfig) -> Result<(), db_utils::DbError> {
//!     let database = config.connect().await?;
//!     let users = MongoCollection::<User>::new(&database, USER_COLLECTION_NAME).await?;
//!     Ok(())
//! }
//! ```

pub mod inbox;
pub mod user;
