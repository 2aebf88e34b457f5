pub mod api;
pub mod collection;
pub mod traits;

pub use api::MongoDbAPI;
pub use collection::MongoCollection;
pub use traits::IntoIndexes;
