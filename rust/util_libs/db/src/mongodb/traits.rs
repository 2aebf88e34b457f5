use bson::Document;
use mongodb::options::IndexOptions;

/// Indexes a collection's document type needs.
///
/// They are created once when the [`super::MongoCollection`] is opened;
/// creating an index that already exists with the same options is a no-op.
pub trait IntoIndexes {
    fn indexes() -> Vec<(Document, Option<IndexOptions>)>;
}
