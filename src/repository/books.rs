//! MongoDB-backed book repository

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Collection;

use super::BookRepository;
use crate::{
    error::{StoreError, StoreResult},
    models::book::{Book, BookDocument, BookInput},
    store::DataStore,
};

/// Name of the collection holding book documents
pub const BOOKS_COLLECTION: &str = "books";

#[derive(Clone)]
pub struct MongoBookRepository {
    store: DataStore,
}

impl MongoBookRepository {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn collection(&self) -> StoreResult<Collection<BookDocument>> {
        Ok(self.store.database()?.collection(BOOKS_COLLECTION))
    }
}

pub(crate) fn parse_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let cursor = self.collection()?.find(None, None).await?;
        let docs: Vec<BookDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let collection = self.collection()?;
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = collection.find_one(doc! { "_id": oid }, None).await?;
        Ok(found.map(Book::from))
    }

    async fn insert(&self, input: BookInput) -> StoreResult<Book> {
        let collection = self.collection()?;
        let document = BookDocument::new(input);
        collection.insert_one(&document, None).await?;
        tracing::debug!("Inserted book {}", document.id);
        Ok(document.into())
    }

    async fn update_by_id(&self, id: &str, input: BookInput) -> StoreResult<bool> {
        let collection = self.collection()?;
        let oid = parse_id(id)?;
        let result = collection
            .update_one(
                doc! { "_id": oid },
                doc! {
                    "$set": {
                        "title": input.title,
                        "author": input.author,
                        "year": input.year,
                    }
                },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let collection = self.collection()?;
        let oid = parse_id(id)?;
        let result = collection.delete_one(doc! { "_id": oid }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
