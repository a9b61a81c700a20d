//! In-process book repository

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{books::parse_id, BookRepository};
use crate::{
    error::StoreResult,
    models::book::{Book, BookDocument, BookInput},
};

/// Books held in insertion order, behind an async lock
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<BookDocument>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().cloned().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let books = self.books.read().await;
        Ok(books
            .iter()
            .find(|doc| doc.id == oid)
            .cloned()
            .map(Book::from))
    }

    async fn insert(&self, input: BookInput) -> StoreResult<Book> {
        let document = BookDocument::new(input);
        self.books.write().await.push(document.clone());
        Ok(document.into())
    }

    async fn update_by_id(&self, id: &str, input: BookInput) -> StoreResult<bool> {
        let oid = parse_id(id)?;
        let mut books = self.books.write().await;
        match books.iter_mut().find(|doc| doc.id == oid) {
            Some(doc) => {
                doc.replace_fields(input);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let oid = parse_id(id)?;
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|doc| doc.id != oid);
        Ok(books.len() != before)
    }
}
