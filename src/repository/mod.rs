//! Repository layer for book storage

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    models::book::{Book, BookInput},
    store::DataStore,
};

/// Typed access to the book collection.
///
/// Every call is a fresh round trip to the backing store; nothing is cached
/// between requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, in store order
    async fn list_all(&self) -> StoreResult<Vec<Book>>;

    /// `None` when no book has this id or the id is malformed
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>>;

    async fn insert(&self, input: BookInput) -> StoreResult<Book>;

    /// Replace title, author and year. Returns whether a book matched.
    async fn update_by_id(&self, id: &str, input: BookInput) -> StoreResult<bool>;

    /// Returns whether a book matched
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;
}

/// Main repository struct holding the book storage backend
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Repository backed by the MongoDB data store
    pub fn new(store: DataStore) -> Self {
        Self {
            books: Arc::new(books::MongoBookRepository::new(store)),
        }
    }

    /// Repository kept in process memory
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(memory::InMemoryBookRepository::new()),
        }
    }

    pub fn with_books(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}
