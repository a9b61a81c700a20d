//! Book service

use crate::{
    error::{AppError, AppResult, Operation},
    models::book::{Book, BookInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .list_all()
            .await
            .map_err(|e| AppError::operation(Operation::ListBooks, e))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await
            .map_err(|e| AppError::operation(Operation::GetBook, e))?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .insert(input)
            .await
            .map_err(|e| AppError::operation(Operation::AddBook, e))?;
        tracing::info!("Book {} added", book.id);
        Ok(book)
    }

    /// Fails with `NotFound` when no book has this id
    pub async fn update(&self, id: &str, input: BookInput) -> AppResult<()> {
        let matched = self
            .repository
            .books
            .update_by_id(id, input)
            .await
            .map_err(|e| AppError::operation(Operation::EditBook, e))?;
        if !matched {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tracing::info!("Book {} updated", id);
        Ok(())
    }

    /// Returns whether a book was removed. Deleting a missing book is not an error.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self
            .repository
            .books
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::operation(Operation::DeleteBook, e))?;
        if removed {
            tracing::info!("Book {} deleted", id);
        } else {
            tracing::debug!("Delete of book {} matched nothing", id);
        }
        Ok(removed)
    }
}
