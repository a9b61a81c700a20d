//! Book Library Server
//!
//! A small JSON API for managing a list of books stored in MongoDB.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// MongoDB store, absent when books are kept in memory
    pub store: Option<store::DataStore>,
}

impl AppState {
    /// State backed by the MongoDB data store
    pub fn new(config: AppConfig, store: store::DataStore) -> Self {
        let repository = repository::Repository::new(store.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            store: Some(store),
        }
    }

    /// State backed by any repository, without a data store
    pub fn with_repository(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            store: None,
        }
    }
}
