//! MongoDB data store handle and connection retry loop.
//!
//! The client is created lazily; the first successful `ping` moves the store
//! to [`ConnectionState::Connected`], after which the driver keeps its own
//! connection pool healthy. Until then every access to the database handle
//! fails with [`StoreError::NotConnected`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use mongodb::{options::ClientOptions, Client, Database};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    config::MongoConfig,
    error::{StoreError, StoreResult},
};

/// Connection lifecycle of the data store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
    RetryScheduled { attempt: u32, delay: Duration },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting { .. } => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::RetryScheduled { .. } => "retry_scheduled",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared handle to the book database
#[derive(Clone)]
pub struct DataStore {
    database: Database,
    uri: String,
    retry_delay: Duration,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl DataStore {
    /// Create the client from configuration. No I/O against the server.
    pub async fn new(config: &MongoConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(config.uri()).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));

        let client = Client::with_options(options)?;
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        Ok(Self {
            database: client.database(&config.database),
            uri: config.redacted_uri(),
            retry_delay: config.retry_delay(),
            state: Arc::new(state),
        })
    }

    /// Database handle, only available once connected
    pub fn database(&self) -> StoreResult<Database> {
        if self.state.borrow().is_connected() {
            Ok(self.database.clone())
        } else {
            Err(StoreError::NotConnected)
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Ping the server until it answers. Returns the number of attempts.
    pub async fn connect_with_retry(&self) -> u32 {
        tracing::info!("Connecting to MongoDB at {}", self.uri);
        let database = self.database.clone();
        retry_until_connected(&self.state, self.retry_delay, || {
            let database = database.clone();
            async move {
                database
                    .run_command(doc! { "ping": 1 }, None)
                    .await
                    .map(|_| ())
            }
        })
        .await
    }

    /// Run [`DataStore::connect_with_retry`] in the background
    pub fn spawn_connect(&self) -> JoinHandle<u32> {
        let store = self.clone();
        tokio::spawn(async move { store.connect_with_retry().await })
    }
}

/// Drive `attempt` until it succeeds, publishing each transition on `state`.
///
/// Failures are logged and followed by a fixed `delay`; attempts are unbounded.
pub async fn retry_until_connected<F, Fut, E>(
    state: &watch::Sender<ConnectionState>,
    delay: Duration,
    mut attempt: F,
) -> u32
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: fmt::Display,
{
    let mut count = 0;
    loop {
        count += 1;
        state.send_replace(ConnectionState::Connecting { attempt: count });

        match attempt().await {
            Ok(()) => {
                state.send_replace(ConnectionState::Connected);
                tracing::info!("MongoDB connected after {} attempt(s)", count);
                return count;
            }
            Err(e) => {
                tracing::error!("MongoDB connection attempt {} failed: {}", count, e);
                tracing::warn!("Retrying MongoDB connection in {}s", delay.as_secs());
                state.send_replace(ConnectionState::RetryScheduled {
                    attempt: count,
                    delay,
                });
                tokio::time::sleep(delay).await;
            }
        }
    }
}
