//! Lifecycle of the single session to the Jira instance
//!
//! The manager owns at most one live `IssueApi` handle. Callers borrow it
//! per call through [`ConnectionManager::session`] and drop it when done.

use crate::config::{parse_server_url, ServerConfig};
use crate::error::{JiraBridgeError, JiraBridgeResult};
use crate::jira_client::{GouqiIssueApi, IssueApi};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

/// Shared session handle
pub type SessionHandle = Arc<dyn IssueApi>;

/// Owner of the process-wide Jira session
#[derive(Default)]
pub struct ConnectionManager {
    session: RwLock<Option<SessionHandle>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an authenticated session from `server` settings
    ///
    /// A malformed URL or missing credentials fail with a configuration
    /// error and leave the current state untouched. A previously stored
    /// session is closed once the new one is in place.
    #[instrument(skip_all, fields(url = %server.url))]
    pub async fn initialize(&self, server: &ServerConfig) -> JiraBridgeResult<()> {
        info!("Initializing Jira client for URL: {}", server.url);

        if let Err(e) = parse_server_url(&server.url) {
            error!("Invalid Jira server URL: {}", server.url);
            return Err(e);
        }

        if server.username.is_empty() || server.password.is_empty() {
            return Err(JiraBridgeError::config(
                "Username and password cannot be empty for basic auth",
            ));
        }

        let client = GouqiIssueApi::new(server.base_url(), &server.username, &server.password)?;

        self.install(Arc::new(client)).await;
        info!("Jira client initialized successfully");
        Ok(())
    }

    /// Store `handle` as the live session, closing any previous one
    pub async fn install(&self, handle: SessionHandle) {
        let previous = self.session.write().await.replace(handle);

        if let Some(previous) = previous {
            debug!("Replacing existing Jira session");
            Self::close_quietly(previous).await;
        }
    }

    /// Borrow the live session for one call
    pub async fn session(&self) -> Option<SessionHandle> {
        self.session.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Release the session if one is held. Safe to call repeatedly.
    ///
    /// Calls already holding a borrowed handle finish on it; the client is
    /// dropped once the last of them returns.
    pub async fn shutdown(&self) {
        let current = self.session.write().await.take();

        match current {
            Some(handle) => {
                Self::close_quietly(handle).await;
            }
            None => debug!("Shutdown requested with no live Jira session"),
        }
    }

    async fn close_quietly(handle: SessionHandle) {
        info!("Releasing Jira client");
        match handle.close().await {
            Ok(()) => info!("Jira client closed successfully."),
            Err(e) => error!("Error closing Jira client: {}", e),
        }
    }
}
