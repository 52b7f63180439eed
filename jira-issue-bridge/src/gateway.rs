//! Issue gateway: local call parameters in, remote results out
//!
//! Both operations await the remote call to completion and never return an
//! error. A failure of any kind is logged with its category and reported to
//! the caller as `None`.

use crate::connection::{ConnectionManager, SessionHandle};
use crate::error::JiraBridgeError;
use crate::issue_types::IssueType;
use crate::jira_client::{IssueCreateResult, IssueInput, RetrievedIssue};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Jira wiki markup that disables formatting for the enclosed text
pub const NOFORMAT_MARKER: &str = "{noformat}";

/// Parameters for creating an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCreateRequest {
    pub project_key: String,
    pub summary: String,
    pub free_text: String,
    pub code_block: String,
    pub issue_type: IssueType,
}

impl IssueCreateRequest {
    /// Request for a `TASK` issue
    pub fn new(
        project_key: impl Into<String>,
        summary: impl Into<String>,
        free_text: impl Into<String>,
        code_block: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            summary: summary.into(),
            free_text: free_text.into(),
            code_block: code_block.into(),
            issue_type: IssueType::default(),
        }
    }

    pub fn with_issue_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    /// Assemble the wire input sent to the remote service
    pub fn to_issue_input(&self) -> IssueInput {
        IssueInput {
            project_key: self.project_key.clone(),
            summary: self.summary.clone(),
            description: compose_description(&self.free_text, &self.code_block),
            issue_type_id: self.issue_type.id(),
        }
    }
}

/// Free text followed by the code block wrapped in `{noformat}` markers.
///
/// The code block is passed through unescaped.
pub fn compose_description(free_text: &str, code_block: &str) -> String {
    let mut description = String::with_capacity(
        free_text.len() + code_block.len() + 2 * NOFORMAT_MARKER.len() + 4,
    );
    description.push_str(free_text);
    description.push_str("\n\n");
    description.push_str(NOFORMAT_MARKER);
    description.push_str(code_block);
    description.push_str(NOFORMAT_MARKER);
    description.push_str("\n\n");
    description
}

/// Fetch and create operations over the managed connection
pub struct IssueGateway {
    connection: Arc<ConnectionManager>,
}

impl IssueGateway {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self { connection }
    }

    async fn live_session(&self, operation: &str) -> Option<SessionHandle> {
        let session = self.connection.session().await;
        if session.is_none() {
            error!(
                category = JiraBridgeError::ConnectionUnavailable.category(),
                "Jira client is not initialized. Cannot {}.", operation
            );
        }
        session
    }

    /// Retrieve an issue by key (e.g. "PROJ-123") or id
    #[instrument(skip(self))]
    pub async fn get_issue_by_id(&self, issue_key: &str) -> Option<RetrievedIssue> {
        let session = self.live_session("retrieve issue").await?;

        info!("Attempting to retrieve Jira issue: {}", issue_key);
        match session.get_issue(issue_key).await {
            Ok(issue) => {
                info!("Successfully retrieved issue {}: {}", issue.key, issue.summary);
                Some(issue)
            }
            Err(e) => {
                error!(
                    category = e.category(),
                    "Error retrieving issue {}: {}", issue_key, e
                );
                None
            }
        }
    }

    /// Create an issue whose description embeds a code block
    #[instrument(skip(self, request), fields(
        project_key = %request.project_key,
        issue_type = %request.issue_type,
    ))]
    pub async fn create_issue(&self, request: &IssueCreateRequest) -> Option<IssueCreateResult> {
        let session = self.live_session("create issue").await?;

        info!(
            "Attempting to create Jira issue in project {}: {}",
            request.project_key, request.summary
        );
        let input = request.to_issue_input();

        match session.create_issue(&input).await {
            Ok(created) => {
                info!("Successfully created issue: {}", created.key);
                Some(created)
            }
            Err(e) => {
                error!(
                    category = e.category(),
                    "Error creating issue in project {} ({}): {}",
                    request.project_key,
                    request.summary,
                    e
                );
                None
            }
        }
    }
}
