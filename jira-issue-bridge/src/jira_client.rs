//! JIRA client seam around gouqi
//!
//! `IssueApi` is the boundary between the bridge and the remote service.
//! `GouqiIssueApi` is the production implementation; tests substitute their own.

use crate::error::{JiraBridgeError, JiraBridgeResult};
use async_trait::async_trait;
use gouqi::r#async::Jira;
use gouqi::Issue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Remote operations the gateway needs from the issue tracker
#[async_trait]
pub trait IssueApi: Send + Sync {
    /// Fetch one issue by key (e.g. "PROJ-123") or numeric id
    async fn get_issue(&self, issue_key: &str) -> JiraBridgeResult<RetrievedIssue>;

    /// Create an issue from an assembled input
    async fn create_issue(&self, input: &IssueInput) -> JiraBridgeResult<IssueCreateResult>;

    /// Release any resources held by the session
    async fn close(&self) -> JiraBridgeResult<()> {
        Ok(())
    }
}

/// Read-only projection of a remote issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedIssue {
    pub key: String,
    pub id: String,
    pub summary: String,
    /// Remote-defined fields as returned by the server
    pub fields: BTreeMap<String, Value>,
}

/// Outcome of a successful create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCreateResult {
    /// Newly assigned issue key (e.g. "PROJ-456")
    pub key: String,
    /// Remote issue id
    pub id: String,
    /// REST URL of the created issue, when the server reports one
    pub self_link: Option<String>,
}

/// Wire-level input for the issue creation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueInput {
    pub project_key: String,
    pub summary: String,
    pub description: String,
    pub issue_type_id: u64,
}

impl IssueInput {
    /// Render as the `{"fields": {...}}` body of `POST /issue`
    pub fn to_request_body(&self) -> Value {
        serde_json::json!({
            "fields": {
                "project": {
                    "key": self.project_key
                },
                "summary": self.summary,
                "description": self.description,
                "issuetype": {
                    "id": self.issue_type_id.to_string()
                }
            }
        })
    }
}

/// `IssueApi` backed by the async gouqi client with basic authentication
///
/// Holds no resources beyond the HTTP client, which is released when the
/// last `Arc` handle is dropped. Timeouts are those of gouqi's HTTP client.
pub struct GouqiIssueApi {
    client: Jira,
    base_url: String,
}

impl GouqiIssueApi {
    /// Build an authenticated client for `base_url`
    #[instrument(skip(password))]
    pub fn new(base_url: &str, username: &str, password: &str) -> JiraBridgeResult<Self> {
        let credentials = gouqi::Credentials::Basic(username.to_string(), password.to_string());

        let client = Jira::new(base_url, credentials).map_err(|e| {
            JiraBridgeError::config(format!(
                "Failed to build Jira client for {}: {}",
                base_url, e
            ))
        })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a gouqi failure for `issue_key` onto the bridge error taxonomy
    fn classify(err: gouqi::Error, issue_key: &str) -> JiraBridgeError {
        let message = err.to_string();
        if matches!(err, gouqi::Error::NotFound)
            || message.contains("404")
            || message.contains("Not Found")
        {
            JiraBridgeError::not_found("issue", issue_key)
        } else {
            JiraBridgeError::from(err)
        }
    }

    fn convert_issue(issue: Issue) -> RetrievedIssue {
        let summary = issue.summary().unwrap_or_default();
        RetrievedIssue {
            key: issue.key,
            id: issue.id,
            summary,
            fields: issue.fields.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IssueApi for GouqiIssueApi {
    #[instrument(skip(self))]
    async fn get_issue(&self, issue_key: &str) -> JiraBridgeResult<RetrievedIssue> {
        debug!("Fetching issue {} from {}", issue_key, self.base_url);

        let issue = self
            .client
            .issues()
            .get(issue_key)
            .await
            .map_err(|e| Self::classify(e, issue_key))?;

        Ok(Self::convert_issue(issue))
    }

    #[instrument(skip(self, input), fields(project_key = %input.project_key))]
    async fn create_issue(&self, input: &IssueInput) -> JiraBridgeResult<IssueCreateResult> {
        let body = input.to_request_body();
        debug!("Posting issue creation request: {}", body);

        let response: Value = self.client.post("api", "/issue", body).await?;

        let key = response["key"]
            .as_str()
            .ok_or_else(|| JiraBridgeError::internal("No issue key in response"))?
            .to_string();

        let id = response["id"]
            .as_str()
            .ok_or_else(|| JiraBridgeError::internal("No issue ID in response"))?
            .to_string();

        let self_link = response["self"].as_str().map(str::to_string);

        Ok(IssueCreateResult { key, id, self_link })
    }
}
