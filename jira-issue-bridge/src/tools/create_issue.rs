use crate::config::BridgeConfig;
use crate::error::{JiraBridgeError, JiraBridgeResult};
use crate::gateway::{IssueCreateRequest, IssueGateway};
use crate::issue_types::IssueType;
use crate::tools::registry::ToolHandler;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Name the capability is published under
pub const CREATE_JIRA_ISSUE: &str = "create_jira_issue";

pub const CREATE_JIRA_ISSUE_DESCRIPTION: &str = "\
Creates a Jira issue in the specified project with a summary (title), and description.
The description will include a free text and the highlighted code block (from the user).";

/// Parameters for creating a new JIRA issue
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJiraIssueParams {
    /// Project key where the issue will be created (e.g., "RTFS")
    pub project_key: String,

    /// Issue summary/title
    pub summary: String,

    /// Free text placed at the top of the description
    pub free_text: String,

    /// Code block rendered without formatting below the free text
    pub codeblock: String,

    /// Issue type: "task" (default) or "bug"
    #[serde(default)]
    pub issue_type: Option<String>,
}

/// Result from creating an issue
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateJiraIssueResult {
    /// The created issue key (e.g., "RTFS-42")
    pub issue_key: String,

    /// The issue ID
    pub issue_id: String,

    /// Direct URL to the issue
    pub issue_url: String,

    pub project_key: String,

    pub issue_type: String,

    /// Success message
    pub message: String,
}

/// Tool for creating JIRA issues through the gateway
pub struct CreateJiraIssueTool {
    gateway: Arc<IssueGateway>,
    config: Arc<BridgeConfig>,
}

impl CreateJiraIssueTool {
    pub fn new(gateway: Arc<IssueGateway>, config: Arc<BridgeConfig>) -> Self {
        Self { gateway, config }
    }

    #[instrument(skip(self, params), fields(project_key = %params.project_key))]
    pub async fn execute(
        &self,
        params: CreateJiraIssueParams,
    ) -> JiraBridgeResult<CreateJiraIssueResult> {
        info!("Creating new JIRA issue: {}", params.summary);

        let issue_type = match params.issue_type.as_deref() {
            Some(raw) => raw.parse::<IssueType>()?,
            None => IssueType::default(),
        };

        let request = IssueCreateRequest::new(
            params.project_key,
            params.summary,
            params.free_text,
            params.codeblock,
        )
        .with_issue_type(issue_type);

        let created = self.gateway.create_issue(&request).await.ok_or_else(|| {
            JiraBridgeError::remote_call(
                CREATE_JIRA_ISSUE,
                format!(
                    "issue was not created in project {}; no further detail is available",
                    request.project_key
                ),
            )
        })?;

        let issue_url = self.config.browse_url(&created.key);

        Ok(CreateJiraIssueResult {
            message: format!(
                "Successfully created {} '{}' in project {}. View at: {}",
                issue_type.name().to_lowercase(),
                request.summary,
                request.project_key,
                issue_url
            ),
            issue_key: created.key,
            issue_id: created.id,
            issue_url,
            project_key: request.project_key,
            issue_type: issue_type.name().to_string(),
        })
    }
}

#[async_trait]
impl ToolHandler for CreateJiraIssueTool {
    async fn call(&self, arguments: Value) -> JiraBridgeResult<Value> {
        let params: CreateJiraIssueParams = serde_json::from_value(arguments)
            .map_err(|e| JiraBridgeError::invalid_param("arguments", e.to_string()))?;

        let result = self.execute(params).await?;
        Ok(serde_json::to_value(result)?)
    }
}
