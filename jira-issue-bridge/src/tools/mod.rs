//! Tools module for the Jira issue bridge
//!
//! Contains the tool registry and the tools published through it.

pub mod create_issue;
pub mod registry;

pub use create_issue::*;
pub use registry::*;

use crate::error::JiraBridgeResult;
use std::sync::Arc;

/// Registry holding every tool the bridge publishes
pub fn build_registry(create_issue: Arc<CreateJiraIssueTool>) -> JiraBridgeResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register::<CreateJiraIssueParams>(
        CREATE_JIRA_ISSUE,
        CREATE_JIRA_ISSUE_DESCRIPTION,
        create_issue,
    )?;
    Ok(registry)
}
