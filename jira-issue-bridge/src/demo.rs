//! One-shot startup demonstration
//!
//! Creates a single example issue and logs where to find it.

use crate::config::BridgeConfig;
use crate::gateway::{IssueCreateRequest, IssueGateway};
use crate::jira_client::IssueCreateResult;
use tracing::{info, instrument, warn};

pub const DEMO_SUMMARY: &str = "created using jira-issue-bridge";

pub const DEMO_FREE_TEXT: &str = "\
This is a test issue created using the Jira SDK.
It contains a code block and some free text.
";

pub const DEMO_CODE_BLOCK: &str = r#"fn main() {
    println!("hello from jira-issue-bridge");
}
"#;

/// Example request against `project_key`
pub fn demo_request(project_key: &str) -> IssueCreateRequest {
    IssueCreateRequest::new(project_key, DEMO_SUMMARY, DEMO_FREE_TEXT, DEMO_CODE_BLOCK)
}

/// Create the demo issue and log its browsable URL, or warn on failure
#[instrument(skip_all, fields(project_key = %config.demo_project_key))]
pub async fn run_demo(gateway: &IssueGateway, config: &BridgeConfig) -> Option<IssueCreateResult> {
    let created = gateway
        .create_issue(&demo_request(&config.demo_project_key))
        .await;

    match &created {
        Some(issue) => info!(
            "Issue created successfully: {}",
            config.browse_url(&issue.key)
        ),
        None => warn!("Failed to create issue."),
    }

    created
}
