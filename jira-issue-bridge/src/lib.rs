//! Jira Issue Bridge Library
//!
//! Exposes Jira issue creation as a Model Context Protocol (MCP) tool.
//! The bridge owns one authenticated session to a Jira instance and maps
//! tool calls onto the Jira REST API through the gouqi client.
//!
//! ## Features
//!
//! - **One tool**: `create_jira_issue`, with the code block embedded in a `{noformat}` section
//! - **Explicit tool registry**: name, description and JSON schema looked up by hosts
//! - **Managed session**: created once at startup, released at shutdown
//! - **Demo mode**: create a single example issue and exit

use crate::config::{BridgeConfig, RunMode};
use crate::connection::{ConnectionManager, SessionHandle};
use crate::error::JiraBridgeResult;
use crate::gateway::IssueGateway;
use crate::jira_client::IssueCreateResult;
use crate::tools::{
    build_registry, CreateJiraIssueParams, CreateJiraIssueResult, CreateJiraIssueTool,
    ToolRegistry,
};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use std::sync::Arc;
use tracing::{error, info, instrument};

// Re-export modules for external use
pub mod config;
pub mod connection;
pub mod demo;
pub mod error;
pub mod gateway;
pub mod issue_types;
pub mod jira_client;
pub mod tools;

/// Jira Issue Bridge MCP server
///
/// Uses the #[mcp_server] macro for the MCP transport infrastructure.
#[mcp_server(
    name = "Jira Issue Bridge",
    version = "0.1.0",
    description = "Creates Jira issues with embedded code blocks on behalf of AI agents",
    auth = "disabled"
)]
#[derive(Clone)]
pub struct JiraIssueBridge {
    /// Configuration
    config: Arc<BridgeConfig>,

    /// Owner of the Jira session
    connection: Arc<ConnectionManager>,

    /// Fetch and create operations
    gateway: Arc<IssueGateway>,

    /// Tool implementations
    create_issue_tool: Arc<CreateJiraIssueTool>,

    /// Lookup table of published tools
    tools: Arc<ToolRegistry>,
}

impl Default for JiraIssueBridge {
    fn default() -> Self {
        // Placeholder for the MCP macros; construct through `new()` or `with_config()`
        panic!("JiraIssueBridge cannot be created with default(). Use JiraIssueBridge::new() instead.")
    }
}

impl JiraIssueBridge {
    /// Create a bridge from configuration files and environment variables
    #[instrument]
    pub async fn new() -> JiraBridgeResult<Self> {
        info!("Initializing Jira Issue Bridge");

        let config = BridgeConfig::load()?;
        info!("Configuration loaded successfully");

        Self::with_config(config).await
    }

    /// Create a bridge with an explicit configuration
    #[instrument(skip(config))]
    pub async fn with_config(config: BridgeConfig) -> JiraBridgeResult<Self> {
        let connection = Arc::new(ConnectionManager::new());
        connection.initialize(&config.jira.server).await?;

        Self::assemble(config, connection)
    }

    /// Create a bridge around an already constructed session
    pub async fn with_session(config: BridgeConfig, session: SessionHandle) -> JiraBridgeResult<Self> {
        let connection = Arc::new(ConnectionManager::new());
        connection.install(session).await;

        Self::assemble(config, connection)
    }

    fn assemble(config: BridgeConfig, connection: Arc<ConnectionManager>) -> JiraBridgeResult<Self> {
        let config = Arc::new(config);
        let gateway = Arc::new(IssueGateway::new(Arc::clone(&connection)));

        let create_issue_tool = Arc::new(CreateJiraIssueTool::new(
            Arc::clone(&gateway),
            Arc::clone(&config),
        ));

        let tools = Arc::new(build_registry(Arc::clone(&create_issue_tool))?);

        info!("Jira Issue Bridge initialized with {} tool(s)", tools.len());

        Ok(Self {
            config,
            connection,
            gateway,
            create_issue_tool,
            tools,
        })
    }
}

/// All public methods in this impl block become MCP tools automatically
#[mcp_tools]
impl JiraIssueBridge {
    /// Creates a Jira issue in the specified project with a summary (title), and description.
    ///
    /// The description will include a free text and the highlighted code block (from the user).
    ///
    /// # Examples
    /// - Report a snippet: `{"projectKey": "RTFS", "summary": "NPE in parser", "freeText": "Seen on startup", "codeblock": "let x = y.unwrap();"}`
    /// - File a bug: `{"projectKey": "RTFS", "summary": "Crash", "freeText": "Steps below", "codeblock": "cargo run", "issueType": "bug"}`
    #[instrument(skip(self))]
    pub async fn create_jira_issue(
        &self,
        params: CreateJiraIssueParams,
    ) -> anyhow::Result<CreateJiraIssueResult> {
        self.create_issue_tool.execute(params).await.map_err(|e| {
            error!("create_jira_issue failed: {}", e);
            anyhow::anyhow!("[{}] {}", e.error_code(), e)
        })
    }
}

// Lifecycle and embedding helpers, not exposed as MCP tools
impl JiraIssueBridge {
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn mode(&self) -> RunMode {
        self.config.mode
    }

    pub fn gateway(&self) -> &IssueGateway {
        &self.gateway
    }

    /// Tool lookup table for hosts that dispatch without MCP
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the startup demonstration
    pub async fn run_demo(&self) -> Option<IssueCreateResult> {
        demo::run_demo(&self.gateway, &self.config).await
    }

    /// Release the Jira session. Never fails.
    pub async fn shutdown(&self) {
        info!("Shutting down Jira Issue Bridge");
        self.connection.shutdown().await;
    }
}
