//! Jira Issue Bridge - create Jira issues from AI agents via MCP
//!
//! Serves the `create_jira_issue` tool over STDIO, or runs a one-shot demo
//! when `JIRA_BRIDGE_MODE=demo`.

use jira_issue_bridge::config::RunMode;
use jira_issue_bridge::JiraIssueBridge;
use pulseengine_mcp_server::McpServerBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the STDIO transport stays clean
    JiraIssueBridge::configure_stdio_logging();

    info!("Starting Jira Issue Bridge...");

    let bridge = match JiraIssueBridge::new().await {
        Ok(bridge) => {
            info!("Jira Issue Bridge created successfully");
            bridge
        }
        Err(e) => {
            error!("Failed to create Jira Issue Bridge: {}", e);
            eprintln!("❌ Failed to start Jira Issue Bridge: {}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_SERVER_URL is set to an absolute http(s) URL");
            eprintln!("  - JIRA_SERVER_USERNAME and JIRA_SERVER_PASSWORD are set");
            eprintln!("  - or the same keys are present under [jira.server] in jira-bridge.toml");
            std::process::exit(1);
        }
    };

    match bridge.mode() {
        RunMode::Demo => {
            info!("Running startup demo");
            bridge.run_demo().await;
        }
        RunMode::Serve => {
            info!("Starting MCP server with STDIO transport...");

            let mut server = bridge.clone().serve_stdio().await?;

            info!("🚀 Jira Issue Bridge is running and ready to serve requests");

            server.run().await?;
        }
    }

    bridge.shutdown().await;
    Ok(())
}
