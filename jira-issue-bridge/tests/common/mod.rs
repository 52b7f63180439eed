/// Common utilities for Jira Issue Bridge integration tests
use async_trait::async_trait;
use jira_issue_bridge::config::{BridgeConfig, ServerConfig};
use jira_issue_bridge::error::{JiraBridgeError, JiraBridgeResult};
use jira_issue_bridge::jira_client::{IssueApi, IssueCreateResult, IssueInput, RetrievedIssue};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

pub const TEST_JIRA_URL: &str = "https://test.atlassian.net";

/// Config pointing at a fictional instance
#[allow(dead_code)]
pub fn test_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.jira.server = ServerConfig {
        url: TEST_JIRA_URL.to_string(),
        username: "bot@example.com".to_string(),
        password: "api-token".to_string(),
    };
    config
}

/// How the mock answers create calls
#[allow(dead_code)]
pub enum CreateBehavior {
    Succeed { key: String, id: String },
    Fail(String),
}

/// In-memory `IssueApi` recording every create input
#[allow(dead_code)]
pub struct MockIssueApi {
    create_behavior: CreateBehavior,
    issues: HashMap<String, RetrievedIssue>,
    created_inputs: Mutex<Vec<IssueInput>>,
    closes: AtomicUsize,
}

#[allow(dead_code)]
impl MockIssueApi {
    pub fn succeeding(key: &str) -> Self {
        Self {
            create_behavior: CreateBehavior::Succeed {
                key: key.to_string(),
                id: "10042".to_string(),
            },
            issues: HashMap::new(),
            created_inputs: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            create_behavior: CreateBehavior::Fail(message.to_string()),
            ..Self::succeeding("UNUSED-0")
        }
    }

    pub fn with_issue(mut self, key: &str, summary: &str) -> Self {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("summary".to_string(), json!(summary));
        fields.insert("labels".to_string(), json!(["backend"]));
        self.issues.insert(
            key.to_string(),
            RetrievedIssue {
                key: key.to_string(),
                id: "10001".to_string(),
                summary: summary.to_string(),
                fields,
            },
        );
        self
    }

    pub fn created_inputs(&self) -> Vec<IssueInput> {
        self.created_inputs.lock().unwrap().clone()
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssueApi for MockIssueApi {
    async fn get_issue(&self, issue_key: &str) -> JiraBridgeResult<RetrievedIssue> {
        self.issues
            .get(issue_key)
            .cloned()
            .ok_or_else(|| JiraBridgeError::not_found("issue", issue_key))
    }

    async fn create_issue(&self, input: &IssueInput) -> JiraBridgeResult<IssueCreateResult> {
        self.created_inputs.lock().unwrap().push(input.clone());

        match &self.create_behavior {
            CreateBehavior::Succeed { key, id } => Ok(IssueCreateResult {
                key: key.clone(),
                id: id.clone(),
                self_link: Some(format!("{}/rest/api/2/issue/{}", TEST_JIRA_URL, id)),
            }),
            CreateBehavior::Fail(message) => Err(JiraBridgeError::network(message.clone())),
        }
    }

    async fn close(&self) -> JiraBridgeResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Collects formatted log output for assertions
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl LogCapture {
    /// Route this thread's tracing output into the capture until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Lines logged at `level` ("ERROR", "WARN", "INFO", ...)
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().any(|word| word == level))
            .map(str::to_string)
            .collect()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buffer))
    }
}

/// MCP Test Client for sending JSON-RPC requests to the server binary
#[allow(dead_code)]
pub struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

#[allow(dead_code)]
impl McpTestClient {
    /// Spawn the server with the given Jira settings
    pub fn spawn(
        jira_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut child = Command::new(env!("CARGO_BIN_EXE_jira-issue-bridge"))
            .env("JIRA_SERVER_URL", jira_url)
            .env("JIRA_SERVER_USERNAME", username)
            .env("JIRA_SERVER_PASSWORD", password)
            .env("JIRA_BRIDGE_MODE", "serve")
            .env("RUST_LOG", "error")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null()) // Suppress stderr for cleaner test output
            .spawn()?;

        let stdin = child.stdin.take().ok_or("Failed to open stdin")?;
        let stdout = child.stdout.take().ok_or("Failed to open stdout")?;
        let stdout = BufReader::new(stdout);

        let mut client = Self {
            child,
            stdin,
            stdout,
        };

        client.initialize()?;

        Ok(client)
    }

    /// Spawn the server against the instance configured in `.env`
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::from_filename(".env").ok();

        let jira_url = std::env::var("JIRA_SERVER_URL")?;
        let username = std::env::var("JIRA_SERVER_USERNAME")?;
        let password = std::env::var("JIRA_SERVER_PASSWORD")?;

        Self::spawn(&jira_url, &username, &password)
    }

    /// Initialize the MCP session
    fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "rust-test-client",
                    "version": "1.0.0"
                }
            }
        });

        self.send_request(&request)?;
        let response = self.read_response()?;

        if response.get("error").is_some() {
            return Err(format!("Initialization failed: {:?}", response["error"]).into());
        }

        Ok(())
    }

    /// List the tools the server publishes
    pub fn list_tools(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/list",
            "params": {}
        });

        self.send_request(&request)?;
        self.read_response()
    }

    /// Call an MCP tool
    pub fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/call",
            "params": {
                "name": tool_name,
                "arguments": arguments
            }
        });

        self.send_request(&request)?;
        self.read_response()
    }

    fn send_request(&mut self, request: &Value) -> Result<(), Box<dyn std::error::Error>> {
        let request_str = serde_json::to_string(request)?;
        writeln!(self.stdin, "{}", request_str)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_response(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = String::new();
        self.stdout.read_line(&mut line)?;

        if line.is_empty() {
            return Err("Server closed connection".into());
        }

        let response: Value = serde_json::from_str(&line)?;
        Ok(response)
    }

    /// Extract the structured tool result from a tools/call response
    pub fn extract_tool_result(response: &Value) -> Result<Value, String> {
        if let Some(error) = response.get("error") {
            return Err(format!("Tool call failed: {:?}", error));
        }

        let result = response.get("result").ok_or("No result in response")?;

        let content = result
            .get("content")
            .ok_or("No content in result")?
            .as_array()
            .ok_or("Content is not an array")?;

        let text = content
            .iter()
            .find(|item| item.get("type") == Some(&Value::String("text".to_string())))
            .and_then(|item| item.get("text"))
            .and_then(Value::as_str)
            .ok_or("No text content found")?;

        serde_json::from_str(text)
            .map_err(|e| format!("Failed to parse tool result JSON: {}. Text was: {}", e, text))
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        // Kill the server process when the client is dropped
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Project used by tests against a real instance
#[allow(dead_code)]
pub fn test_project_key() -> String {
    std::env::var("TEST_PROJECT_KEY").unwrap_or_else(|_| "RTFS".to_string())
}
