//! Lookup table of callable tools
//!
//! Each entry pairs a name, a description and a generated JSON input schema
//! with the handler that serves it. Hosts list the descriptors to discover
//! capabilities and dispatch calls by name.

use crate::error::{JiraBridgeError, JiraBridgeResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Something a registered tool dispatches to
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> JiraBridgeResult<Value>;
}

/// Discovery metadata for one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub input_schema: Value,
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name` with the schema of `P`
    pub fn register<P: JsonSchema>(
        &mut self,
        name: &str,
        description: &str,
        handler: Arc<dyn ToolHandler>,
    ) -> JiraBridgeResult<()> {
        if self.tools.contains_key(name) {
            return Err(JiraBridgeError::invalid_param(
                "name",
                format!("Tool '{}' is already registered", name),
            ));
        }

        let input_schema = serde_json::to_value(schemars::schema_for!(P))?;
        let descriptor = ToolDescriptor {
            name: name.to_string(),
            description: description.trim().to_string(),
            input_schema,
        };

        self.tools.insert(
            name.to_string(),
            RegisteredTool {
                descriptor,
                handler,
            },
        );
        info!("Registered tool: {}", name);
        Ok(())
    }

    /// All descriptors, ordered by name
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| tool.descriptor.clone())
            .collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name).map(|tool| &tool.descriptor)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call to the tool registered as `name`
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Value) -> JiraBridgeResult<Value> {
        let tool = self.tools.get(name).ok_or_else(|| {
            JiraBridgeError::invalid_param("name", format!("Unknown tool '{}'", name))
        })?;

        debug!("Invoking tool {}", name);
        tool.handler.call(arguments).await
    }
}
