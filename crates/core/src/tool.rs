//! Tool trait — the abstraction over token-facing agent capabilities.
//!
//! Tools are how the agent acts on a masked conversation: resolve facts
//! about a tokenized entity, compare entities, fetch the current time. A
//! tool sees tokens, never raw PII — lookups go through the session
//! compendium and are keyed by lemma, and a tool whose result is itself
//! sensitive re-wraps it as a fresh token before returning.

use crate::error::ToolError;
use crate::kind::PiiKind;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A request to execute a tool, as decoded from a model message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// What a tool hands back to the loop.
///
/// `output` is the model-visible text and must contain tokens and
/// non-sensitive content only — that invariant is each tool's to uphold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful result with the given output text.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: output.into(),
            data: None,
        }
    }

    /// A recoverable "unknown" result, e.g. for a token with no compendium
    /// entry or an entity absent from the knowledge base. Not an error: the
    /// model sees "<what> unknown" and can carry on with the turn.
    pub fn unknown(what: &str) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: format!("{what} unknown"),
            data: Some(serde_json::json!({ "status": "unknown" })),
        }
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The core Tool trait.
///
/// Implemented by every built-in tool (person_age, relationship,
/// compare_age, current_datetime) and registered in a [`ToolRegistry`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "person_age").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// The kind of token this tool mints for its result, if its result is
    /// sensitive and gets re-wrapped (NUMBER for ages, RELATIONSHIP for
    /// relations). `None` for tools whose output is safe as plain text.
    fn wraps_kind(&self) -> Option<PiiKind> {
        None
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value)
        -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// The set of tools available to one agent session.
///
/// Ordered by name so the definitions sent to the model are stable across
/// runs.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, in name order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// All registered tool names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Execute a tool call and stamp the result with its call ID.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        debug!(tool = %call.name, call_id = %call.id, "Executing tool call");
        let mut result = tool.execute(call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }
}
