//! Current datetime tool — UTC now in ISO 8601.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use cloakroom_core::error::ToolError;
use cloakroom_core::tool::{Tool, ToolResult};

pub struct CurrentDatetimeTool;

#[async_trait]
impl Tool for CurrentDatetimeTool {
    fn name(&self) -> &str {
        "current_datetime"
    }

    fn description(&self) -> &str {
        "Return the current Coordinated Universal Time (UTC) in ISO 8601 format."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(ToolResult::success(now))
    }
}
