//! Person age tool — resolves a person token to an age.
//!
//! The age itself is sensitive, so it never appears in the output: it is
//! re-wrapped as a fresh NUMBER token recorded in the session compendium,
//! and the model receives only that token.

use crate::knowledge::KnowledgeBase;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use cloakroom_core::error::ToolError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::tool::{Tool, ToolResult};
use cloakroom_masking::{SharedCompendium, Substitution, Token};
use std::sync::Arc;
use tracing::debug;

pub struct PersonAgeTool {
    compendium: SharedCompendium,
    knowledge: Arc<KnowledgeBase>,
}

impl PersonAgeTool {
    pub fn new(compendium: SharedCompendium, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            compendium,
            knowledge,
        }
    }
}

#[async_trait]
impl Tool for PersonAgeTool {
    fn name(&self) -> &str {
        "person_age"
    }

    fn description(&self) -> &str {
        "Look up the age of a person referenced by a PII token. Returns a NUMBER token standing for the age; copy it verbatim."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "token": {
                    "type": "string",
                    "description": "A PERSON token, e.g. ⟪PII:PERSON:a1b2c3d4⟫"
                }
            },
            "required": ["token"]
        })
    }

    fn wraps_kind(&self) -> Option<PiiKind> {
        Some(PiiKind::Number)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let token = arguments["token"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'token' argument".into()))?;

        let Some(sub) = self.compendium.get(token).await else {
            debug!(%token, "Token has no compendium entry");
            return Ok(ToolResult::unknown("age"));
        };
        if sub.kind != PiiKind::Person {
            return Err(ToolError::InvalidArguments(format!(
                "expected a PERSON token, got {}",
                sub.kind
            )));
        }

        let Some(birth_year) = self.knowledge.birth_year(&sub.lemma) else {
            return Ok(ToolResult::unknown("age"));
        };
        let age = Utc::now().year() - birth_year;

        let wrapped = Token::mint(PiiKind::Number);
        self.compendium
            .add(Substitution::from_token(
                age.to_string(),
                age.to_string(),
                wrapped.clone(),
            ))
            .await;

        Ok(ToolResult::success(wrapped.as_str())
            .with_data(serde_json::json!({ "token": wrapped.as_str() })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (PersonAgeTool, String) {
        let compendium = SharedCompendium::new();
        let token = Token::mint(PiiKind::Person);
        compendium
            .add(Substitution::from_token(
                "Аркадия Стругацкого",
                "аркадий стругацкий",
                token.clone(),
            ))
            .await;
        let tool = PersonAgeTool::new(compendium, Arc::new(KnowledgeBase::with_demo_data()));
        (tool, token.as_str().to_string())
    }

    #[tokio::test]
    async fn known_person_yields_number_token() {
        let (tool, token) = seeded().await;
        let result = tool
            .execute(serde_json::json!({ "token": token }))
            .await
            .unwrap();

        assert!(result.success);
        let wrapped = result.output;
        assert!(wrapped.starts_with("⟪PII:NUMBER:"));

        // The wrapped token resolves to the actual age in the compendium.
        let sub = tool.compendium.get(&wrapped).await.unwrap();
        let expected = (Utc::now().year() - 1925).to_string();
        assert_eq!(sub.text, expected);
        assert_eq!(sub.kind, PiiKind::Number);
    }

    #[tokio::test]
    async fn unknown_token_is_recoverable() {
        let (tool, _) = seeded().await;
        let result = tool
            .execute(serde_json::json!({ "token": "⟪PII:PERSON:ffffffff⟫" }))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "age unknown");
    }

    #[tokio::test]
    async fn person_missing_from_knowledge_base() {
        let compendium = SharedCompendium::new();
        let token = Token::mint(PiiKind::Person);
        compendium
            .add(Substitution::from_token("Неизвестный", "неизвестный", token.clone()))
            .await;
        let tool = PersonAgeTool::new(compendium, Arc::new(KnowledgeBase::with_demo_data()));

        let result = tool
            .execute(serde_json::json!({ "token": token.as_str() }))
            .await
            .unwrap();
        assert_eq!(result.output, "age unknown");
    }

    #[tokio::test]
    async fn non_person_token_is_an_argument_error() {
        let compendium = SharedCompendium::new();
        let token = Token::mint(PiiKind::Location);
        compendium
            .add(Substitution::from_token("Москве", "москва", token.clone()))
            .await;
        let tool = PersonAgeTool::new(compendium, Arc::new(KnowledgeBase::with_demo_data()));

        let err = tool
            .execute(serde_json::json!({ "token": token.as_str() }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn missing_argument_is_an_error() {
        let (tool, _) = seeded().await;
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
