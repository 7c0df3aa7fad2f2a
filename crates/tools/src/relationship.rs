//! Relationship tool — resolves how one tokenized person relates to another.
//!
//! The relation label is sensitive (it says something true about real
//! people), so it is re-wrapped as a RELATIONSHIP token; the model only
//! ever sees the placeholder.

use crate::knowledge::KnowledgeBase;
use async_trait::async_trait;
use cloakroom_core::error::ToolError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::tool::{Tool, ToolResult};
use cloakroom_masking::{SharedCompendium, Substitution, Token};
use std::sync::Arc;

pub struct RelationshipTool {
    compendium: SharedCompendium,
    knowledge: Arc<KnowledgeBase>,
}

impl RelationshipTool {
    pub fn new(compendium: SharedCompendium, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            compendium,
            knowledge,
        }
    }

    /// Resolve a person token to its lemma, or `None` for anything that
    /// cannot be resolved to a PERSON entry.
    async fn person_lemma(&self, token: &str) -> Option<String> {
        let sub = self.compendium.get(token).await?;
        (sub.kind == PiiKind::Person).then_some(sub.lemma)
    }
}

#[async_trait]
impl Tool for RelationshipTool {
    fn name(&self) -> &str {
        "relationship"
    }

    fn description(&self) -> &str {
        "Look up how the first tokenized person relates to the second. Returns a RELATIONSHIP token standing for the relation; copy it verbatim."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "token_a": {
                    "type": "string",
                    "description": "PERSON token of the subject"
                },
                "token_b": {
                    "type": "string",
                    "description": "PERSON token of the other person"
                }
            },
            "required": ["token_a", "token_b"]
        })
    }

    fn wraps_kind(&self) -> Option<PiiKind> {
        Some(PiiKind::Relationship)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let token_a = arguments["token_a"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'token_a' argument".into()))?;
        let token_b = arguments["token_b"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'token_b' argument".into()))?;

        let (Some(lemma_a), Some(lemma_b)) = (
            self.person_lemma(token_a).await,
            self.person_lemma(token_b).await,
        ) else {
            return Ok(ToolResult::unknown("relationship"));
        };

        let Some(relation) = self.knowledge.relation(&lemma_a, &lemma_b) else {
            return Ok(ToolResult::unknown("relationship"));
        };

        let wrapped = Token::mint(PiiKind::Relationship);
        self.compendium
            .add(Substitution::from_token(relation, relation, wrapped.clone()))
            .await;

        Ok(ToolResult::success(wrapped.as_str())
            .with_data(serde_json::json!({ "token": wrapped.as_str() })))
    }
}
