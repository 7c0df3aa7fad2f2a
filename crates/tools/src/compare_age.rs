//! Age comparison tool — says which of two tokenized people is older.
//!
//! The answer is phrased purely in the input tokens; no age or birth year
//! leaks into model-visible text.

use crate::knowledge::KnowledgeBase;
use async_trait::async_trait;
use cloakroom_core::error::ToolError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::tool::{Tool, ToolResult};
use cloakroom_masking::SharedCompendium;
use std::sync::Arc;

pub struct CompareAgeTool {
    compendium: SharedCompendium,
    knowledge: Arc<KnowledgeBase>,
}

impl CompareAgeTool {
    pub fn new(compendium: SharedCompendium, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            compendium,
            knowledge,
        }
    }

    /// Birth year behind a person token, or `None` if the token or the
    /// person is unknown.
    async fn birth_year(&self, token: &str) -> Option<i32> {
        let sub = self.compendium.get(token).await?;
        if sub.kind != PiiKind::Person {
            return None;
        }
        self.knowledge.birth_year(&sub.lemma)
    }
}

#[async_trait]
impl Tool for CompareAgeTool {
    fn name(&self) -> &str {
        "compare_age"
    }

    fn description(&self) -> &str {
        "Compare the ages of two people referenced by PII tokens. The answer refers to them by their tokens; copy tokens verbatim."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "token_a": {
                    "type": "string",
                    "description": "PERSON token of the first person"
                },
                "token_b": {
                    "type": "string",
                    "description": "PERSON token of the second person"
                }
            },
            "required": ["token_a", "token_b"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let token_a = arguments["token_a"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'token_a' argument".into()))?;
        let token_b = arguments["token_b"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'token_b' argument".into()))?;

        let (Some(year_a), Some(year_b)) =
            (self.birth_year(token_a).await, self.birth_year(token_b).await)
        else {
            return Ok(ToolResult::unknown("age comparison"));
        };

        // An earlier birth year means older; ages themselves stay hidden.
        let output = match year_a.cmp(&year_b) {
            std::cmp::Ordering::Less => format!("{token_a} is older than {token_b}"),
            std::cmp::Ordering::Greater => format!("{token_b} is older than {token_a}"),
            std::cmp::Ordering::Equal => format!("{token_a} and {token_b} are the same age"),
        };
        Ok(ToolResult::success(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloakroom_masking::{Substitution, Token};

    async fn seeded() -> (CompareAgeTool, String, String) {
        let compendium = SharedCompendium::new();
        let a = Token::mint(PiiKind::Person);
        let b = Token::mint(PiiKind::Person);
        compendium
            .add(Substitution::from_token(
                "Пётр Емельянов",
                "пётр емельянов",
                a.clone(),
            ))
            .await;
        compendium
            .add(Substitution::from_token(
                "Александр Митрофанов",
                "александр митрофанов",
                b.clone(),
            ))
            .await;
        let tool = CompareAgeTool::new(compendium, Arc::new(KnowledgeBase::with_demo_data()));
        (tool, a.as_str().to_string(), b.as_str().to_string())
    }

    #[tokio::test]
    async fn older_person_is_named_by_token() {
        let (tool, a, b) = seeded().await;
        let result = tool
            .execute(serde_json::json!({ "token_a": a, "token_b": b }))
            .await
            .unwrap();

        // Born 1978 vs 1985: the first token is older.
        assert_eq!(result.output, format!("{a} is older than {b}"));
    }

    #[tokio::test]
    async fn answer_leaks_no_digits() {
        let (tool, a, b) = seeded().await;
        let result = tool
            .execute(serde_json::json!({ "token_a": a, "token_b": b }))
            .await
            .unwrap();

        // Strip the tokens; nothing numeric may remain.
        let remainder = result.output.replace(&a, "").replace(&b, "");
        assert!(!remainder.chars().any(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn unknown_person_is_recoverable() {
        let (tool, a, _) = seeded().await;
        let result = tool
            .execute(serde_json::json!({
                "token_a": a,
                "token_b": "⟪PII:PERSON:ffffffff⟫"
            }))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "age comparison unknown");
    }

    #[tokio::test]
    async fn missing_argument_is_an_error() {
        let (tool, a, _) = seeded().await;
        let err = tool
            .execute(serde_json::json!({ "token_a": a }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
