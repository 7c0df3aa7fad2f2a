//! Demo provider — a deterministic stand-in for a model that follows the
//! token protocol.
//!
//! Real LLM backends are external collaborators; this stub understands just
//! enough to drive the pipeline end-to-end without network access: if the
//! user message carries two person tokens it asks for an age comparison,
//! and once a tool result arrives it answers with that result verbatim.

use async_trait::async_trait;
use cloakroom_core::error::ProviderError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::message::{Message, MessageToolCall, Role};
use cloakroom_core::provider::{Provider, ProviderRequest, ProviderResponse};
use cloakroom_masking::{find_tokens, Token};
use uuid::Uuid;

pub struct DemoProvider;

#[async_trait]
impl Provider for DemoProvider {
    fn name(&self) -> &str {
        "demo"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        let last = request
            .messages
            .last()
            .ok_or_else(|| ProviderError::RequestFailed("empty message list".into()))?;

        // A tool already answered — relay its output as the final text.
        if last.role == Role::Tool {
            return Ok(respond(Message::assistant(&last.content)));
        }

        let user = request
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .ok_or_else(|| ProviderError::RequestFailed("no user message".into()))?;

        let person_tokens: Vec<&str> = find_tokens(&user.content)
            .into_iter()
            .filter(|t| {
                Token::parse(t).is_some_and(|token| token.kind() == PiiKind::Person)
            })
            .collect();

        if person_tokens.len() >= 2 && request.tools.iter().any(|t| t.name == "compare_age") {
            let arguments = serde_json::json!({
                "token_a": person_tokens[0],
                "token_b": person_tokens[1],
            })
            .to_string();
            let mut message = Message::assistant("");
            message.tool_calls.push(MessageToolCall {
                id: format!("call_{}", Uuid::new_v4().simple()),
                name: "compare_age".into(),
                arguments,
            });
            return Ok(respond(message));
        }

        // Nothing to look up — echo the (masked) question back.
        Ok(respond(Message::assistant(&user.content)))
    }
}

fn respond(message: Message) -> ProviderResponse {
    ProviderResponse {
        message,
        model: "demo".into(),
    }
}
