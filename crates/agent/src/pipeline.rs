//! The masked agent loop implementation.

use crate::DEFAULT_SYSTEM_PROMPT;
use cloakroom_core::error::Error;
use cloakroom_core::message::Message;
use cloakroom_core::provider::{Provider, ProviderRequest};
use cloakroom_core::tool::{ToolCall, ToolRegistry};
use cloakroom_masking::Masker;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The result of one agent turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The final answer with tokens substituted back to original values.
    pub answer: String,

    /// The model's final text as produced, tokens intact. Useful for
    /// observability: this is everything the model actually saw and said.
    pub masked_answer: String,
}

/// Sequences mask → model/tool loop → unmask for single turns.
pub struct MaskedAgent {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// The session's masking engine
    masker: Masker,

    /// Tool registry (tools share the masker's compendium)
    tools: Arc<ToolRegistry>,

    /// Maximum tool call iterations per turn
    max_iterations: u32,

    /// System prompt documenting the token contract
    system_prompt: String,
}

impl MaskedAgent {
    /// Create an agent for one session.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        masker: Masker,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            masker,
            tools,
            max_iterations: 8,
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        }
    }

    /// Set the maximum number of tool call iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Replace the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// The session's masking engine, for inspection.
    pub fn masker(&self) -> &Masker {
        &self.masker
    }

    /// Process one user message end to end.
    ///
    /// 1. Mask the raw text — a detection failure aborts the turn here,
    ///    before anything reaches the provider
    /// 2. Run the model/tool loop on masked content only
    /// 3. Unmask the final text response
    pub async fn process(&self, user_text: &str) -> Result<TurnOutcome, Error> {
        let masked_input = self.masker.mask(user_text).await?;
        info!(
            entries = self.masker.compendium().len().await,
            "Input masked, starting turn"
        );

        let mut messages = vec![
            Message::system(&self.system_prompt),
            Message::user(&masked_input),
        ];
        let tool_definitions = self.tools.definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                warn!(iterations = iteration, "Max tool iterations reached");
                break;
            }
            debug!(iteration, "Agent loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: tool_definitions.clone(),
            };
            let response = self.provider.complete(request).await?;

            // No tool calls — this is the final text response.
            if response.message.tool_calls.is_empty() {
                let masked_answer = response.message.content.clone();
                let answer = self.masker.unmask(&masked_answer).await;
                info!("Turn complete");
                return Ok(TurnOutcome {
                    answer,
                    masked_answer,
                });
            }

            // The model wants tools — execute each call and feed results back.
            let tool_calls = response.message.tool_calls.clone();
            messages.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                match self.tools.execute(&call).await {
                    Ok(result) => {
                        debug!(tool = %tc.name, success = result.success, "Tool executed");
                        messages.push(Message::tool_result(&tc.id, &result.output));
                    }
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        // Report the error to the model so it can recover.
                        messages.push(Message::tool_result(&tc.id, format!("Error: {e}")));
                    }
                }
            }
        }

        let fallback = "Достигнут лимит вызовов инструментов без итогового ответа.";
        Ok(TurnOutcome {
            answer: fallback.into(),
            masked_answer: fallback.into(),
        })
    }
}
