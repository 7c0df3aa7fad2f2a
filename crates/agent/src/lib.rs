//! # Cloakroom Agent
//!
//! The pipeline that sequences one conversation turn:
//! mask the user text → let the model reason and call tools over tokens →
//! unmask the final answer.
//!
//! Sequencing is the safety mechanism here: masking fully completes
//! (including all compendium insertions) before any token is exposed to the
//! model, and unmasking only runs once the tool loop has produced a final
//! text response. The model and every tool see tokens only.

pub mod pipeline;
pub mod provider;

pub use pipeline::{MaskedAgent, TurnOutcome};
pub use provider::DemoProvider;

/// The default system prompt. Documents the token contract to the model:
/// tokens are opaque and must be copied verbatim.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Ты – мой личный ассистент. Реши поставленную задачу, \
используя доступные тебе инструменты. Некоторые сущности в разговоре заменены плейсхолдерами \
вида ⟪PII:<KIND>:<id>⟫. Обращайся с каждым таким плейсхолдером как с непрозрачным \
идентификатором: копируй его дословно, никогда не переводи, не склоняй и не изменяй.";
