//! Built-in tool implementations for Cloakroom.
//!
//! Tools operate on tokens, never on raw PII: a tool resolves a token
//! through the session compendium, looks up facts by the entry's *lemma*,
//! and — when the result is itself sensitive — re-wraps it as a fresh
//! NUMBER or RELATIONSHIP token before anything reaches model-visible text.
//!
//! A token with no compendium entry is a recoverable "unknown" result, not
//! an error: the model sees e.g. "age unknown" and carries on.

pub mod compare_age;
pub mod current_datetime;
pub mod knowledge;
pub mod person_age;
pub mod relationship;

use cloakroom_core::tool::ToolRegistry;
use cloakroom_masking::SharedCompendium;
use std::sync::Arc;

pub use knowledge::{KnowledgeBase, PersonFacts};

/// Create a registry with all built-in tools wired to one session's
/// compendium and a shared knowledge base.
pub fn default_registry(
    compendium: SharedCompendium,
    knowledge: Arc<KnowledgeBase>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(person_age::PersonAgeTool::new(
        compendium.clone(),
        knowledge.clone(),
    )));
    registry.register(Box::new(relationship::RelationshipTool::new(
        compendium.clone(),
        knowledge.clone(),
    )));
    registry.register(Box::new(compare_age::CompareAgeTool::new(
        compendium,
        knowledge,
    )));
    registry.register(Box::new(current_datetime::CurrentDatetimeTool));
    registry
}
