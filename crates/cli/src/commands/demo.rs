//! `cloakroom demo` — Run one masked agent turn end to end.
//!
//! Wires the full pipeline against the demo provider and a stub knowledge
//! base, then shows both sides of the curtain: what the model saw and what
//! the user gets back.

use super::build_session;
use cloakroom_agent::{DemoProvider, MaskedAgent};
use cloakroom_config::AppConfig;
use cloakroom_tools::{default_registry, KnowledgeBase};
use std::sync::Arc;

const DEMO_QUESTION: &str = "Кто старше Пётр Емельянов или Александр Митрофанов?";

pub async fn run(text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let question = text.unwrap_or_else(|| DEMO_QUESTION.to_string());
    let config = AppConfig::load()?;
    let session = build_session(&config)?;

    let tools = Arc::new(default_registry(
        session.compendium.clone(),
        Arc::new(KnowledgeBase::with_demo_data()),
    ));
    let agent = MaskedAgent::new(
        Arc::new(DemoProvider),
        config.provider.model.clone(),
        session.masker,
        tools,
    )
    .with_max_iterations(config.agent.max_iterations);

    println!("question:      {question}");
    let outcome = agent.process(&question).await?;
    println!("model answer:  {}", outcome.masked_answer);
    println!("final answer:  {}", outcome.answer);

    println!("\ncompendium:");
    println!(
        "{}",
        serde_json::to_string_pretty(&session.compendium.export().await)?
    );

    Ok(())
}
