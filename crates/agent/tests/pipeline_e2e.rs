//! End-to-end pipeline tests: real regex detection, real lemmatization,
//! real tools, demo provider — everything wired the way the CLI wires it.

use cloakroom_agent::{DemoProvider, MaskedAgent};
use cloakroom_detect::{default_detection_rules, RegexDetector, SuffixLemmatizer};
use cloakroom_masking::{contains_token, Masker, SharedCompendium};
use cloakroom_tools::{default_registry, KnowledgeBase};
use std::sync::Arc;

fn build_agent() -> MaskedAgent {
    let compendium = SharedCompendium::new();
    let detector =
        Arc::new(RegexDetector::new(&default_detection_rules()).expect("builtin rules compile"));
    let lemmatizer = Arc::new(SuffixLemmatizer::new());
    let masker = Masker::new(detector, lemmatizer, compendium.clone());
    let tools = Arc::new(default_registry(
        compendium,
        Arc::new(KnowledgeBase::with_demo_data()),
    ));
    MaskedAgent::new(Arc::new(DemoProvider), "demo", masker, tools)
}

#[tokio::test]
async fn age_comparison_turn() {
    let agent = build_agent();

    let outcome = agent
        .process("Кто старше Пётр Емельянов или Александр Митрофанов?")
        .await
        .unwrap();

    // The model-visible answer refers to people by token only.
    assert!(contains_token(&outcome.masked_answer));
    assert!(!outcome.masked_answer.contains("Емельянов"));

    // The unmasked answer names the actual people and carries no tokens.
    assert!(outcome.answer.contains("Пётр Емельянов"));
    assert!(outcome.answer.contains("Александр Митрофанов"));
    assert!(!contains_token(&outcome.answer));

    // Born 1978 beats born 1985.
    assert!(outcome.answer.starts_with("Пётр Емельянов is older"));
}

#[tokio::test]
async fn masking_round_trips_through_echo() {
    let agent = build_agent();

    // One person token only: the demo provider echoes the masked question,
    // and unmasking must restore the original text exactly.
    let text = "Иван Петров живёт в Москве";
    let outcome = agent.process(text).await.unwrap();

    assert!(contains_token(&outcome.masked_answer));
    assert_eq!(outcome.answer, text);
}

#[tokio::test]
async fn unknown_people_degrade_gracefully() {
    let agent = build_agent();

    let outcome = agent
        .process("Кто старше Семён Голубев или Матвей Чижов?")
        .await
        .unwrap();

    // Both people are absent from the knowledge base: the tool reports
    // unknown and the turn still completes.
    assert_eq!(outcome.answer, "age comparison unknown");
}

#[tokio::test]
async fn detector_backend_is_pluggable() {
    use cloakroom_core::detect::IdentityLemmatizer;
    use cloakroom_core::kind::PiiKind;
    use cloakroom_core::span::PiiSpan;
    use cloakroom_detect::ScriptedDetector;

    // Same pipeline, scripted spans instead of regex rules: exact control
    // over what gets masked.
    let compendium = SharedCompendium::new();
    let detector = Arc::new(ScriptedDetector::new(vec![PiiSpan::new(
        0,
        11,
        PiiKind::Person,
    )]));
    let masker = Masker::new(detector, Arc::new(IdentityLemmatizer), compendium.clone());
    let tools = Arc::new(default_registry(
        compendium,
        Arc::new(KnowledgeBase::with_demo_data()),
    ));
    let agent = MaskedAgent::new(Arc::new(DemoProvider), "demo", masker, tools);

    let text = "Иван Петров уехал";
    let outcome = agent.process(text).await.unwrap();
    assert_eq!(outcome.answer, text);
    assert!(outcome.masked_answer.starts_with("⟪PII:PERSON:"));
}

#[tokio::test]
async fn compendium_records_one_entry_per_span() {
    let agent = build_agent();

    agent
        .process("Кто старше Пётр Емельянов или Александр Митрофанов?")
        .await
        .unwrap();

    // Two person spans were masked; the comparison tool mints no wrapper.
    assert_eq!(agent.masker().compendium().len().await, 2);
}
