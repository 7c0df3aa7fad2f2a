//! Command implementations and shared session wiring.

pub mod demo;
pub mod init;
pub mod mask;
pub mod roundtrip;
pub mod rules;

use cloakroom_config::AppConfig;
use cloakroom_core::detect::DetectionRule;
use cloakroom_detect::{default_detection_rules, RegexDetector, SuffixLemmatizer};
use cloakroom_masking::{Masker, SharedCompendium};
use std::io::Read;
use std::sync::Arc;

type CliError = Box<dyn std::error::Error>;

/// One session's wiring: masker plus the compendium handle tools share.
pub(crate) struct Session {
    pub masker: Masker,
    pub compendium: SharedCompendium,
}

/// Build a session from config: detector, lemmatizer, and a fresh
/// compendium. Every CLI invocation is its own session.
pub(crate) fn build_session(config: &AppConfig) -> Result<Session, CliError> {
    if config.detector.backend != "regex" {
        return Err(format!("unknown detector backend: {}", config.detector.backend).into());
    }

    let compendium = SharedCompendium::new();
    let detector = Arc::new(RegexDetector::new(&active_rules(config))?);
    let lemmatizer = Arc::new(
        SuffixLemmatizer::new().with_overrides(config.lemmatizer.overrides.clone()),
    );
    let masker = Masker::new(detector, lemmatizer, compendium.clone())
        .with_kinds(config.masking.kinds.clone())
        .with_language(&config.masking.language);

    Ok(Session { masker, compendium })
}

/// The rule set in effect: configured rules, or the built-in defaults.
pub(crate) fn active_rules(config: &AppConfig) -> Vec<DetectionRule> {
    if config.detector.rules.is_empty() {
        default_detection_rules()
    } else {
        config.detector.rules.clone()
    }
}

/// Take text from the argument, or read all of stdin.
pub(crate) fn read_input(text: Option<String>) -> Result<String, CliError> {
    match text {
        Some(t) => Ok(t),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf.trim_end_matches('\n').to_string())
        }
    }
}
