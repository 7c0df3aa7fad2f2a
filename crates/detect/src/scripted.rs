//! Scripted detector — returns a pre-seeded span set.
//!
//! The masking engine treats detection as a black box, so tests and the CLI
//! demo can drive it with exact, known spans instead of a live NLP backend.

use async_trait::async_trait;
use cloakroom_core::detect::Detector;
use cloakroom_core::error::DetectError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::span::PiiSpan;

pub struct ScriptedDetector {
    spans: Vec<PiiSpan>,
}

impl ScriptedDetector {
    /// A detector that always reports exactly `spans`.
    pub fn new(spans: Vec<PiiSpan>) -> Self {
        Self { spans }
    }

    /// A detector that reports nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(
        &self,
        _text: &str,
        kinds: &[PiiKind],
        _language: &str,
    ) -> Result<Vec<PiiSpan>, DetectError> {
        Ok(self
            .spans
            .iter()
            .filter(|s| kinds.contains(&s.kind))
            .copied()
            .collect())
    }
}
