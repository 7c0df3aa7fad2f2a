//! Detector and Lemmatizer traits — the external capabilities the masking
//! engine is built on.
//!
//! Detection is treated as a black box: given text, it returns labeled spans.
//! Detection *quality* is out of scope here; implementations range from
//! regex rule sets to external NLP model inference. Lemmatization produces
//! the canonical word form used as the lookup key for knowledge tools.

use crate::error::DetectError;
use crate::kind::PiiKind;
use crate::span::PiiSpan;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single rule for a pattern-driven detector: a named pattern producing
/// spans of one kind. How the pattern is interpreted is up to the detector
/// implementation compiling it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    /// Rule name, for diagnostics and rule listings.
    pub name: String,

    /// The pattern source text.
    pub pattern: String,

    /// The kind assigned to spans this rule produces.
    pub kind: PiiKind,
}

/// The detection capability.
///
/// A call may be long-running (external model inference), so the trait is
/// async. The whole span set is returned atomically or the call fails —
/// there are no partial results.
#[async_trait]
pub trait Detector: Send + Sync {
    /// A human-readable name for this detector (e.g., "regex", "scripted").
    fn name(&self) -> &str;

    /// Analyze `text` for the requested kinds and return labeled spans.
    ///
    /// Returned spans use character offsets over `text`, sorted ascending by
    /// start, non-overlapping. The masker re-validates both properties and
    /// rejects malformed output.
    async fn analyze(
        &self,
        text: &str,
        kinds: &[PiiKind],
        language: &str,
    ) -> std::result::Result<Vec<PiiSpan>, DetectError>;
}

/// The lemmatization capability.
///
/// `normalize` maps a single word to its canonical (dictionary) form, e.g.
/// "Ивановым" → "иванов". The masker applies it word-by-word to detected
/// spans; the resulting lemma — not the raw text — is what knowledge tools
/// use as a lookup key.
pub trait Lemmatizer: Send + Sync {
    fn normalize(&self, word: &str) -> String;
}

/// A lemmatizer that returns every word unchanged.
///
/// Useful for languages without inflection handling and as a test fixture.
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn normalize(&self, word: &str) -> String {
        word.to_string()
    }
}
