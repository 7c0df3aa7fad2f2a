//! The masker — orchestrates detection, token minting, and span replacement.
//!
//! `mask` walks the original text once, left to right, emitting unconsumed
//! text verbatim and a freshly minted token in place of each detected span.
//! Every token is recorded in the shared compendium before the masked text
//! is returned, so a token can never reach the model unresolvable.
//!
//! Log span offsets and counts only, never the matched text.

use crate::compendium::{SharedCompendium, Substitution};
use crate::token::Token;
use cloakroom_core::detect::{Detector, Lemmatizer};
use cloakroom_core::error::MaskError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::span::PiiSpan;
use std::sync::Arc;
use tracing::{debug, info};

/// Masking/unmasking engine for one session.
pub struct Masker {
    detector: Arc<dyn Detector>,
    lemmatizer: Arc<dyn Lemmatizer>,
    compendium: SharedCompendium,
    kinds: Vec<PiiKind>,
    language: String,
}

impl Masker {
    /// Create a masker over a session's shared compendium.
    ///
    /// Defaults to the detectable kinds (person, email, location) and
    /// Russian. Both are configurable.
    pub fn new(
        detector: Arc<dyn Detector>,
        lemmatizer: Arc<dyn Lemmatizer>,
        compendium: SharedCompendium,
    ) -> Self {
        Self {
            detector,
            lemmatizer,
            compendium,
            kinds: PiiKind::DETECTABLE.to_vec(),
            language: "ru".into(),
        }
    }

    /// Override the kinds requested from the detector.
    pub fn with_kinds(mut self, kinds: Vec<PiiKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Override the detection language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The session's compendium handle, for tools and observability.
    pub fn compendium(&self) -> &SharedCompendium {
        &self.compendium
    }

    /// Replace every detected PII span in `text` with a fresh token.
    ///
    /// Detection failure aborts the call — no partially-masked text is
    /// produced. Each span also records a substitution (original substring,
    /// its lemma, kind, token) into the shared compendium as a side effect.
    /// The output length generally differs from the input's.
    pub async fn mask(&self, text: &str) -> Result<String, MaskError> {
        let spans = self
            .detector
            .analyze(text, &self.kinds, &self.language)
            .await?;

        // Byte offset of every char, plus the end sentinel, so char-offset
        // spans from the detector can slice the UTF-8 text directly.
        let byte_offsets: Vec<usize> = text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = byte_offsets.len() - 1;

        validate_spans(&spans, char_count)?;

        debug!(
            spans = spans.len(),
            chars = char_count,
            detector = self.detector.name(),
            "Detection complete"
        );

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0usize; // char offset of the first unconsumed char
        for span in &spans {
            out.push_str(&text[byte_offsets[cursor]..byte_offsets[span.start]]);

            let original = &text[byte_offsets[span.start]..byte_offsets[span.end]];
            let token = Token::mint(span.kind);
            let lemma = self.lemmatize(original);
            self.compendium
                .add(Substitution::from_token(original, lemma, token.clone()))
                .await;

            out.push_str(token.as_str());
            cursor = span.end;
        }
        out.push_str(&text[byte_offsets[cursor]..]);

        info!(
            substituted = spans.len(),
            masked_len = out.len(),
            "Masked input text"
        );
        Ok(out)
    }

    /// Substitute every known token in `text` back to its original value.
    ///
    /// Never fails: token-shaped substrings with no compendium entry are
    /// left untouched, so a partially-reconstructable answer degrades
    /// gracefully instead of crashing the turn.
    pub async fn unmask(&self, text: &str) -> String {
        let out = self.compendium.reconstruct(text).await;
        debug!(input_len = text.len(), output_len = out.len(), "Unmasked text");
        out
    }

    /// Per-word normalization, space-joined; word order is preserved so
    /// multi-word entities (full names) keep their shape.
    fn lemmatize(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|w| self.lemmatizer.normalize(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reject malformed detector output: out-of-bounds, empty, unsorted, or
/// overlapping spans. Overlap is never resolved silently — nothing may be
/// dropped or duplicated.
fn validate_spans(spans: &[PiiSpan], char_count: usize) -> Result<(), MaskError> {
    for span in spans {
        if span.is_empty() {
            return Err(MaskError::InvalidSpan {
                span: *span,
                reason: "empty span".into(),
            });
        }
        if span.end > char_count {
            return Err(MaskError::InvalidSpan {
                span: *span,
                reason: format!("end exceeds text length of {char_count} chars"),
            });
        }
    }
    for pair in spans.windows(2) {
        if pair[1].start < pair[0].start {
            return Err(MaskError::InvalidSpan {
                span: pair[1],
                reason: "spans not sorted by start offset".into(),
            });
        }
        if pair[0].overlaps(&pair[1]) {
            return Err(MaskError::OverlappingSpans {
                first: pair[0],
                second: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{contains_token, find_tokens};
    use cloakroom_core::detect::IdentityLemmatizer;
    use cloakroom_core::error::DetectError;
    use regex::Regex;

    /// Detector returning a fixed span set, in the order given.
    struct FixedDetector {
        spans: Vec<PiiSpan>,
    }

    #[async_trait::async_trait]
    impl Detector for FixedDetector {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn analyze(
            &self,
            _text: &str,
            _kinds: &[PiiKind],
            _language: &str,
        ) -> Result<Vec<PiiSpan>, DetectError> {
            Ok(self.spans.clone())
        }
    }

    /// Detector that always fails.
    struct DownDetector;

    #[async_trait::async_trait]
    impl Detector for DownDetector {
        fn name(&self) -> &str {
            "down"
        }

        async fn analyze(
            &self,
            _text: &str,
            _kinds: &[PiiKind],
            _language: &str,
        ) -> Result<Vec<PiiSpan>, DetectError> {
            Err(DetectError::Unavailable("engine offline".into()))
        }
    }

    fn masker_with(spans: Vec<PiiSpan>) -> Masker {
        Masker::new(
            Arc::new(FixedDetector { spans }),
            Arc::new(IdentityLemmatizer),
            SharedCompendium::new(),
        )
    }

    #[tokio::test]
    async fn concrete_scenario() {
        // "Иван Петров" covers chars 0..11, "Москве" chars 20..26.
        let text = "Иван Петров живёт в Москве";
        let masker = masker_with(vec![
            PiiSpan::new(0, 11, PiiKind::Person),
            PiiSpan::new(20, 26, PiiKind::Location),
        ]);

        let masked = masker.mask(text).await.unwrap();

        let shape =
            Regex::new(r"^⟪PII:PERSON:[0-9a-f]{8}⟫ живёт в ⟪PII:LOCATION:[0-9a-f]{8}⟫$").unwrap();
        assert!(shape.is_match(&masked), "unexpected masked form: {masked}");

        let export = masker.compendium().export().await;
        let texts: Vec<&str> = export
            .as_object()
            .unwrap()
            .values()
            .map(|v| v["text"].as_str().unwrap())
            .collect();
        assert_eq!(masker.compendium().len().await, 2);
        assert!(texts.contains(&"Иван Петров"));
        assert!(texts.contains(&"Москве"));

        assert_eq!(masker.unmask(&masked).await, text);
    }

    #[tokio::test]
    async fn round_trip_restores_original() {
        let text = "Пишите на ivan@example.com или навестите Бориса";
        // "ivan@example.com" chars 10..26, "Бориса" chars 41..47
        let masker = masker_with(vec![
            PiiSpan::new(10, 26, PiiKind::Email),
            PiiSpan::new(41, 47, PiiKind::Person),
        ]);

        let masked = masker.mask(text).await.unwrap();
        assert_ne!(masked, text);
        assert_eq!(masker.unmask(&masked).await, text);
    }

    #[tokio::test]
    async fn no_spans_is_identity() {
        let text = "ничего личного здесь нет";
        let masker = masker_with(vec![]);
        let masked = masker.mask(text).await.unwrap();
        assert_eq!(masked, text);
        assert!(masker.compendium().is_empty().await);
    }

    #[tokio::test]
    async fn tokens_are_unique_per_span() {
        let text = "Иван и Иван";
        // Two separate spans over the two occurrences: chars 0..4 and 7..11.
        let masker = masker_with(vec![
            PiiSpan::new(0, 4, PiiKind::Person),
            PiiSpan::new(7, 11, PiiKind::Person),
        ]);

        let masked = masker.mask(text).await.unwrap();
        let tokens = find_tokens(&masked);
        assert_eq!(tokens.len(), 2);
        assert_ne!(tokens[0], tokens[1]);
        assert_eq!(masker.compendium().len().await, 2);
    }

    #[tokio::test]
    async fn no_token_is_substring_of_output_segments() {
        let text = "Иван Петров живёт в Москве";
        let masker = masker_with(vec![
            PiiSpan::new(0, 11, PiiKind::Person),
            PiiSpan::new(20, 26, PiiKind::Location),
        ]);
        let masked = masker.mask(text).await.unwrap();

        let tokens = find_tokens(&masked);
        for (i, a) in tokens.iter().enumerate() {
            for (j, b) in tokens.iter().enumerate() {
                if i != j {
                    assert!(!a.contains(b));
                }
            }
        }
        // Stripping all tokens leaves no token-like remnants.
        let mut remainder = masked.clone();
        for t in &tokens {
            remainder = remainder.replace(t, "");
        }
        assert!(!contains_token(&remainder));
    }

    #[tokio::test]
    async fn span_at_text_boundaries() {
        let text = "Москва — столица";
        // "Москва" chars 0..6, "столица" chars 9..16: spans at both edges.
        let masker = masker_with(vec![
            PiiSpan::new(0, 6, PiiKind::Location),
            PiiSpan::new(9, 16, PiiKind::Location),
        ]);
        let masked = masker.mask(text).await.unwrap();
        assert!(masked.starts_with("⟪PII:LOCATION:"));
        assert!(masked.ends_with('⟫'));
        assert_eq!(masker.unmask(&masked).await, text);
    }

    #[tokio::test]
    async fn detection_failure_propagates() {
        let masker = Masker::new(
            Arc::new(DownDetector),
            Arc::new(IdentityLemmatizer),
            SharedCompendium::new(),
        );
        let err = masker.mask("Иван Петров").await.unwrap_err();
        assert!(matches!(err, MaskError::Detection(_)));
        // No partial state left behind.
        assert!(masker.compendium().is_empty().await);
    }

    #[tokio::test]
    async fn overlapping_spans_rejected() {
        let masker = masker_with(vec![
            PiiSpan::new(0, 11, PiiKind::Person),
            PiiSpan::new(5, 14, PiiKind::Location),
        ]);
        let err = masker.mask("Иван Петров живёт").await.unwrap_err();
        assert!(matches!(err, MaskError::OverlappingSpans { .. }));
    }

    #[tokio::test]
    async fn unsorted_spans_rejected() {
        let masker = masker_with(vec![
            PiiSpan::new(20, 26, PiiKind::Location),
            PiiSpan::new(0, 11, PiiKind::Person),
        ]);
        let err = masker.mask("Иван Петров живёт в Москве").await.unwrap_err();
        assert!(matches!(err, MaskError::InvalidSpan { .. }));
    }

    #[tokio::test]
    async fn out_of_bounds_span_rejected() {
        let masker = masker_with(vec![PiiSpan::new(22, 28, PiiKind::Location)]);
        let err = masker.mask("короткий текст").await.unwrap_err();
        assert!(matches!(err, MaskError::InvalidSpan { .. }));
    }

    #[tokio::test]
    async fn lemma_is_word_by_word_in_order() {
        /// Lowercases and strips an instrumental-case ending — just enough
        /// shape to observe per-word application and order preservation.
        struct TestLemmatizer;
        impl Lemmatizer for TestLemmatizer {
            fn normalize(&self, word: &str) -> String {
                let lower = word.to_lowercase();
                lower
                    .strip_suffix("им")
                    .or_else(|| lower.strip_suffix("ем"))
                    .map(|s| s.to_string())
                    .unwrap_or(lower)
            }
        }

        let text = "Аркадием Стругацким";
        let masker = Masker::new(
            Arc::new(FixedDetector {
                spans: vec![PiiSpan::new(0, 19, PiiKind::Person)],
            }),
            Arc::new(TestLemmatizer),
            SharedCompendium::new(),
        );

        let masked = masker.mask(text).await.unwrap();
        let token = find_tokens(&masked)[0].to_string();
        let sub = masker.compendium().get(&token).await.unwrap();
        assert_eq!(sub.lemma, "аркади стругацк");
        assert_eq!(sub.text, "Аркадием Стругацким");
    }
}
