//! Rule-driven regex detector.
//!
//! Each rule compiles to a regex producing spans of one kind. If a pattern
//! contains a capture group, group 1 is the span (so a rule can anchor on
//! context like a preposition without masking it); otherwise the whole match
//! is. Overlaps between rules are resolved deterministically before
//! returning: earliest start wins, longest match breaks ties.

use async_trait::async_trait;
use cloakroom_core::detect::{DetectionRule, Detector};
use cloakroom_core::error::DetectError;
use cloakroom_core::kind::PiiKind;
use cloakroom_core::span::PiiSpan;
use regex::Regex;
use tracing::debug;

#[derive(Debug)]
pub struct RegexDetector {
    rules: Vec<(String, Regex, PiiKind)>,
}

impl RegexDetector {
    /// Compile a rule set. Fails on the first invalid pattern.
    pub fn new(rules: &[DetectionRule]) -> Result<Self, DetectError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|e| DetectError::InvalidRule {
                    name: rule.name.clone(),
                    reason: e.to_string(),
                })?;
                Ok((rule.name.clone(), regex, rule.kind))
            })
            .collect::<Result<Vec<_>, DetectError>>()?;
        Ok(Self { rules: compiled })
    }
}

#[async_trait]
impl Detector for RegexDetector {
    fn name(&self) -> &str {
        "regex"
    }

    async fn analyze(
        &self,
        text: &str,
        kinds: &[PiiKind],
        _language: &str,
    ) -> Result<Vec<PiiSpan>, DetectError> {
        let mut matches: Vec<PiiSpan> = Vec::new();

        for (rule_name, regex, kind) in &self.rules {
            if !kinds.contains(kind) {
                continue;
            }
            for caps in regex.captures_iter(text) {
                // Group 1 if the rule declares one, else the whole match.
                let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                if m.as_str().is_empty() {
                    continue;
                }
                let start = text[..m.start()].chars().count();
                let end = start + m.as_str().chars().count();
                debug!(rule = %rule_name, start, end, "Rule matched");
                matches.push(PiiSpan::new(start, end, *kind));
            }
        }

        // Earliest start wins; longest match breaks ties. Later overlapping
        // matches are discarded so the returned set is sorted and disjoint.
        matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut spans: Vec<PiiSpan> = Vec::with_capacity(matches.len());
        for m in matches {
            match spans.last() {
                Some(last) if m.start < last.end => continue,
                _ => spans.push(m),
            }
        }
        Ok(spans)
    }
}

/// The built-in rule set: email addresses, multi-word capitalized Cyrillic
/// names, and capitalized words following a locative preposition. Heuristic
/// by design — a production deployment plugs in an NLP detector instead.
pub fn default_detection_rules() -> Vec<DetectionRule> {
    vec![
        DetectionRule {
            name: "email".into(),
            pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b".into(),
            kind: PiiKind::Email,
        },
        DetectionRule {
            name: "full_name".into(),
            pattern: r"\b[А-ЯЁ][а-яё]+(?:\s+[А-ЯЁ][а-яё]+)+\b".into(),
            kind: PiiKind::Person,
        },
        DetectionRule {
            name: "location_after_preposition".into(),
            pattern: r"\b(?:в|во|из|на|под|до)\s+([А-ЯЁ][а-яё]+)\b".into(),
            kind: PiiKind::Location,
        },
    ]
}
