//! The compendium — the session-scoped store mapping tokens back to their
//! original values.
//!
//! Entries are kept in insertion (detection) order. Order carries no
//! semantic meaning for reconstruction correctness — tokens are mutually
//! exclusive substrings by construction — but it keeps exports readable for
//! debugging.

use crate::token::Token;
use cloakroom_core::error::CompendiumError;
use cloakroom_core::kind::PiiKind;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// An immutable substitution record: one per detected span or tool re-wrap.
#[derive(Debug, Clone, Serialize)]
pub struct Substitution {
    /// The original PII value, reserved solely for final reconstruction.
    pub text: String,

    /// The normalized (dictionary) form — the key tools use for fact lookups.
    pub lemma: String,

    /// What kind of PII this is.
    pub kind: PiiKind,

    /// The opaque placeholder standing in for the value.
    pub token: Token,
}

impl Substitution {
    /// Construct a record, verifying the token's embedded kind against
    /// `kind`. A mismatch is a construction-time error — there is no path to
    /// a record whose token disagrees with its kind field.
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        kind: PiiKind,
        token: Token,
    ) -> Result<Self, CompendiumError> {
        if token.kind() != kind {
            return Err(CompendiumError::KindMismatch {
                token: token.as_str().to_string(),
                expected: kind,
                actual: token.kind(),
            });
        }
        Ok(Self {
            text: text.into(),
            lemma: lemma.into(),
            kind,
            token,
        })
    }

    /// Construct a record taking the kind from the token itself. Infallible;
    /// this is the constructor the masker and tools use after minting.
    pub fn from_token(text: impl Into<String>, lemma: impl Into<String>, token: Token) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            kind: token.kind(),
            token,
        }
    }
}

/// Token → substitution mapping for one session.
///
/// Grows monotonically during masking, is cleared explicitly to start a new
/// session, and is never persisted. Callers guarantee token uniqueness via
/// the minting scheme; `add` silently overwrites on a reused token.
#[derive(Debug, Default)]
pub struct Compendium {
    entries: Vec<Substitution>,
    index: HashMap<String, usize>,
}

impl Compendium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry keyed by the substitution's token.
    pub fn add(&mut self, substitution: Substitution) {
        let key = substitution.token.as_str().to_string();
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = substitution,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(substitution);
            }
        }
    }

    /// Pure lookup. Absent tokens are an expected, recoverable case — this
    /// never errors.
    pub fn get(&self, token: &str) -> Option<&Substitution> {
        self.index.get(token).map(|&i| &self.entries[i])
    }

    /// Replace every occurrence of every known token in `text` with the
    /// corresponding original value, iterating entries in insertion order.
    ///
    /// Idempotent on text containing no known tokens; substrings that look
    /// like tokens but have no entry pass through untouched.
    pub fn reconstruct(&self, text: &str) -> String {
        let mut out = text.to_string();
        for sub in &self.entries {
            if out.contains(sub.token.as_str()) {
                out = out.replace(sub.token.as_str(), &sub.text);
            }
        }
        out
    }

    /// Empty the mapping. Prior tokens become permanently unresolvable.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the mapping for inspection: token → `{text, lemma, kind}`.
    pub fn export(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for sub in &self.entries {
            map.insert(
                sub.token.as_str().to_string(),
                serde_json::json!({
                    "text": sub.text,
                    "lemma": sub.lemma,
                    "kind": sub.kind,
                }),
            );
        }
        serde_json::Value::Object(map)
    }

    /// Hierarchical export for UI display: one node per token with `text`,
    /// `lemma`, and `kind` child nodes.
    pub fn export_tree(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, sub)| {
                serde_json::json!({
                    "id": sub.token.as_str(),
                    "label": sub.token.as_str(),
                    "children": [
                        { "id": format!("text{i}"), "label": "text",
                          "children": [{ "id": format!("text_c{i}"), "label": sub.text }] },
                        { "id": format!("lemma{i}"), "label": "lemma",
                          "children": [{ "id": format!("lemma_c{i}"), "label": sub.lemma }] },
                        { "id": format!("kind{i}"), "label": "kind",
                          "children": [{ "id": format!("kind_c{i}"), "label": sub.kind.as_str() }] },
                    ],
                })
            })
            .collect();
        serde_json::Value::Array(nodes)
    }
}

/// The session-scoped compendium handle shared by the masker and every tool.
///
/// One instance per conversation. Sharing a single compendium across
/// concurrent unrelated conversations corrupts reconstruction — tokens from
/// one conversation could be reconstructed into another's answer — so a
/// concurrent deployment must construct one handle per session.
#[derive(Debug, Clone, Default)]
pub struct SharedCompendium {
    inner: Arc<Mutex<Compendium>>,
}

impl SharedCompendium {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, substitution: Substitution) {
        self.inner.lock().await.add(substitution);
    }

    /// Cloned lookup; `None` for unknown tokens.
    pub async fn get(&self, token: &str) -> Option<Substitution> {
        self.inner.lock().await.get(token).cloned()
    }

    pub async fn reconstruct(&self, text: &str) -> String {
        self.inner.lock().await.reconstruct(text)
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn export(&self) -> serde_json::Value {
        self.inner.lock().await.export()
    }

    pub async fn export_tree(&self) -> serde_json::Value {
        self.inner.lock().await.export_tree()
    }
}
