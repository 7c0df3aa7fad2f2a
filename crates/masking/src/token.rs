//! The opaque token format: `⟪PII:<KIND>:<suffix>⟫`.
//!
//! The `⟪`/`⟫` delimiters are non-ASCII and effectively never occur in
//! natural input, which makes tokens recognizable in model output and robust
//! against an LLM paraphrasing, translating, or declining the text around
//! them. The suffix is 8 hex chars drawn from a UUIDv4 — collision
//! probability is negligible at session scale (tens to low hundreds of
//! tokens), and no stronger uniqueness guarantee is needed.
//!
//! This format is wire-visible to the LLM and documented to it via system
//! instructions as "copy verbatim, never translate/decline/alter".

use cloakroom_core::kind::PiiKind;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

/// Opening token delimiter.
pub const OPEN_DELIM: char = '⟪';

/// Closing token delimiter.
pub const CLOSE_DELIM: char = '⟫';

const PREFIX: &str = "PII";

/// A validated PII placeholder token.
///
/// Can only be obtained by minting a fresh one for a kind or by parsing a
/// well-formed wire string, so a `Token` value is always structurally valid
/// and its kind is always known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: PiiKind,
    raw: String,
}

impl Token {
    /// Mint a fresh token for `kind` with a random 8-hex suffix.
    pub fn mint(kind: PiiKind) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        let suffix = &uuid[..8];
        Self {
            kind,
            raw: format!("{OPEN_DELIM}{PREFIX}:{kind}:{suffix}{CLOSE_DELIM}"),
        }
    }

    /// Parse a full wire-form token. Returns `None` unless the whole string
    /// is a single well-formed token.
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix(OPEN_DELIM)?.strip_suffix(CLOSE_DELIM)?;
        let mut parts = body.splitn(3, ':');
        if parts.next()? != PREFIX {
            return None;
        }
        let kind = PiiKind::from_str(parts.next()?).ok()?;
        let suffix = parts.next()?;
        if suffix.is_empty()
            || suffix.contains([OPEN_DELIM, CLOSE_DELIM, ':'])
        {
            return None;
        }
        Some(Self {
            kind,
            raw: s.to_string(),
        })
    }

    /// The kind embedded in this token.
    pub fn kind(&self) -> PiiKind {
        self.kind
    }

    /// The full wire form, e.g. `⟪PII:PERSON:a1b2c3d4⟫`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Token::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("malformed token: {s}")))
    }
}

/// Regex matching any well-formed token embedded in text.
pub fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            "{OPEN_DELIM}{PREFIX}:(?:PERSON|EMAIL|NUMBER|RELATIONSHIP|LOCATION):[^{OPEN_DELIM}{CLOSE_DELIM}:]+{CLOSE_DELIM}"
        ))
        .expect("token pattern is a valid regex")
    })
}

/// All well-formed tokens appearing in `text`, in order of appearance.
pub fn find_tokens(text: &str) -> Vec<&str> {
    token_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Whether `text` contains at least one well-formed token.
pub fn contains_token(text: &str) -> bool {
    token_pattern().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_produces_wire_form() {
        let token = Token::mint(PiiKind::Person);
        assert!(token.as_str().starts_with("⟪PII:PERSON:"));
        assert!(token.as_str().ends_with('⟫'));
        assert_eq!(token.kind(), PiiKind::Person);
        // 8-hex suffix
        let suffix = token
            .as_str()
            .trim_start_matches("⟪PII:PERSON:")
            .trim_end_matches('⟫');
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn minted_tokens_are_distinct() {
        let a = Token::mint(PiiKind::Email);
        let b = Token::mint(PiiKind::Email);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_roundtrip() {
        let minted = Token::mint(PiiKind::Location);
        let parsed = Token::parse(minted.as_str()).unwrap();
        assert_eq!(parsed, minted);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(Token::parse("⟪PII:PERSON:⟫").is_none()); // empty suffix
        assert!(Token::parse("⟪PII:PHONE:a1b2c3d4⟫").is_none()); // unknown kind
        assert!(Token::parse("⟪SECRET:PERSON:a1b2c3d4⟫").is_none()); // wrong prefix
        assert!(Token::parse("PII:PERSON:a1b2c3d4").is_none()); // no delimiters
        assert!(Token::parse("⟪PII:PERSON:a1:b2⟫").is_none()); // colon in suffix
        assert!(Token::parse("x⟪PII:PERSON:a1b2c3d4⟫").is_none()); // leading junk
    }

    #[test]
    fn find_tokens_in_text() {
        let a = Token::mint(PiiKind::Person);
        let b = Token::mint(PiiKind::Location);
        let text = format!("{a} живёт в {b}");
        let found = find_tokens(&text);
        assert_eq!(found, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn contains_token_negative() {
        assert!(!contains_token("Иван Петров живёт в Москве"));
        assert!(!contains_token("angle ⟪ brackets ⟫ alone"));
    }

    #[test]
    fn serde_as_wire_string() {
        let token = Token::mint(PiiKind::Number);
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
        assert!(serde_json::from_str::<Token>("\"not a token\"").is_err());
    }
}
