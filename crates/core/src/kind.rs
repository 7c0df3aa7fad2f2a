//! The closed set of PII kinds the engine recognizes.
//!
//! `Person`, `Email`, and `Location` are produced by detection over input
//! text. `Number` and `Relationship` are produced by tools that re-wrap
//! sensitive lookup results into fresh tokens.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Kind label attached to every detected span, token, and substitution.
///
/// This is a closed enumeration used consistently across the engine — kinds
/// are never compared as raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiKind {
    Person,
    Email,
    Number,
    Relationship,
    Location,
}

impl PiiKind {
    /// All kinds, in declaration order.
    pub const ALL: [PiiKind; 5] = [
        PiiKind::Person,
        PiiKind::Email,
        PiiKind::Number,
        PiiKind::Relationship,
        PiiKind::Location,
    ];

    /// The kinds produced by text detection (as opposed to tool re-wrapping).
    pub const DETECTABLE: [PiiKind; 3] = [PiiKind::Person, PiiKind::Email, PiiKind::Location];

    /// The wire form, as embedded in token text (e.g. `PERSON`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiKind::Person => "PERSON",
            PiiKind::Email => "EMAIL",
            PiiKind::Number => "NUMBER",
            PiiKind::Relationship => "RELATIONSHIP",
            PiiKind::Location => "LOCATION",
        }
    }
}

impl std::fmt::Display for PiiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized kind label.
#[derive(Debug, Clone, Error)]
#[error("unknown PII kind: {0}")]
pub struct UnknownKindError(pub String);

impl FromStr for PiiKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PERSON" => Ok(PiiKind::Person),
            "EMAIL" => Ok(PiiKind::Email),
            "NUMBER" => Ok(PiiKind::Number),
            "RELATIONSHIP" => Ok(PiiKind::Relationship),
            "LOCATION" => Ok(PiiKind::Location),
            other => Err(UnknownKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(PiiKind::Person.to_string(), "PERSON");
        assert_eq!(PiiKind::Relationship.to_string(), "RELATIONSHIP");
    }

    #[test]
    fn parse_roundtrip_all_kinds() {
        for kind in PiiKind::ALL {
            assert_eq!(kind.as_str().parse::<PiiKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown_label() {
        assert!("PHONE".parse::<PiiKind>().is_err());
        // Case-sensitive on purpose: the wire form is SCREAMING case.
        assert!("person".parse::<PiiKind>().is_err());
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&PiiKind::Location).unwrap();
        assert_eq!(json, "\"LOCATION\"");
        let kind: PiiKind = serde_json::from_str("\"EMAIL\"").unwrap();
        assert_eq!(kind, PiiKind::Email);
    }
}
