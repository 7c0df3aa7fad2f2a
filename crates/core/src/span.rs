//! PII span — a labeled region of input text.
//!
//! Offsets are **character** (code-point) offsets over the original text,
//! the unit external NLP detectors report. The masker converts them to byte
//! offsets internally when slicing UTF-8 text.

use crate::kind::PiiKind;
use serde::{Deserialize, Serialize};

/// A contiguous region of input text identified as PII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiSpan {
    /// Start character offset, inclusive.
    pub start: usize,

    /// End character offset, exclusive.
    pub end: usize,

    /// What kind of PII this span contains.
    pub kind: PiiKind,
}

impl PiiSpan {
    pub fn new(start: usize, end: usize, kind: PiiKind) -> Self {
        Self { start, end, kind }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether this span shares any character with `other`.
    pub fn overlaps(&self, other: &PiiSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for PiiSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}..{}", self.kind, self.start, self.end)
    }
}
