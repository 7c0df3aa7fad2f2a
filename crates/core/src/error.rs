//! Error types for the Cloakroom domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use crate::kind::PiiKind;
use crate::span::PiiSpan;
use thiserror::Error;

/// The top-level error type for all Cloakroom operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Masking errors ---
    #[error("Masking error: {0}")]
    Mask(#[from] MaskError),

    // --- Compendium errors ---
    #[error("Compendium error: {0}")]
    Compendium(#[from] CompendiumError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DetectError> for Error {
    fn from(e: DetectError) -> Self {
        Error::Mask(MaskError::Detection(e))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors from a detector capability.
#[derive(Debug, Clone, Error)]
pub enum DetectError {
    #[error("Detector unavailable: {0}")]
    Unavailable(String),

    #[error("Detector backend failed: {0}")]
    Backend(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid detection rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },
}

/// Errors from the masking engine.
///
/// A detection failure aborts masking entirely — no partially-masked text is
/// ever produced, so raw PII cannot slip through to the model. Malformed span
/// sets from a detector are rejected rather than resolved silently.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Detection failed: {0}")]
    Detection(#[from] DetectError),

    #[error("Detector returned overlapping spans: {first} and {second}")]
    OverlappingSpans { first: PiiSpan, second: PiiSpan },

    #[error("Detector returned invalid span {span}: {reason}")]
    InvalidSpan { span: PiiSpan, reason: String },
}

/// Errors from compendium record construction.
///
/// Lookups never error — `Compendium::get` returns `Option` and
/// `reconstruct` passes unknown tokens through untouched.
#[derive(Debug, Error)]
pub enum CompendiumError {
    #[error("Token {token} carries kind {actual}, expected {expected}")]
    KindMismatch {
        token: String,
        expected: PiiKind,
        actual: PiiKind,
    },
}

/// Errors from tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Errors from an LLM provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request failed: {0}")]
    RequestFailed(String),
}
