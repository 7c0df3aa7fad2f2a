//! # Cloakroom Masking
//!
//! The masking/unmasking engine: detected PII spans are replaced with opaque
//! reversible tokens before text reaches a model, and the final answer is
//! reconstructed by substituting tokens back to their original values.
//!
//! The moving parts:
//! - [`Token`] — the `⟪PII:<KIND>:<suffix>⟫` placeholder format
//! - [`Substitution`] — one immutable record per masked span
//! - [`Compendium`] / [`SharedCompendium`] — the session-scoped token store
//! - [`Masker`] — detection orchestration, span replacement, reconstruction
//!
//! Everything is session-scoped and passed explicitly; there is no global
//! state anywhere in the engine.

pub mod compendium;
pub mod masker;
pub mod token;

pub use compendium::{Compendium, SharedCompendium, Substitution};
pub use masker::Masker;
pub use token::{contains_token, find_tokens, token_pattern, Token, CLOSE_DELIM, OPEN_DELIM};
