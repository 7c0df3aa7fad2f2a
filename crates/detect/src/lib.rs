//! # Cloakroom Detect
//!
//! Detector and lemmatizer implementations behind the core capability
//! traits. The shipped detector is a regex rule set — deliberately simple,
//! since detection *quality* is a pluggable concern — plus a scripted
//! detector for tests and demos. The lemmatizer is a dictionary-override
//! table with a suffix-stripping fallback for Russian nominal inflection.

pub mod lemmatize;
pub mod regex_detector;
pub mod scripted;

pub use lemmatize::SuffixLemmatizer;
pub use regex_detector::{default_detection_rules, RegexDetector};
pub use scripted::ScriptedDetector;
