//! Suffix-stripping lemmatizer with a dictionary override table.
//!
//! Maps an inflected Russian word to a canonical lowercase form usable as a
//! stable lookup key: "Ивановым" → "иванов", "Москве" → "москва" (via the
//! override table). The point is key *consistency* across case forms, not
//! linguistic correctness — full morphology is a pluggable capability, and
//! this implementation is the built-in stand-in.
//!
//! Resolution order: exact override entry, then longest matching case
//! ending (if the remaining stem keeps at least three characters), then the
//! lowercased word unchanged.

use cloakroom_core::detect::Lemmatizer;
use std::collections::HashMap;

/// Case endings stripped by the fallback, longest first. Nominative endings
/// of common surname shapes ("ов", "ев", "ин") are deliberately absent so
/// base forms survive unchanged.
const CASE_ENDINGS: &[&str] = &[
    "иями", "иях", "ами", "ями", "ому", "ему", "ого", "его", "ах", "ях", "ой", "ей", "ою", "ею",
    "ом", "ем", "ым", "им", "ых", "их", "ую", "юю", "ая", "яя", "у", "ю", "а", "я", "е", "и", "ы",
];

const MIN_STEM_CHARS: usize = 3;

pub struct SuffixLemmatizer {
    overrides: HashMap<String, String>,
}

impl SuffixLemmatizer {
    /// Built-in override table: paradigms the suffix fallback cannot keep
    /// consistent — first names whose oblique forms shed a stem vowel, and
    /// adjectival surnames.
    pub fn new() -> Self {
        let mut overrides = HashMap::new();
        for (forms, lemma) in [
            (&["аркадия", "аркадию", "аркадием", "аркадии"][..], "аркадий"),
            (&["петр", "петра", "петру", "петром", "петре"][..], "пётр"),
            (&["стругацкого", "стругацкому", "стругацким", "стругацком"][..], "стругацкий"),
            (&["москве", "москву", "москвой", "москвы"][..], "москва"),
            (&["ленинграде", "ленинграда", "ленинграду", "ленинградом"][..], "ленинград"),
        ] {
            for form in forms {
                overrides.insert((*form).to_string(), lemma.to_string());
            }
        }
        Self { overrides }
    }

    /// Extend the override table; later entries win.
    pub fn with_overrides<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (form, lemma) in entries {
            self.overrides.insert(form.to_lowercase(), lemma.to_lowercase());
        }
        self
    }
}

impl Default for SuffixLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for SuffixLemmatizer {
    fn normalize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.overrides.get(&lower) {
            return lemma.clone();
        }
        for ending in CASE_ENDINGS {
            if let Some(stem) = lower.strip_suffix(ending) {
                if stem.chars().count() >= MIN_STEM_CHARS {
                    return stem.to_string();
                }
                break;
            }
        }
        lower
    }
}
