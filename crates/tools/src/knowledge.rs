//! Knowledge base stub — lemma-keyed facts about known entities.
//!
//! Keys are the lemma forms the masker records, so tools can resolve a
//! token straight to facts without ever touching the surface text. The demo
//! data makes the agent loop testable end-to-end without an external
//! knowledge service; a real deployment would back this with one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Facts about one person, keyed elsewhere by lemma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonFacts {
    /// Year of birth, for age computation.
    pub birth_year: i32,

    /// Relations to other people: (other person's lemma, relation label).
    #[serde(default)]
    pub relations: Vec<(String, String)>,
}

/// Lemma-keyed fact store.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    people: HashMap<String, PersonFacts>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo data set used by tests and the CLI demo.
    pub fn with_demo_data() -> Self {
        let mut kb = Self::new();
        kb.add_person(
            "аркадий стругацкий",
            PersonFacts {
                birth_year: 1925,
                relations: vec![("борис стругацкий".into(), "старший брат".into())],
            },
        );
        kb.add_person(
            "борис стругацкий",
            PersonFacts {
                birth_year: 1933,
                relations: vec![("аркадий стругацкий".into(), "младший брат".into())],
            },
        );
        kb.add_person(
            "пётр емельянов",
            PersonFacts {
                birth_year: 1978,
                relations: vec![],
            },
        );
        kb.add_person(
            "александр митрофанов",
            PersonFacts {
                birth_year: 1985,
                relations: vec![],
            },
        );
        kb.add_person(
            "иван петров",
            PersonFacts {
                birth_year: 1990,
                relations: vec![],
            },
        );
        kb
    }

    /// Insert or replace facts for a lemma.
    pub fn add_person(&mut self, lemma: impl Into<String>, facts: PersonFacts) {
        self.people.insert(lemma.into(), facts);
    }

    /// Birth year by lemma, if known.
    pub fn birth_year(&self, lemma: &str) -> Option<i32> {
        self.people.get(lemma).map(|p| p.birth_year)
    }

    /// The relation of `a` to `b` (as stored on `a`'s entry), if known.
    pub fn relation(&self, a: &str, b: &str) -> Option<&str> {
        self.people.get(a)?.relations.iter().find_map(|(other, rel)| {
            (other == b).then_some(rel.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_year_lookup() {
        let kb = KnowledgeBase::with_demo_data();
        assert_eq!(kb.birth_year("аркадий стругацкий"), Some(1925));
        assert_eq!(kb.birth_year("неизвестный человек"), None);
    }

    #[test]
    fn relation_lookup_is_directional() {
        let kb = KnowledgeBase::with_demo_data();
        assert_eq!(
            kb.relation("аркадий стругацкий", "борис стругацкий"),
            Some("старший брат")
        );
        assert_eq!(
            kb.relation("борис стругацкий", "аркадий стругацкий"),
            Some("младший брат")
        );
        assert_eq!(kb.relation("иван петров", "борис стругацкий"), None);
    }

    #[test]
    fn add_person_replaces_entry() {
        let mut kb = KnowledgeBase::new();
        kb.add_person("иван петров", PersonFacts { birth_year: 1990, relations: vec![] });
        kb.add_person("иван петров", PersonFacts { birth_year: 1991, relations: vec![] });
        assert_eq!(kb.birth_year("иван петров"), Some(1991));
    }
}
