use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Token -> index mapping as sent by the server.
///
/// Entries are kept in document order so that inversion is deterministic
/// when the server sends the same index twice: the later entry wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    entries: Vec<(String, usize)>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `token -> index` entry.
    pub fn insert(&mut self, token: impl Into<String>, index: usize) {
        self.entries.push((token.into(), index));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the vocabulary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of `token`, taking the last entry if the token repeats.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.entries
            .iter()
            .rev()
            .find(|(t, _)| t == token)
            .map(|(_, i)| *i)
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, i)| (t.as_str(), *i))
    }

    /// Build the index -> token mapping used for display.
    ///
    /// Duplicate indices resolve to the last-seen token.
    pub fn invert(&self) -> InvertedVocab {
        let mut tokens = HashMap::with_capacity(self.entries.len());
        for (token, index) in &self.entries {
            tokens.insert(*index, token.clone());
        }
        InvertedVocab { tokens }
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(t, i)| (t.into(), i)).collect(),
        }
    }
}

impl Serialize for Vocabulary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (token, index) in &self.entries {
            map.serialize_entry(token, index)?;
        }
        map.end()
    }
}

struct VocabularyVisitor;

impl<'de> Visitor<'de> for VocabularyVisitor {
    type Value = Vocabulary;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of token strings to non-negative integer indices")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Vocabulary, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((token, index)) = access.next_entry::<String, usize>()? {
            entries.push((token, index));
        }
        Ok(Vocabulary { entries })
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(VocabularyVisitor)
    }
}

/// Index -> token mapping derived from a `Vocabulary`. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvertedVocab {
    tokens: HashMap<usize, String>,
}

impl InvertedVocab {
    /// Token text for `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(&index).map(String::as_str)
    }

    /// Token text for `index`; unknown indices resolve to an empty string.
    pub fn token(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }

    /// Number of distinct indices.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no index is mapped.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Invert back into a token -> index mapping, ordered by index.
    pub fn to_vocabulary(&self) -> Vocabulary {
        let mut entries: Vec<(&usize, &String)> = self.tokens.iter().collect();
        entries.sort_by_key(|(index, _)| **index);
        entries
            .into_iter()
            .map(|(index, token)| (token.clone(), *index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn invert_small_vocab() {
        let vocab: Vocabulary = [("a", 0), ("b", 1), ("<|bos|>", 2)].into_iter().collect();
        let inverted = vocab.invert();
        assert_eq!(inverted.len(), 3);
        assert_eq!(inverted.token(0), "a");
        assert_eq!(inverted.token(1), "b");
        assert_eq!(inverted.token(2), "<|bos|>");
    }

    #[test]
    fn unknown_index_resolves_to_empty() {
        let vocab: Vocabulary = [("a", 0)].into_iter().collect();
        assert_eq!(vocab.invert().token(41), "");
        assert_eq!(vocab.invert().get(41), None);
    }

    #[test]
    fn duplicate_index_last_seen_wins() {
        let vocab: Vocabulary = serde_json::from_str(r#"{"x": 3, "y": 3, "z": 1}"#).unwrap();
        let inverted = vocab.invert();
        assert_eq!(inverted.token(3), "y");
        assert_eq!(inverted.len(), 2);
    }

    #[test]
    fn deserialize_keeps_document_order() {
        let vocab: Vocabulary = serde_json::from_str(r#"{"zz": 0, "aa": 1, "mm": 2}"#).unwrap();
        let order: Vec<&str> = vocab.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["zz", "aa", "mm"]);
        assert_eq!(serde_json::to_string(&vocab).unwrap(), r#"{"zz":0,"aa":1,"mm":2}"#);
    }

    #[test]
    fn rejects_negative_index() {
        assert!(serde_json::from_str::<Vocabulary>(r#"{"a": -1}"#).is_err());
    }

    proptest! {
        #[test]
        fn invert_twice_round_trips(tokens in proptest::collection::hash_set("[a-z<>|/]{1,8}", 0..64)) {
            let original: Vocabulary = tokens.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
            let back = original.invert().to_vocabulary();
            let lhs: HashMap<&str, usize> = original.iter().collect();
            let rhs: HashMap<&str, usize> = back.iter().collect();
            prop_assert_eq!(lhs, rhs);
        }
    }
}
