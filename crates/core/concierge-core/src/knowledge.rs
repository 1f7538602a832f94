//! Hotel knowledge base
//!
//! A read-only record of topic → entry → description. There is exactly one
//! source: the JSON document embedded in this crate, optionally replaced at
//! startup by a file with the same shape. The relay wrapper, the conversation
//! prompt and the local fallback all read the same loaded instance.

use crate::{ConciergeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const EMBEDDED_KNOWLEDGE: &str = include_str!("../data/hotel_knowledge.json");

/// A single fact about the hotel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Display name, when the entry has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Guest-facing description
    pub description: String,
    /// Short bullet points
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

/// Entries of one topic, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct Topic(#[serde(with = "ordered_map")] Vec<(String, KnowledgeEntry)>);

/// Topic → entry key → entry, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    #[serde(with = "ordered_map")]
    topics: Vec<(String, Topic)>,
}

/// JSON objects as key/value lists, keeping the order they were written in
mod ordered_map {
    use serde::de::{Deserialize, Deserializer, Error, MapAccess, Visitor};
    use serde::ser::{Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<S, T>(entries: &[(String, T)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Vec<(String, T)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, T)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(A::Error::custom(format!("duplicate key '{}'", key)));
                    }
                    entries.push((key, value));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

impl KnowledgeBase {
    /// The knowledge base shipped with the crate
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_KNOWLEDGE)
    }

    /// Parse and validate a knowledge document
    pub fn from_json(source: &str) -> Result<Self> {
        let kb: KnowledgeBase = serde_json::from_str(source)?;
        kb.validate()?;
        Ok(kb)
    }

    /// Read a knowledge document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&source)
    }

    /// Load from `path` when given, otherwise use the embedded document
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                tracing::info!("Loading knowledge base from {}", p.display());
                Self::from_path(p)
            }
            None => Self::embedded(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(ConciergeError::validation("knowledge base has no topics"));
        }
        for (topic, key, entry) in self.entries() {
            if entry.description.trim().is_empty() {
                return Err(ConciergeError::missing_field(
                    "description",
                    format!("knowledge entry {}.{}", topic, key),
                ));
            }
        }
        Ok(())
    }

    /// Topic names
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|(name, _)| name.as_str())
    }

    /// Look up one entry, e.g. `get("dining", "dinner")`
    pub fn get(&self, topic: &str, key: &str) -> Option<&KnowledgeEntry> {
        self.topics
            .iter()
            .find(|(name, _)| name == topic)
            .and_then(|(_, entries)| entries.0.iter().find(|(k, _)| k == key))
            .map(|(_, entry)| entry)
    }

    /// All entries as `(topic, key, entry)`
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &KnowledgeEntry)> {
        self.topics.iter().flat_map(|(topic, entries)| {
            entries
                .0
                .iter()
                .map(move |(key, entry)| (topic.as_str(), key.as_str(), entry))
        })
    }

    /// Compact JSON, as embedded in the conversational prompt
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, as embedded in the reference prompt
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find the first entry whose key is mentioned in `text`
    ///
    /// Matching is on whole words, case-insensitive, and accepts a trailing
    /// plural `s` ("suites" finds `rooms.suite`).
    pub fn lookup(&self, text: &str) -> Option<(&str, &str, &KnowledgeEntry)> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.entries().find(|(_, key, _)| {
            let key = key.to_lowercase();
            words
                .iter()
                .any(|w| *w == key || w.strip_suffix('s') == Some(key.as_str()))
        })
    }
}
