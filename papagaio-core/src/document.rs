//! The in-memory configuration document.
//!
//! Values are untyped strings. Sections and keys keep insertion order so a
//! load/save cycle does not reshuffle the user's file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `key → value` mapping for one `[Section]`.
pub type Section = IndexMap<String, String>;

/// Ordered `section → (key → value)` mapping.
///
/// Serializes as a plain nested JSON object, e.g.
/// `{"General": {"model": "small"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Assign `value`, creating the section if needed. An existing key keeps
    /// its position.
    pub fn set(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Open `name` (empty if new) and return it for in-place edits.
    pub fn section_mut(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.entry(name.into()).or_default()
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// All `(section, key, value)` triples in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections.iter().flat_map(|(section, keys)| {
            keys.iter()
                .map(move |(k, v)| (section.as_str(), k.as_str(), v.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Copy every `(section, key)` from `defaults` that this document lacks.
    ///
    /// Never overwrites a key that is already present, including keys whose
    /// value is the empty string. Returns the number of keys filled in.
    pub fn merge_defaults(&mut self, defaults: &ConfigDocument) -> usize {
        let mut filled = 0;
        for (section, keys) in &defaults.sections {
            let target = self.sections.entry(section.clone()).or_default();
            for (key, value) in keys {
                if !target.contains_key(key) {
                    target.insert(key.clone(), value.clone());
                    filled += 1;
                }
            }
        }
        filled
    }
}
