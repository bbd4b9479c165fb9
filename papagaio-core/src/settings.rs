//! Typed, parse-on-read view over a [`ConfigDocument`].
//!
//! The store is schema-agnostic; callers that want real types go through
//! here. Keys missing from the document are a validation error, so pass a
//! document that went through `store::load_at` (defaults merged).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{ADVANCED, AUDIO, GENERAL};
use crate::document::ConfigDocument;
use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whisper model size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::Tiny,
        Model::Base,
        Model::Small,
        Model::Medium,
        Model::Large,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Tiny => "tiny",
            Model::Base => "base",
            Model::Small => "small",
            Model::Medium => "medium",
            Model::Large => "large",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| "expected one of: tiny, base, small, medium, large".to_string())
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Pt => write!(f, "pt"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            _ => Err("expected one of: en, pt".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub model: Model,
    pub language: Language,
    pub hotkey: String,
    pub cache_dir: PathBuf,
    pub edit_before_send: bool,
    pub silence_threshold: u32,
    pub silence_duration: f64,
    pub max_recording_time: u32,
    /// `auto` or an ISO 639 code.
    pub transcription_language: String,
    pub use_ydotool: bool,
    pub typing_delay: f64,
}

impl Settings {
    /// Parse every known key; stops at the first invalid one.
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, ValidationError> {
        let r = Reader { doc };
        Ok(Self {
            model: r.parse(GENERAL, "model", str::parse)?,
            language: r.parse(GENERAL, "language", str::parse)?,
            hotkey: r.parse(GENERAL, "hotkey", parse_hotkey)?,
            cache_dir: r.parse(GENERAL, "cache_dir", parse_path)?,
            edit_before_send: r.parse(GENERAL, "edit_before_send", parse_bool)?,
            silence_threshold: r.parse(AUDIO, "silence_threshold", parse_number)?,
            silence_duration: r.parse(AUDIO, "silence_duration", parse_seconds)?,
            max_recording_time: r.parse(AUDIO, "max_recording_time", parse_number)?,
            transcription_language: r.parse(
                AUDIO,
                "transcription_language",
                parse_transcription_language,
            )?,
            use_ydotool: r.parse(ADVANCED, "use_ydotool", parse_bool)?,
            typing_delay: r.parse(ADVANCED, "typing_delay", parse_seconds)?,
        })
    }

    /// Every validation failure in `doc`, in document order of the schema.
    pub fn validate_document(doc: &ConfigDocument) -> Vec<ValidationError> {
        let r = Reader { doc };
        [
            r.check(GENERAL, "model", |v| v.parse::<Model>().map(drop)),
            r.check(GENERAL, "language", |v| v.parse::<Language>().map(drop)),
            r.check(GENERAL, "hotkey", |v| parse_hotkey(v).map(drop)),
            r.check(GENERAL, "cache_dir", |v| parse_path(v).map(drop)),
            r.check(GENERAL, "edit_before_send", |v| parse_bool(v).map(drop)),
            r.check(AUDIO, "silence_threshold", |v| parse_number::<u32>(v).map(drop)),
            r.check(AUDIO, "silence_duration", |v| parse_seconds(v).map(drop)),
            r.check(AUDIO, "max_recording_time", |v| parse_number::<u32>(v).map(drop)),
            r.check(AUDIO, "transcription_language", |v| {
                parse_transcription_language(v).map(drop)
            }),
            r.check(ADVANCED, "use_ydotool", |v| parse_bool(v).map(drop)),
            r.check(ADVANCED, "typing_delay", |v| parse_seconds(v).map(drop)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Validate a single key. Keys outside the schema are accepted as-is.
    pub fn validate_value(section: &str, key: &str, value: &str) -> Result<(), ValidationError> {
        let mut doc = ConfigDocument::new();
        doc.set(section, key, value);
        let known = Settings::validate_document(&doc)
            .into_iter()
            .find(|e| e.section == section && e.key == key && e.value == value);
        match known {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Reader<'a> {
    doc: &'a ConfigDocument,
}

impl Reader<'_> {
    fn parse<T>(
        &self,
        section: &str,
        key: &str,
        f: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, ValidationError> {
        let err = |value: &str, reason: String| ValidationError {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };
        let raw = self
            .doc
            .get(section, key)
            .ok_or_else(|| err("", "missing".to_string()))?;
        f(raw.trim()).map_err(|reason| err(raw, reason))
    }

    /// Like `parse`, but an absent key is not an error.
    fn check(
        &self,
        section: &str,
        key: &str,
        f: impl FnOnce(&str) -> Result<(), String>,
    ) -> Option<ValidationError> {
        self.doc.get(section, key)?;
        self.parse(section, key, f).err()
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn parse_bool(v: &str) -> Result<bool, String> {
    match v.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_number<T: FromStr>(v: &str) -> Result<T, String> {
    v.parse::<T>()
        .map_err(|_| "expected a non-negative integer".to_string())
}

fn parse_seconds(v: &str) -> Result<f64, String> {
    match v.parse::<f64>() {
        Ok(s) if s.is_finite() && s >= 0.0 => Ok(s),
        _ => Err("expected a non-negative number of seconds".to_string()),
    }
}

fn parse_path(v: &str) -> Result<PathBuf, String> {
    if v.is_empty() {
        return Err("expected a directory path".to_string());
    }
    Ok(PathBuf::from(v))
}

/// `<mod>+<mod>+key`: one or more `<...>` modifiers followed by a plain key.
fn parse_hotkey(v: &str) -> Result<String, String> {
    const FORMAT: &str = "expected format <mod>+<mod>+key";
    let parts: Vec<&str> = v.split('+').collect();
    let Some((key, modifiers)) = parts.split_last() else {
        return Err(FORMAT.to_string());
    };
    if modifiers.is_empty() || key.is_empty() || key.starts_with('<') {
        return Err(FORMAT.to_string());
    }
    let well_formed = modifiers.iter().all(|m| {
        m.len() > 2
            && m.starts_with('<')
            && m.ends_with('>')
            && m[1..m.len() - 1].chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !well_formed {
        return Err(FORMAT.to_string());
    }
    Ok(v.to_string())
}

fn parse_transcription_language(v: &str) -> Result<String, String> {
    let iso = (2..=3).contains(&v.len()) && v.chars().all(|c| c.is_ascii_lowercase());
    if v == "auto" || iso {
        Ok(v.to_string())
    } else {
        Err("expected 'auto' or an ISO language code".to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
