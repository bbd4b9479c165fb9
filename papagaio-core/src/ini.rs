//! INI-style text codec.
//!
//! ## Grammar accepted by [`parse`]
//!
//! ```text
//! # comment            ; also a comment
//! [Section]
//! key = value          (split on the first '=', both sides trimmed)
//! ```
//!
//! Anything else is skipped, as is a `key = value` line that appears before
//! the first section header. Old or hand-edited files must always load.

use crate::document::ConfigDocument;
use crate::error::ConfigError;

/// Leading comment written at the top of every saved file.
pub const HEADER: &str = "# Papagaio Configuration";

/// Parse config text. Never fails.
pub fn parse(text: &str) -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    let mut current: Option<String> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = section_header(line) {
            doc.section_mut(name);
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!(line = lineno + 1, "skipping unrecognized config line");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        match current.as_deref() {
            Some(section) => doc.set(section, key, value.trim()),
            None => tracing::debug!(line = lineno + 1, key, "dropping key before any section"),
        }
    }

    doc
}

/// Render `doc` as text. Sections in iteration order, one blank line after
/// each section.
///
/// Call [`check_representable`] first when the document comes from outside;
/// this function does not validate.
pub fn serialize(doc: &ConfigDocument) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");

    for (section, keys) in doc.sections() {
        out.push('[');
        out.push_str(section);
        out.push_str("]\n");
        for (key, value) in keys {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Reject entries that would not survive `parse(serialize(doc))` unchanged.
///
/// [`parse`] trims keys and values, so padded ones are refused here rather
/// than silently collapsed on reload.
pub fn check_representable(doc: &ConfigDocument) -> Result<(), ConfigError> {
    for (section, keys) in doc.sections() {
        let invalid = |key: &str, reason| ConfigError::InvalidEntry {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        };

        if section.is_empty() {
            return Err(invalid("", "empty section name"));
        }
        if has_line_break(section) {
            return Err(invalid("", "section name contains a line break"));
        }

        for (key, value) in keys {
            if key.trim().is_empty() {
                return Err(invalid(key, "empty key"));
            }
            if has_line_break(key) || has_line_break(value) {
                return Err(invalid(key, "contains a line break"));
            }
            if key != key.trim() {
                return Err(invalid(key, "key has leading or trailing whitespace"));
            }
            if value != value.trim() {
                return Err(invalid(key, "value has leading or trailing whitespace"));
            }
            if key.contains('=') {
                return Err(invalid(key, "key contains '='"));
            }
            if key.trim_start().starts_with(['#', ';', '[']) {
                return Err(invalid(key, "key starts with a comment or section marker"));
            }
        }
    }
    Ok(())
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?
        .strip_suffix(']')
        .filter(|name| !name.is_empty())
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_trimmed_pairs() {
        let doc = parse("[General]\n  model =  base  \nlanguage=pt\n\n[Audio]\nsilence_threshold = 300\n");
        assert_eq!(doc.get("General", "model"), Some("base"));
        assert_eq!(doc.get("General", "language"), Some("pt"));
        assert_eq!(doc.get("Audio", "silence_threshold"), Some("300"));
    }

    #[test]
    fn key_before_first_section_is_dropped() {
        let doc = parse("orphan = 1\n[General]\nmodel = tiny\n");
        assert_eq!(doc.get("General", "model"), Some("tiny"));
        assert_eq!(doc.entries().count(), 1);
    }

    #[test]
    fn comments_and_garbage_are_ignored() {
        let doc = parse("# top\n[General]\n; note\n# model = large\nnot a pair\n = nokey\nmodel = small\n");
        assert_eq!(doc.get("General", "model"), Some("small"));
        assert_eq!(doc.section("General").map(|s| s.len()), Some(1));
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let doc = parse("[General]\nhotkey = <ctrl>+=+v = x\n");
        assert_eq!(doc.get("General", "hotkey"), Some("<ctrl>+=+v = x"));
    }

    #[test]
    fn empty_value_is_kept() {
        let doc = parse("[General]\ncache_dir =\n");
        assert_eq!(doc.get("General", "cache_dir"), Some(""));
    }

    #[test]
    fn reopened_section_continues() {
        let doc = parse("[A]\nx = 1\n[B]\ny = 2\n[A]\nz = 3\nx = 4\n");
        assert_eq!(doc.get("A", "x"), Some("4"));
        assert_eq!(doc.get("A", "z"), Some("3"));
        assert_eq!(doc.get("B", "y"), Some("2"));
    }

    #[test]
    fn empty_section_survives_roundtrip() {
        let mut doc = ConfigDocument::new();
        doc.section_mut("Empty");
        doc.set("General", "model", "base");
        assert_eq!(parse(&serialize(&doc)), doc);
    }

    #[test]
    fn serialize_layout() {
        let mut doc = ConfigDocument::new();
        doc.set("General", "model", "base");
        doc.set("Audio", "silence_duration", "5.0");
        assert_eq!(
            serialize(&doc),
            "# Papagaio Configuration\n\n[General]\nmodel = base\n\n[Audio]\nsilence_duration = 5.0\n\n"
        );
    }

    #[test]
    fn crlf_input_parses() {
        let doc = parse("[General]\r\nmodel = medium\r\n");
        assert_eq!(doc.get("General", "model"), Some("medium"));
    }

    #[test]
    fn unrepresentable_entries_are_rejected() {
        let mut doc = ConfigDocument::new();
        doc.set("General", "hotkey", "a\nb");
        assert!(matches!(
            check_representable(&doc),
            Err(ConfigError::InvalidEntry { .. })
        ));

        let mut doc = ConfigDocument::new();
        doc.set("General", "a=b", "c");
        assert!(check_representable(&doc).is_err());

        let mut doc = ConfigDocument::new();
        doc.set("General", "#x", "c");
        assert!(check_representable(&doc).is_err());

        let mut doc = ConfigDocument::new();
        doc.set("", "x", "c");
        assert!(check_representable(&doc).is_err());

        let mut doc = ConfigDocument::new();
        doc.set("General", "model", "value = with equals");
        assert!(check_representable(&doc).is_ok());
    }

    #[test]
    fn padded_key_cannot_shadow_its_trimmed_twin() {
        let mut doc = ConfigDocument::new();
        doc.set("General", "model", "base");
        doc.set("General", " model", "large");
        assert!(matches!(
            check_representable(&doc),
            Err(ConfigError::InvalidEntry { ref key, .. }) if key == " model"
        ));
        // What would have happened on reload.
        assert_eq!(parse(&serialize(&doc)).get("General", "model"), Some("large"));
    }

    #[test]
    fn padded_value_is_rejected() {
        let mut doc = ConfigDocument::new();
        doc.set("General", "hotkey", "  <ctrl>+v  ");
        assert!(check_representable(&doc).is_err());

        let mut doc = ConfigDocument::new();
        doc.set("General", "hotkey", "<ctrl> + v");
        assert!(check_representable(&doc).is_ok(), "inner spaces are fine");
        assert_eq!(parse(&serialize(&doc)), doc);
    }
}
