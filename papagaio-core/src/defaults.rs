//! The defaults table merged into every loaded document.

use std::path::Path;

use crate::document::ConfigDocument;

pub const GENERAL: &str = "General";
pub const AUDIO: &str = "Audio";
pub const ADVANCED: &str = "Advanced";

/// Default model cache directory, relative to the user's home.
pub const MODEL_CACHE_DIR: &str = ".cache/whisper-models";

/// Build the defaults table. `home` only feeds `General.cache_dir`, which the
/// daemon expects as an absolute path.
pub fn defaults_at(home: &Path) -> ConfigDocument {
    let cache_dir = home.join(MODEL_CACHE_DIR).display().to_string();

    let mut doc = ConfigDocument::new();
    doc.set(GENERAL, "model", "small");
    doc.set(GENERAL, "language", "en");
    doc.set(GENERAL, "hotkey", "<ctrl>+<alt>+v");
    doc.set(GENERAL, "cache_dir", cache_dir);
    doc.set(GENERAL, "edit_before_send", "false");

    doc.set(AUDIO, "silence_threshold", "400");
    doc.set(AUDIO, "silence_duration", "5.0");
    doc.set(AUDIO, "max_recording_time", "3600");
    doc.set(AUDIO, "transcription_language", "auto");

    doc.set(ADVANCED, "use_ydotool", "false");
    doc.set(ADVANCED, "typing_delay", "0.3");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cache_dir_is_under_home() {
        let doc = defaults_at(&PathBuf::from("/home/ana"));
        assert_eq!(
            doc.get(GENERAL, "cache_dir"),
            Some("/home/ana/.cache/whisper-models")
        );
    }

    #[test]
    fn section_order_is_general_audio_advanced() {
        let doc = defaults_at(Path::new("/h"));
        let names: Vec<_> = doc.sections().map(|(name, _)| name).collect();
        assert_eq!(names, vec![GENERAL, AUDIO, ADVANCED]);
        assert_eq!(doc.entries().count(), 11);
    }
}
