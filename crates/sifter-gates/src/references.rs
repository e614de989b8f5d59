//! Reference documents fed to the rewrite passes: the AI-tells guide and the voice print.

use sifter_core::{SifterConfig, SifterResult};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Optional reference texts. An absent document disables the pass that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDocs {
    pub ai_tells: Option<String>,
    pub voice_print: Option<String>,
}

impl ReferenceDocs {
    pub fn new(ai_tells: Option<String>, voice_print: Option<String>) -> Self {
        Self { ai_tells, voice_print }
    }

    /// Read both documents from the configured content directory. Missing files are `None`.
    pub fn load(config: &SifterConfig) -> SifterResult<Self> {
        let ai_gate_path = config.ai_gate_path();
        let voice_print_path = config.voice_print_path();
        let docs = Self {
            ai_tells: read_optional(&ai_gate_path)?,
            voice_print: read_optional(&voice_print_path)?,
        };
        tracing::debug!(
            target: "sifter::gates",
            ai_gate = %ai_gate_path.display(),
            ai_gate_found = docs.ai_tells.is_some(),
            voice_print = %voice_print_path.display(),
            voice_print_found = docs.voice_print.is_some(),
            "Loaded reference documents"
        );
        Ok(docs)
    }

    pub fn ai_tells(&self) -> Option<&str> {
        self.ai_tells.as_deref()
    }

    pub fn voice_print(&self) -> Option<&str> {
        self.voice_print.as_deref()
    }
}

fn read_optional(path: &Path) -> SifterResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_present_files_and_tolerates_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ai-gate.md"), "# Tells\nNo tapestry.").unwrap();
        let config = SifterConfig {
            content_dir: dir.path().to_path_buf(),
            ..SifterConfig::default()
        };
        let docs = ReferenceDocs::load(&config).unwrap();
        assert_eq!(docs.ai_tells(), Some("# Tells\nNo tapestry."));
        assert_eq!(docs.voice_print(), None);
    }

    #[test]
    fn file_names_are_configurable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("acme-voice.md"), "Dry. Short.").unwrap();
        let config = SifterConfig {
            content_dir: dir.path().to_path_buf(),
            voice_print_file: "acme-voice.md".to_string(),
            ..SifterConfig::default()
        };
        let docs = ReferenceDocs::load(&config).unwrap();
        assert_eq!(docs.voice_print(), Some("Dry. Short."));
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected.
        fs::create_dir(dir.path().join("ai-gate.md")).unwrap();
        let config = SifterConfig {
            content_dir: dir.path().to_path_buf(),
            ..SifterConfig::default()
        };
        assert!(ReferenceDocs::load(&config).is_err());
    }
}
