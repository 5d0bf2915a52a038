//! System prompt loading and the prompt handed to the completion client

use crate::error::{RcaError, RcaResult};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("default_prompt.txt");

/// Prompt for one summarization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instructions sent as the system message
    pub system: String,
    /// Serialized incident document sent as the user message
    pub document: String,
}

/// Read the system prompt from `path`, using the built-in prompt when the
/// file does not exist.
pub fn load_system_prompt(path: &Path) -> RcaResult<String> {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Err(RcaError::config(format!(
            "prompt file {} is empty",
            path.display()
        ))),
        Ok(text) => {
            debug!("Loaded system prompt from {}", path.display());
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "prompt file {} not found, using built-in prompt",
                path.display()
            );
            Ok(DEFAULT_SYSTEM_PROMPT.to_string())
        }
        Err(e) => Err(RcaError::io_with_path(
            format!("Failed to read prompt file: {}", e),
            path.display().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Summarize briefly.").unwrap();
        assert_eq!(load_system_prompt(file.path()).unwrap(), "Summarize briefly.");
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = load_system_prompt(&dir.path().join("prompt.txt")).unwrap();
        assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(prompt.contains("## Overview"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            load_system_prompt(file.path()),
            Err(RcaError::Config { .. })
        ));
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_system_prompt(dir.path()),
            Err(RcaError::Io { .. })
        ));
    }
}
