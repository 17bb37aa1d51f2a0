//! Interpretation of a backend reply as commit messages.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::llm::json::{extract_json_block, parse_json_to_map};

/// Commit strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// One commit and message per staged file.
    PerFile,
    /// One commit and message for everything staged.
    Unified,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::PerFile => write!(f, "per-file"),
            GenerationMode::Unified => write!(f, "unified"),
        }
    }
}

/// A commit message drafted for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMessage {
    pub path: String,
    pub message: String,
}

impl FileMessage {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Messages produced by one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// Path → message pairs in the order the backend listed them.
    PerFile(Vec<FileMessage>),
    /// One message for all staged files.
    Unified(String),
}

impl GenerationResult {
    /// Whether the reply yielded nothing usable.
    pub fn is_empty(&self) -> bool {
        match self {
            GenerationResult::PerFile(messages) => messages.is_empty(),
            GenerationResult::Unified(message) => message.trim().is_empty(),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            GenerationResult::PerFile(_) => GenerationMode::PerFile,
            GenerationResult::Unified(_) => GenerationMode::Unified,
        }
    }
}

static WRAPPING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z]*[ \t]*\r?\n(.*?)\r?\n?```\z").expect("fence pattern is valid")
});

/// Interpret raw backend text for the given mode.
///
/// Per-file: the first ` ```json ` block is parsed; if there is none, a bare
/// JSON object reply is accepted. Unified: the text itself is the message.
pub fn parse_response(raw: &str, mode: GenerationMode) -> GenerationResult {
    match mode {
        GenerationMode::PerFile => {
            let messages = match extract_json_block(raw) {
                Some(block) => parse_json_to_map(&block),
                None if raw.trim_start().starts_with('{') => parse_json_to_map(raw.trim()),
                None => {
                    warn!("Response contained no JSON block");
                    Vec::new()
                }
            };
            debug!("Parsed {} per-file messages", messages.len());
            GenerationResult::PerFile(messages)
        }
        GenerationMode::Unified => GenerationResult::Unified(normalize_unified_message(raw)),
    }
}

/// Trim the reply and drop a code fence wrapping the whole text.
pub fn normalize_unified_message(raw: &str) -> String {
    let trimmed = raw.trim();
    match WRAPPING_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}
