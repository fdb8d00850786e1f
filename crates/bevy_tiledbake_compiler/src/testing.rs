//! In-memory host for compiler tests.

use std::collections::HashMap;

use tracing::Level;

use crate::error::CompileError;
use crate::host::CompileHost;

/// A [`CompileHost`] backed by a map of asset paths to document text.
///
/// Any path listed in `images` resolves as an image. Log messages are kept
/// instead of forwarded to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct MemoryHost {
    pub files: HashMap<String, String>,
    pub images: Vec<String>,
    pub dependencies: Vec<String>,
    pub logs: Vec<(Level, String)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    pub fn with_image(mut self, path: &str) -> Self {
        self.images.push(path.to_string());
        self
    }
}

impl CompileHost for MemoryHost {
    fn read_text(&mut self, path: &str) -> Result<String, CompileError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CompileError::MissingReference {
                path: path.to_string(),
                reason: String::from("file not found"),
            })
    }

    fn resolve_image(&mut self, path: &str) -> Result<String, CompileError> {
        if !self.images.iter().any(|image| image == path) {
            return Err(CompileError::MissingReference {
                path: path.to_string(),
                reason: String::from("image not found"),
            });
        }
        self.add_dependency(path);
        Ok(path.to_string())
    }

    fn add_dependency(&mut self, path: &str) {
        if !self.dependencies.iter().any(|existing| existing == path) {
            self.dependencies.push(path.to_string());
        }
    }

    fn log(&mut self, level: Level, message: &str) {
        self.logs.push((level, message.to_string()));
    }
}
