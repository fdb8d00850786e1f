//! The callback surface between the compiler and whatever stores the assets.
//!
//! The compiler never touches the file system itself. Everything it needs
//! beyond the text of the file being compiled goes through a [`CompileHost`]:
//! reading referenced documents, resolving images, recording build
//! dependencies and reporting diagnostics.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::Level;

use crate::error::CompileError;
use crate::model::{ObjectTemplate, Tileset};
use crate::parse;

/// Host services used during compilation.
///
/// All paths are asset-relative, normalized and use forward slashes. Only
/// [`read_text`](CompileHost::read_text) is required; the remaining methods
/// have defaults built on top of it.
pub trait CompileHost {
    /// Read the document at `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Return [`CompileError::MissingReference`] if nothing exists at `path`.
    fn read_text(&mut self, path: &str) -> Result<String, CompileError>;

    /// Load and parse the object template at `path`, registering it as a
    /// dependency.
    fn load_template(&mut self, path: &str) -> Result<ObjectTemplate, CompileError> {
        let text = self.read_text(path)?;
        self.add_dependency(path);
        parse::parse_template(&text, path).map_err(|err| CompileError::from(err).in_file(path))
    }

    /// Load and parse the tileset at `path`, registering it as a dependency.
    fn load_tileset(&mut self, path: &str) -> Result<Tileset, CompileError> {
        let text = self.read_text(path)?;
        self.add_dependency(path);
        parse::parse_tileset(&text, path).map_err(|err| CompileError::from(err).in_file(path))
    }

    /// Resolve an image reference to the reference written to the baked
    /// output. The default keeps the path and registers it as a dependency.
    fn resolve_image(&mut self, path: &str) -> Result<String, CompileError> {
        self.add_dependency(path);
        Ok(path.to_string())
    }

    /// Record that the output depends on `path`.
    fn add_dependency(&mut self, _path: &str) {}

    /// Report a diagnostic. Forwards to `tracing` unless overridden.
    fn log(&mut self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }
}

/// A [`CompileHost`] reading from an asset directory on disk.
///
/// # Example
///
/// ```rust,no_run
/// use bevy_tiledbake_compiler::{CompileHost, FsHost};
///
/// let mut host = FsHost::new("assets");
/// let tileset = host.load_tileset("tilesets/dungeon.tsx")?;
/// assert_eq!(host.dependencies(), ["tilesets/dungeon.tsx"]);
/// # Ok::<(), bevy_tiledbake_compiler::CompileError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FsHost {
    root: PathBuf,
    dependencies: Vec<String>,
}

impl FsHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dependencies recorded so far, in first-seen order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn take_dependencies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dependencies)
    }
}

impl CompileHost for FsHost {
    fn read_text(&mut self, path: &str) -> Result<String, CompileError> {
        std::fs::read_to_string(self.root.join(path)).map_err(|source| match source.kind() {
            ErrorKind::NotFound => CompileError::MissingReference {
                path: path.to_string(),
                reason: String::from("file not found"),
            },
            _ => CompileError::Io {
                path: path.to_string(),
                source,
            },
        })
    }

    fn resolve_image(&mut self, path: &str) -> Result<String, CompileError> {
        if !self.root.join(path).is_file() {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "bevy_tiledbake_host_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(root.join("tilesets")).unwrap();
        root
    }

    #[test]
    fn test_fs_host_loads_tileset_and_records_dependency() {
        let root = temp_root("tileset");
        std::fs::write(
            root.join("tilesets/props.tsx"),
            r#"<tileset name="props" tilewidth="8" tileheight="8" tilecount="4" columns="2"/>"#,
        )
        .unwrap();

        let mut host = FsHost::new(&root);
        let tileset = host.load_tileset("tilesets/props.tsx").unwrap();
        host.add_dependency("tilesets/props.tsx");

        assert_eq!(tileset.name, "props");
        assert_eq!(host.dependencies(), ["tilesets/props.tsx"]);
        assert_eq!(host.take_dependencies().len(), 1);
        assert!(host.dependencies().is_empty());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_fs_host_missing_file() {
        let root = temp_root("missing");
        let mut host = FsHost::new(&root);

        assert!(matches!(
            host.read_text("templates/none.tx").unwrap_err(),
            CompileError::MissingReference { .. }
        ));
        assert!(matches!(
            host.resolve_image("images/none.png").unwrap_err(),
            CompileError::MissingReference { .. }
        ));
        assert!(host.dependencies().is_empty());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_parse_errors_carry_the_file() {
        let root = temp_root("broken");
        std::fs::write(root.join("tilesets/broken.tsx"), "<map/>").unwrap();

        let mut host = FsHost::new(&root);
        let err = host.load_tileset("tilesets/broken.tsx").unwrap_err();
        assert!(err.to_string().starts_with("tilesets/broken.tsx: "));
        assert!(matches!(err.root_cause(), CompileError::Parse(_)));

        std::fs::remove_dir_all(root).unwrap();
    }
}
