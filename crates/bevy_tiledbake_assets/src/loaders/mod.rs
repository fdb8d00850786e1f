pub mod baked;
pub mod map;
pub mod tileset;

use bevy::{
    asset::{LoadContext, ReadAssetBytesError},
    platform::collections::HashMap,
    prelude::*,
};
use bevy_tiledbake_compiler::{CompileError, ReadError, protocol::image_reference};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BakeLoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to bake: {0}")]
    Compile(#[from] CompileError),

    #[error("Failed to read baked data: {0}")]
    Read(#[from] ReadError),

    #[error("Failed to read dependency: {0}")]
    Dependency(#[from] ReadAssetBytesError),
}

/// Settings for the pre-baked `.tmb`/`.tsb` loaders.
///
/// Baked image references carry no extension; these loaders append
/// `image_extension` to find the image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakedLoaderSettings {
    pub image_extension: String,
}

impl BakedLoaderSettings {
    pub fn image_path(&self, reference: &str) -> String {
        format!("{reference}.{}", self.image_extension)
    }
}

impl Default for BakedLoaderSettings {
    fn default() -> Self {
        Self {
            image_extension: String::from("png"),
        }
    }
}

/// Asset-relative path of the asset being loaded, with forward slashes.
pub(crate) fn asset_path_string(load_context: &LoadContext) -> String {
    load_context
        .asset_path()
        .path()
        .to_string_lossy()
        .replace('\\', "/")
}

/// Tilesets and templates; every other compiler dependency is an image.
fn is_document(path: &str) -> bool {
    path.ends_with(".tsx") || path.ends_with(".tx")
}

/// Turn the compiler's dependency list into Bevy dependencies.
///
/// Documents are read through the asset server so that editing them reloads
/// the baked asset. Images are loaded and keyed by their baked reference.
///
/// # Arguments
/// * `load_context` - The current asset's load context
/// * `dependencies` - Asset-relative paths recorded by the compile host
///
/// # Returns
/// * `Ok(HashMap)` - Image handles keyed by baked image reference
/// * `Err(BakeLoaderError)` - If a document cannot be read back
pub(crate) async fn register_dependencies(
    load_context: &mut LoadContext<'_>,
    dependencies: Vec<String>,
) -> Result<HashMap<String, Handle<Image>>, BakeLoaderError> {
    let mut images = HashMap::default();
    for path in dependencies {
        if is_document(&path) {
            load_context.read_asset_bytes(path.clone()).await?;
        } else {
            let handle: Handle<Image> = load_context.load(path.clone());
            images.insert(image_reference(&path).to_string(), handle);
        }
    }
    Ok(images)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;

    /// A scratch asset directory under the system temp dir.
    pub(crate) fn temp_assets(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "bevy_tiledbake_assets_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(root.join("maps")).unwrap();
        std::fs::create_dir_all(root.join("tilesets")).unwrap();
        std::fs::create_dir_all(root.join("images")).unwrap();
        root
    }

    #[test]
    fn test_document_dependencies() {
        assert!(is_document("tilesets/terrain.tsx"));
        assert!(is_document("templates/chest.tx"));
        assert!(!is_document("images/terrain.png"));
        assert!(!is_document("images/tx"));
    }

    #[test]
    fn test_baked_image_path() {
        let settings = BakedLoaderSettings::default();
        assert_eq!(settings.image_path("images/terrain"), "images/terrain.png");

        let settings = BakedLoaderSettings {
            image_extension: String::from("ktx2"),
        };
        assert_eq!(settings.image_path("images/sky"), "images/sky.ktx2");
    }
}
