use serde::{Deserialize, Serialize};

use crate::model::Color;

/// Configuration for a [`Compiler`](crate::Compiler).
///
/// Also used as the asset loader settings of the Bevy integration, so it can
/// be overridden per asset in a `.meta` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    /// RGB background written for maps that do not declare a `backgroundcolor`.
    pub default_background: [u8; 3],
    /// Reject maps whose tilesets claim overlapping global id ranges.
    pub validate_tileset_ranges: bool,
}

impl CompileSettings {
    pub fn default_background_color(&self) -> Color {
        let [r, g, b] = self.default_background;
        Color::rgb(r, g, b)
    }
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            default_background: [0, 0, 0],
            validate_tileset_ranges: true,
        }
    }
}
