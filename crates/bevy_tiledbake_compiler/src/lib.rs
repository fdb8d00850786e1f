//! # `bevy_tiledbake_compiler`
//!
//! Bakes Tiled authoring files (`.tmx` maps, `.tsx` tilesets and `.tx` object
//! templates) into a compact binary format that a game can load without
//! parsing XML, resolving templates or decoding tile data at runtime.
//!
//! This crate has no Bevy dependency. The Bevy asset loaders live in
//! `bevy_tiledbake_assets`.
//!
//! ## Pipeline
//!
//! 1. [`parse`] maps the XML onto the [`model`] graph. Object fields that the
//!    document does not set stay [`Field::Unset`].
//! 2. [`Compiler::assemble_map`] loads external tilesets through a
//!    [`CompileHost`], applies object templates ([`template`]), decodes tile
//!    data ([`decode`]) and orders tiles for painting ([`sequence`]).
//! 3. [`protocol`] writes the resolved graph. [`read_map`] reads it back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy_tiledbake_compiler::prelude::*;
//!
//! let mut host = FsHost::new("assets");
//! let source = std::fs::read_to_string("assets/maps/level1.tmx")?;
//! let baked = Compiler::new(&mut host).compile_map(&source, "maps/level1.tmx")?;
//! std::fs::write("assets/maps/level1.tmb", &baked)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decode;
mod error;
mod field;
pub mod host;
pub mod model;
pub mod parse;
pub mod protocol;
pub mod sequence;
mod settings;
pub mod template;

mod assemble;

#[cfg(test)]
pub(crate) mod testing;

pub use assemble::Compiler;
pub use error::CompileError;
pub use field::Field;
pub use host::{CompileHost, FsHost};
pub use protocol::{ReadError, RuntimeMap, RuntimeTileset, read_map, read_tileset};
pub use settings::CompileSettings;

pub mod prelude {
    pub use crate::host::{CompileHost, FsHost};
    pub use crate::protocol::{
        RuntimeLayer, RuntimeLayerKind, RuntimeMap, RuntimeObject, RuntimeTile, RuntimeTileset,
        read_map, read_tileset,
    };
    pub use crate::{CompileError, CompileSettings, Compiler};
}
