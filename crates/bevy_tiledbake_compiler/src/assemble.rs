//! Map graph assembly.
//!
//! The assembler turns a freshly parsed graph into a self-contained one:
//! external tilesets are loaded, objects are resolved against their
//! templates, images are resolved through the host and every tile layer is
//! decoded and sequenced. The result can be serialized without further
//! lookups.

use tracing::Level;

use crate::decode::decode_tile_data;
use crate::error::CompileError;
use crate::field::Field;
use crate::host::CompileHost;
use crate::model::{
    FLIP_FLAGS, GID_MASK, Image, Layer, LayerKind, Map, MapObject, RenderOrder, TemplateTileset,
    Tileset, TilesetEntry,
};
use crate::parse;
use crate::protocol;
use crate::sequence::sequence;
use crate::settings::CompileSettings;
use crate::template::{TemplateSource, resolve_object};

/// Compiles Tiled documents into baked streams.
///
/// A compiler borrows its host for its whole lifetime. Compiling a document
/// never leaves partial output behind: on failure the error is logged to the
/// host and returned, and no bytes are produced.
///
/// # Example
///
/// ```rust,no_run
/// use bevy_tiledbake_compiler::{Compiler, FsHost, read_map};
///
/// let mut host = FsHost::new("assets");
/// let source = std::fs::read_to_string("assets/maps/level1.tmx")?;
/// let bytes = Compiler::new(&mut host).compile_map(&source, "maps/level1.tmx")?;
/// let map = read_map(&bytes)?;
/// println!("{} layers, depends on {:?}", map.layers.len(), host.dependencies());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Compiler<'h> {
    host: &'h mut dyn CompileHost,
    settings: CompileSettings,
}

impl<'h> Compiler<'h> {
    /// Create a compiler with default settings.
    pub fn new(host: &'h mut dyn CompileHost) -> Self {
        Self::with_settings(host, CompileSettings::default())
    }

    pub fn with_settings(host: &'h mut dyn CompileHost, settings: CompileSettings) -> Self {
        Self { host, settings }
    }

    pub fn settings(&self) -> &CompileSettings {
        &self.settings
    }

    /// Compile the `.tmx` document `source`, located at `path`, into a baked
    /// map stream.
    ///
    /// # Errors
    ///
    /// Any parse, reference, decode or serialization failure, wrapped with
    /// the file, layer and object it happened in.
    pub fn compile_map(&mut self, source: &str, path: &str) -> Result<Vec<u8>, CompileError> {
        self.host.log(Level::DEBUG, &format!("compiling map {path}"));
        let result = parse::parse_map(source, path)
            .map_err(CompileError::from)
            .and_then(|mut map| {
                self.assemble_map(&mut map)?;
                let mut bytes = Vec::new();
                protocol::write_map(&mut bytes, &map)?;
                Ok(bytes)
            });
        self.report(path, result)
    }

    /// Compile the `.tsx` document `source`, located at `path`, into a baked
    /// standalone tileset stream.
    pub fn compile_tileset(&mut self, source: &str, path: &str) -> Result<Vec<u8>, CompileError> {
        self.host.log(Level::DEBUG, &format!("compiling tileset {path}"));
        let result = parse::parse_tileset(source, path)
            .map_err(CompileError::from)
            .and_then(|mut tileset| {
                self.assemble_tileset(&mut tileset)?;
                let mut bytes = Vec::new();
                protocol::write_tileset(&mut bytes, &tileset)?;
                Ok(bytes)
            });
        self.report(path, result)
    }

    /// Resolve everything `map` references, in place.
    ///
    /// Loads external tilesets, validates tileset id ranges, resolves object
    /// templates (object layers at any depth and tileset tile objects),
    /// resolves images and decodes and sequences every tile layer.
    pub fn assemble_map(&mut self, map: &mut Map) -> Result<(), CompileError> {
        for entry in &mut map.tilesets {
            if let TilesetEntry::External { first_gid, source } = entry {
                let first_gid = *first_gid;
                let mut tileset = self.host.load_tileset(source)?;
                tileset.first_gid = first_gid;
                *entry = TilesetEntry::Inline(tileset);
            }
        }

        for tileset in map.tilesets.iter().filter_map(TilesetEntry::tileset) {
            check_gid_space(tileset)?;
        }
        if self.settings.validate_tileset_ranges {
            validate_ranges(map.tilesets.iter().filter_map(TilesetEntry::tileset))?;
        }

        if map.background_color.is_none() {
            map.background_color = Some(self.settings.default_background_color());
        }

        let mut assembly = Assembly {
            host: &mut *self.host,
            render_order: map.render_order,
            tilesets: map
                .tilesets
                .iter()
                .filter_map(TilesetEntry::tileset)
                .filter_map(|tileset| Some((tileset.source.clone()?, tileset.first_gid)))
                .collect(),
        };

        for entry in &mut map.tilesets {
            if let TilesetEntry::Inline(tileset) = entry {
                assembly
                    .assemble_tileset(tileset)
                    .map_err(|err| match &tileset.source {
                        Some(source) => err.in_file(source.as_str()),
                        None => err,
                    })?;
            }
        }

        assembly.assemble_layers(&mut map.layers)
    }

    /// Resolve everything a standalone `tileset` references, in place.
    pub fn assemble_tileset(&mut self, tileset: &mut Tileset) -> Result<(), CompileError> {
        Assembly {
            host: &mut *self.host,
            render_order: RenderOrder::default(),
            tilesets: Vec::new(),
        }
        .assemble_tileset(tileset)
    }

    fn report<T>(
        &mut self,
        path: &str,
        result: Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        result.map_err(|err| {
            let err = err.in_file(path);
            self.host.log(Level::ERROR, &err.to_string());
            err
        })
    }
}

/// Fail if any two tilesets claim the same global id.
fn validate_ranges<'a>(tilesets: impl Iterator<Item = &'a Tileset>) -> Result<(), CompileError> {
    let mut tilesets: Vec<&Tileset> = tilesets.collect();
    tilesets.sort_by_key(|tileset| tileset.first_gid);

    for pair in tilesets.windows(2) {
        let [first, second] = pair else { continue };
        if first.gid_range().end > second.first_gid {
            return Err(CompileError::OverlappingTilesets {
                first: tileset_label(first),
                second: tileset_label(second),
            });
        }
    }
    Ok(())
}

/// Fail if a tileset's ids run into the flip flag bits.
fn check_gid_space(tileset: &Tileset) -> Result<(), CompileError> {
    let last = u64::from(tileset.first_gid) + u64::from(tileset.tile_count.max(1)) - 1;
    if last > u64::from(GID_MASK) {
        return Err(CompileError::GidOutOfRange {
            tileset: tileset_label(tileset),
            gid: last,
        });
    }
    Ok(())
}

fn tileset_label(tileset: &Tileset) -> String {
    tileset
        .source
        .clone()
        .unwrap_or_else(|| tileset.name.clone())
}

/// State shared by one assembly pass.
struct Assembly<'a> {
    host: &'a mut dyn CompileHost,
    render_order: RenderOrder,
    /// `(source, first_gid)` of every external tileset in the map, used to
    /// move tile template gids into the map's id space.
    tilesets: Vec<(String, u32)>,
}

impl TemplateSource for Assembly<'_> {
    fn fetch_template(&mut self, reference: &str) -> Result<MapObject, CompileError> {
        let template = self.host.load_template(reference)?;
        let mut object = template.object;

        if let (Some(tileset), Field::Set(gid)) = (&template.tileset, &mut object.gid) {
            self.host.add_dependency(&tileset.source);
            *gid = self
                .remap_gid(*gid, tileset)
                .map_err(|err| err.in_file(reference))?;
        }
        Ok(object)
    }
}

impl Assembly<'_> {
    /// Translate a gid from a template's tileset space into the map's.
    /// Flip flags are kept.
    fn remap_gid(&self, gid: u32, tileset: &TemplateTileset) -> Result<u32, CompileError> {
        let tile = gid & GID_MASK;
        if tile == 0 {
            return Ok(gid);
        }

        let first_gid = self
            .tilesets
            .iter()
            .find(|(source, _)| *source == tileset.source)
            .map(|(_, first_gid)| *first_gid)
            .ok_or_else(|| CompileError::MissingReference {
                path: tileset.source.clone(),
                reason: String::from("tileset used by a tile template is not part of the map"),
            })?;
        let local = tile
            .checked_sub(tileset.first_gid)
            .ok_or_else(|| CompileError::MissingReference {
                path: tileset.source.clone(),
                reason: format!("tile {tile} is below the tileset's first gid"),
            })?;

        let remapped = first_gid
            .checked_add(local)
            .filter(|remapped| remapped & FLIP_FLAGS == 0)
            .ok_or_else(|| CompileError::GidOutOfRange {
                tileset: tileset.source.clone(),
                gid: u64::from(first_gid) + u64::from(local),
            })?;
        Ok(remapped | (gid & FLIP_FLAGS))
    }

    fn resolve_image(&mut self, image: &mut Image) -> Result<(), CompileError> {
        image.source = self.host.resolve_image(&image.source)?;
        Ok(())
    }

    fn resolve_objects(&mut self, objects: &mut [MapObject]) -> Result<(), CompileError> {
        for object in objects {
            resolve_object(object, self).map_err(|err| err.in_object(object.label()))?;
        }
        Ok(())
    }

    fn assemble_tileset(&mut self, tileset: &mut Tileset) -> Result<(), CompileError> {
        if let Some(image) = &mut tileset.image {
            self.resolve_image(image)?;
        }
        for tile in &mut tileset.tiles {
            if let Some(image) = &mut tile.image {
                self.resolve_image(image)?;
            }
            self.resolve_objects(&mut tile.objects)?;
        }
        Ok(())
    }

    fn assemble_layers(&mut self, layers: &mut [Layer]) -> Result<(), CompileError> {
        for layer in layers {
            self.assemble_layer(layer)
                .map_err(|err| err.in_layer(layer.name.as_str()))?;
        }
        Ok(())
    }

    fn assemble_layer(&mut self, layer: &mut Layer) -> Result<(), CompileError> {
        match &mut layer.kind {
            LayerKind::Tiles(tiles) => {
                let grid = decode_tile_data(&tiles.data, tiles.width, tiles.height)?;
                tiles.tiles = sequence(&grid, tiles.width, tiles.height, self.render_order);
                self.host.log(
                    Level::DEBUG,
                    &format!("layer '{}': {} tiles", layer.name, tiles.tiles.len()),
                );
            }
            LayerKind::Image(image) => {
                if let Some(image) = &mut image.image {
                    self.resolve_image(image)?;
                }
            }
            LayerKind::Objects(objects) => self.resolve_objects(&mut objects.objects)?,
            LayerKind::Group(group) => self.assemble_layers(&mut group.layers)?,
        }
        Ok(())
    }
}
