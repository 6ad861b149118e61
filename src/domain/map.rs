//! Map document model
//!
//! A map is a grid of tiles organised in layers. Tile layers reference
//! tiles by global id (gid); each tileset claims the gids starting at its
//! `first_gid`. Tilesets are shared resources owned by the map and are
//! released together with it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Custom properties attached to maps, tilesets, layers and objects
pub type Properties = BTreeMap<String, String>;

/// Map orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Orthogonal => write!(f, "orthogonal"),
            Orientation::Isometric => write!(f, "isometric"),
            Orientation::Staggered => write!(f, "staggered"),
            Orientation::Hexagonal => write!(f, "hexagonal"),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            "staggered" => Ok(Orientation::Staggered),
            "hexagonal" => Ok(Orientation::Hexagonal),
            _ => Err(format!("Unknown map orientation: {}", s)),
        }
    }
}

/// The image a tileset cuts its tiles from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Image path, relative to the map file
    pub source: String,

    pub width: u32,
    pub height: u32,
}

/// A set of tiles sharing one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// First global tile id claimed by this tileset
    #[serde(rename = "firstgid")]
    pub first_gid: u32,

    pub name: String,

    #[serde(rename = "tilewidth")]
    pub tile_width: u32,

    #[serde(rename = "tileheight")]
    pub tile_height: u32,

    #[serde(rename = "tilecount", default)]
    pub tile_count: u32,

    #[serde(default)]
    pub columns: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl Tileset {
    /// Creates an empty tileset
    pub fn new(name: impl Into<String>, first_gid: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            first_gid,
            name: name.into(),
            tile_width,
            tile_height,
            tile_count: 0,
            columns: 0,
            image: None,
            properties: Properties::new(),
        }
    }

    /// Returns the tile id local to this tileset
    pub fn local_id(&self, gid: u32) -> Option<u32> {
        gid.checked_sub(self.first_gid)
    }
}

/// A grid of tile references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Row-major global tile ids, 0 for empty cells
    #[serde(rename = "data")]
    pub tiles: Vec<u32>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl TileLayer {
    /// Creates a layer with every cell empty
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            visible: true,
            opacity: 1.0,
            tiles: vec![0; (width as usize) * (height as usize)],
            properties: Properties::new(),
        }
    }

    /// Creates a layer whose tile data is filled in later
    pub fn empty(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            visible: true,
            opacity: 1.0,
            tiles: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Number of cells, or `None` if it does not fit in memory addressing
    pub fn cell_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
    }

    /// Returns the gid at the given cell
    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).and_then(|i| self.tiles.get(i).copied())
    }

    /// Sets the gid at the given cell, returning false when out of bounds
    pub fn set_tile(&mut self, x: u32, y: u32, gid: u32) -> bool {
        match self.index(x, y).and_then(|i| self.tiles.get_mut(i)) {
            Some(cell) => {
                *cell = gid;
                true
            }
            None => false,
        }
    }

    /// Iterates over the rows of the layer
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}

/// A free-standing object placed on an object layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapObject {
    pub id: u32,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub object_type: String,

    pub x: f64,
    pub y: f64,

    #[serde(default)]
    pub width: f64,

    #[serde(default)]
    pub height: f64,

    /// Tile displayed by this object, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

/// A layer of free-standing objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroup {
    pub name: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default = "default_opacity")]
    pub opacity: f32,

    #[serde(default)]
    pub objects: Vec<MapObject>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            objects: Vec::new(),
            properties: Properties::new(),
        }
    }
}

/// A map layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tile(TileLayer),

    #[serde(rename = "objectgroup")]
    Object(ObjectGroup),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tile(layer) => &layer.name,
            Layer::Object(group) => &group.name,
        }
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tile(layer) => Some(layer),
            Layer::Object(_) => None,
        }
    }
}

/// A loaded map document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    #[serde(default)]
    pub orientation: Orientation,

    /// Width in tiles
    pub width: u32,

    /// Height in tiles
    pub height: u32,

    #[serde(rename = "tilewidth")]
    pub tile_width: u32,

    #[serde(rename = "tileheight")]
    pub tile_height: u32,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,

    #[serde(default)]
    pub tilesets: Vec<Arc<Tileset>>,

    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Map {
    /// Creates an empty map
    pub fn new(orientation: Orientation, width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            orientation,
            width,
            height,
            tile_width,
            tile_height,
            properties: Properties::new(),
            tilesets: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Adds a tileset, returning the shared handle the map keeps
    pub fn add_tileset(&mut self, tileset: Tileset) -> Arc<Tileset> {
        let shared = Arc::new(tileset);
        self.tilesets.push(Arc::clone(&shared));
        shared
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Iterates over the tile layers in drawing order
    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(Layer::as_tile_layer)
    }

    /// Finds the tileset owning the given gid
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|ts| ts.first_gid <= gid)
            .max_by_key(|ts| ts.first_gid)
            .map(Arc::as_ref)
    }

    /// Checks that every tile layer holds exactly one gid per cell
    pub fn validate(&self) -> Result<(), String> {
        for layer in self.tile_layers() {
            let expected = layer.cell_count().ok_or_else(|| {
                format!(
                    "Layer '{}' is too large ({}x{})",
                    layer.name, layer.width, layer.height
                )
            })?;
            if layer.tiles.len() != expected {
                return Err(format!(
                    "Layer '{}' has {} tiles, expected {}",
                    layer.name,
                    layer.tiles.len(),
                    expected
                ));
            }
        }
        Ok(())
    }
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}
