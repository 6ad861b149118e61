//! Domain models for the map editor
//!
//! Contains the map document without any I/O concerns.

mod map;

pub use map::{Layer, Map, MapObject, ObjectGroup, Orientation, Properties, TileLayer, Tileset, TilesetImage};
