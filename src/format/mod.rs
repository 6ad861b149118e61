//! # Map Formats
//!
//! Encoders and decoders for the map formats the tool understands.
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | TMX | yes | yes | Embedded tilesets; csv, base64 or XML tile data |
//! | JSON | yes | yes | Tiled-style keys |
//! | CSV | no | yes | Local tile ids per tile layer |
//!
//! ## Key Types
//!
//! - [`MapReader`] - Loads a map from disk
//! - [`FileMapReader`] - Picks the decoder from the file extension

mod csv;
mod error;
mod json;
mod reader;
mod tmx;

pub use csv::write_csv;
pub use error::{EncodeError, ReadError};
pub use json::{read_json, write_json};
pub use reader::{FileMapReader, MapReader};
pub use tmx::{read_tmx, write_tmx};
