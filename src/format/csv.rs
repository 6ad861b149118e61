//! CSV tile layer export
//!
//! Every tile layer becomes a block of rows holding tile ids local to
//! their tileset, `-1` for empty cells. Blocks are separated by a blank
//! line.

use super::error::EncodeError;
use crate::domain::{Map, TileLayer};

/// Masks out the flip flags stored in the high bits of a gid
const GID_MASK: u32 = 0x1FFF_FFFF;

fn local_tile_id(map: &Map, gid: u32) -> i64 {
    let gid = gid & GID_MASK;
    map.tileset_for_gid(gid)
        .and_then(|tileset| tileset.local_id(gid))
        .map(i64::from)
        .unwrap_or(-1)
}

fn encode_layer(map: &Map, layer: &TileLayer) -> Result<Vec<u8>, EncodeError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for row in layer.rows() {
        writer.write_record(row.iter().map(|&gid| local_tile_id(map, gid).to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| EncodeError::Csv(e.into_error().into()))
}

/// Encodes the tile layers of a map as CSV
pub fn write_csv(map: &Map) -> Result<Vec<u8>, EncodeError> {
    let blocks = map
        .tile_layers()
        .map(|layer| encode_layer(map, layer))
        .collect::<Result<Vec<_>, _>>()?;

    if blocks.is_empty() {
        return Err(EncodeError::NoTileLayers);
    }

    Ok(blocks.join(&b'\n'))
}
