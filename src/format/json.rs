//! JSON map codec
//!
//! Uses Tiled-style keys (`tilewidth`, `firstgid`, `data`) with a
//! `"type": "map"` header so other tools can consume the output.

use serde::Serialize;

use super::error::{EncodeError, ReadError};
use crate::domain::Map;

/// Version written to the document header
const FORMAT_VERSION: &str = "1.0";

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(rename = "type")]
    kind: &'static str,

    version: &'static str,

    #[serde(flatten)]
    map: &'a Map,
}

/// Parses a JSON map document
pub fn read_json(input: &[u8]) -> Result<Map, ReadError> {
    let map: Map = serde_json::from_slice(input)?;
    map.validate().map_err(ReadError::Invalid)?;
    Ok(map)
}

/// Encodes a map as pretty-printed JSON
pub fn write_json(map: &Map) -> Result<Vec<u8>, EncodeError> {
    let document = JsonDocument {
        kind: "map",
        version: FORMAT_VERSION,
        map,
    };
    let mut output = serde_json::to_vec_pretty(&document)?;
    output.push(b'\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Layer, MapObject, ObjectGroup, Orientation, TileLayer, Tileset};

    fn sample_map() -> Map {
        let mut map = Map::new(Orientation::Isometric, 2, 1, 64, 32);
        map.add_tileset(Tileset::new("ground", 1, 64, 32));
        let mut layer = TileLayer::new("Ground", 2, 1);
        layer.set_tile(1, 0, 3);
        map.add_layer(Layer::Tile(layer));

        let mut group = ObjectGroup::new("Objects");
        group.objects.push(MapObject {
            id: 7,
            name: "chest".to_string(),
            x: 10.0,
            y: 20.0,
            gid: Some(2),
            ..MapObject::default()
        });
        map.add_layer(Layer::Object(group));
        map
    }

    #[test]
    fn writes_tiled_style_keys() {
        let encoded = write_json(&sample_map()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();

        assert_eq!(value["type"], "map");
        assert_eq!(value["orientation"], "isometric");
        assert_eq!(value["tilewidth"], 64);
        assert_eq!(value["tilesets"][0]["firstgid"], 1);
        assert_eq!(value["layers"][0]["type"], "tilelayer");
        assert_eq!(value["layers"][0]["data"], serde_json::json!([0, 3]));
        assert_eq!(value["layers"][1]["type"], "objectgroup");
        assert_eq!(value["layers"][1]["objects"][0]["gid"], 2);
    }

    #[test]
    fn reads_its_own_output() {
        let map = sample_map();
        let encoded = write_json(&map).unwrap();

        assert_eq!(read_json(&encoded).unwrap(), map);
    }

    #[test]
    fn rejects_inconsistent_layer() {
        let doc = r#"{"width": 2, "height": 2, "tilewidth": 8, "tileheight": 8,
            "layers": [{"type": "tilelayer", "name": "L", "width": 2, "height": 2, "data": [1]}]}"#;

        assert!(matches!(read_json(doc.as_bytes()), Err(ReadError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(read_json(b"{not json"), Err(ReadError::Json(_))));
    }
}
