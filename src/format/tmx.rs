//! TMX (XML) map codec
//!
//! Supports embedded tilesets, tile layers with `csv`, uncompressed
//! `base64` or plain XML data, object groups and custom properties.
//! Elements outside that subset (image layers, groups, per-tile data) are
//! skipped when reading.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::str::FromStr;

use base64::Engine;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::error::{EncodeError, ReadError};
use crate::domain::{Layer, Map, MapObject, ObjectGroup, Orientation, Properties, TileLayer, Tileset, TilesetImage};

/// Raw contents of a `<data>` element
#[derive(Debug, Default)]
struct DataBlock {
    encoding: Option<String>,
    compression: Option<String>,
    text: String,
    gids: Vec<u32>,
}

impl DataBlock {
    fn decode(self) -> Result<Vec<u32>, ReadError> {
        if let Some(compression) = self.compression {
            return Err(ReadError::Unsupported(format!(
                "compressed tile data ({})",
                compression
            )));
        }

        match self.encoding.as_deref() {
            None => Ok(self.gids),
            Some("csv") => self
                .text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u32>()
                        .map_err(|_| ReadError::Invalid(format!("Invalid tile gid in CSV data: {}", s)))
                })
                .collect(),
            Some("base64") => {
                let cleaned: String = self.text.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(cleaned)
                    .map_err(|e| ReadError::Invalid(format!("Invalid base64 tile data: {}", e)))?;
                if bytes.len() % 4 != 0 {
                    return Err(ReadError::Invalid(
                        "Base64 tile data is not a multiple of 4 bytes".to_string(),
                    ));
                }
                Ok(bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect())
            }
            Some(other) => Err(ReadError::Unsupported(format!("tile data encoding '{}'", other))),
        }
    }
}

/// Incremental TMX parser state
#[derive(Default)]
struct TmxParser {
    map: Option<Map>,
    tileset: Option<Tileset>,
    tile_layer: Option<TileLayer>,
    data: Option<DataBlock>,
    object_group: Option<ObjectGroup>,
    object: Option<MapObject>,
    /// Depth inside an element subtree being skipped
    skip_depth: usize,
}

type Attributes = HashMap<String, String>;

fn attributes(e: &BytesStart<'_>) -> Result<Attributes, ReadError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ReadError::Xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ReadError::Xml(format!("Attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ReadError::Xml(format!("Attribute value error: {e}")))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn required<T: FromStr>(attrs: &Attributes, tag: &str, key: &str) -> Result<T, ReadError> {
    let raw = attrs
        .get(key)
        .ok_or_else(|| ReadError::Invalid(format!("<{}> is missing '{}'", tag, key)))?;
    raw.parse()
        .map_err(|_| ReadError::Invalid(format!("<{}> has invalid '{}': {}", tag, key, raw)))
}

fn optional<T: FromStr>(attrs: &Attributes, tag: &str, key: &str, default: T) -> Result<T, ReadError> {
    match attrs.get(key) {
        Some(_) => required(attrs, tag, key),
        None => Ok(default),
    }
}

fn text(attrs: &Attributes, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

fn visible(attrs: &Attributes) -> bool {
    attrs.get("visible").map(|v| v != "0").unwrap_or(true)
}

impl TmxParser {
    fn map_mut(&mut self, tag: &str) -> Result<&mut Map, ReadError> {
        self.map
            .as_mut()
            .ok_or_else(|| ReadError::Invalid(format!("<{}> outside of <map>", tag)))
    }

    /// The innermost open element that can carry properties
    fn properties_owner(&mut self) -> Option<&mut Properties> {
        if let Some(object) = self.object.as_mut() {
            return Some(&mut object.properties);
        }
        if let Some(group) = self.object_group.as_mut() {
            return Some(&mut group.properties);
        }
        if let Some(layer) = self.tile_layer.as_mut() {
            return Some(&mut layer.properties);
        }
        if let Some(tileset) = self.tileset.as_mut() {
            return Some(&mut tileset.properties);
        }
        self.map.as_mut().map(|m| &mut m.properties)
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), ReadError> {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }

        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref())
            .map_err(|e| ReadError::Xml(format!("Invalid tag name: {e}")))?;
        let attrs = attributes(e)?;

        match tag {
            "map" => {
                let orientation = match attrs.get("orientation") {
                    Some(o) => o.parse::<Orientation>().map_err(ReadError::Invalid)?,
                    None => Orientation::default(),
                };
                self.map = Some(Map::new(
                    orientation,
                    required(&attrs, tag, "width")?,
                    required(&attrs, tag, "height")?,
                    required(&attrs, tag, "tilewidth")?,
                    required(&attrs, tag, "tileheight")?,
                ));
            }
            "tileset" => {
                self.map_mut(tag)?;
                if let Some(source) = attrs.get("source") {
                    return Err(ReadError::Unsupported(format!("external tileset '{}'", source)));
                }
                let mut tileset = Tileset::new(
                    text(&attrs, "name"),
                    required(&attrs, tag, "firstgid")?,
                    required(&attrs, tag, "tilewidth")?,
                    required(&attrs, tag, "tileheight")?,
                );
                tileset.tile_count = optional(&attrs, tag, "tilecount", 0)?;
                tileset.columns = optional(&attrs, tag, "columns", 0)?;
                self.tileset = Some(tileset);
            }
            "image" if self.tileset.is_some() => {
                let image = TilesetImage {
                    source: required(&attrs, tag, "source")?,
                    width: optional(&attrs, tag, "width", 0)?,
                    height: optional(&attrs, tag, "height", 0)?,
                };
                if let Some(tileset) = self.tileset.as_mut() {
                    tileset.image = Some(image);
                }
            }
            "layer" => {
                let map = self.map_mut(tag)?;
                let (map_width, map_height) = (map.width, map.height);
                let mut layer = TileLayer::empty(
                    text(&attrs, "name"),
                    optional(&attrs, tag, "width", map_width)?,
                    optional(&attrs, tag, "height", map_height)?,
                );
                layer.visible = visible(&attrs);
                layer.opacity = optional(&attrs, tag, "opacity", 1.0)?;
                self.tile_layer = Some(layer);
            }
            "data" if self.tile_layer.is_some() => {
                self.data = Some(DataBlock {
                    encoding: attrs.get("encoding").cloned(),
                    compression: attrs.get("compression").cloned(),
                    ..DataBlock::default()
                });
            }
            "tile" if self.data.is_some() => {
                let gid = optional(&attrs, tag, "gid", 0)?;
                if let Some(data) = self.data.as_mut() {
                    data.gids.push(gid);
                }
            }
            "objectgroup" => {
                self.map_mut(tag)?;
                let mut group = ObjectGroup::new(text(&attrs, "name"));
                group.visible = visible(&attrs);
                group.opacity = optional(&attrs, tag, "opacity", 1.0)?;
                self.object_group = Some(group);
            }
            "object" if self.object_group.is_some() => {
                self.object = Some(MapObject {
                    id: optional(&attrs, tag, "id", 0)?,
                    name: text(&attrs, "name"),
                    object_type: text(&attrs, "type"),
                    x: optional(&attrs, tag, "x", 0.0)?,
                    y: optional(&attrs, tag, "y", 0.0)?,
                    width: optional(&attrs, tag, "width", 0.0)?,
                    height: optional(&attrs, tag, "height", 0.0)?,
                    gid: match attrs.get("gid") {
                        Some(_) => Some(required(&attrs, tag, "gid")?),
                        None => None,
                    },
                    properties: Properties::new(),
                });
            }
            "properties" => {}
            "property" => {
                let key = required::<String>(&attrs, tag, "name")?;
                let value = text(&attrs, "value");
                if let Some(properties) = self.properties_owner() {
                    properties.insert(key, value);
                }
            }
            _ => {
                if !empty {
                    self.skip_depth = 1;
                }
            }
        }

        Ok(())
    }

    fn text(&mut self, content: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if let Some(data) = self.data.as_mut() {
            data.text.push_str(content);
        }
    }

    fn end(&mut self, tag: &[u8]) -> Result<(), ReadError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        match tag {
            b"tileset" => {
                if let Some(tileset) = self.tileset.take() {
                    self.map_mut("tileset")?.add_tileset(tileset);
                }
            }
            b"data" => {
                if let Some(data) = self.data.take() {
                    let gids = data.decode()?;
                    if let Some(layer) = self.tile_layer.as_mut() {
                        layer.tiles = gids;
                    }
                }
            }
            b"layer" => {
                if let Some(layer) = self.tile_layer.take() {
                    self.map_mut("layer")?.add_layer(Layer::Tile(layer));
                }
            }
            b"object" => {
                if let (Some(object), Some(group)) = (self.object.take(), self.object_group.as_mut()) {
                    group.objects.push(object);
                }
            }
            b"objectgroup" => {
                if let Some(group) = self.object_group.take() {
                    self.map_mut("objectgroup")?.add_layer(Layer::Object(group));
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn finish(self) -> Result<Map, ReadError> {
        let map = self
            .map
            .ok_or_else(|| ReadError::Invalid("Document has no <map> element".to_string()))?;
        map.validate().map_err(ReadError::Invalid)?;
        Ok(map)
    }
}

/// Parses a TMX document
pub fn read_tmx(input: &[u8]) -> Result<Map, ReadError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut parser = TmxParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.start(e, false)?,
            Ok(Event::Empty(ref e)) => {
                if parser.skip_depth == 0 {
                    parser.start(e, true)?;
                    parser.end(e.name().as_ref())?;
                }
            }
            Ok(Event::Text(ref t)) => {
                let content = t
                    .unescape()
                    .map_err(|e| ReadError::Xml(format!("Text error: {e}")))?;
                parser.text(&content);
            }
            Ok(Event::End(ref e)) => parser.end(e.name().as_ref())?,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReadError::Xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|e| EncodeError::Xml(format!("Write error: {e}")))
}

fn write_properties<W: Write>(writer: &mut Writer<W>, properties: &Properties) -> Result<(), EncodeError> {
    if properties.is_empty() {
        return Ok(());
    }

    emit(writer, Event::Start(BytesStart::new("properties")))?;
    for (name, value) in properties {
        let mut property = BytesStart::new("property");
        property.push_attribute(("name", name.as_str()));
        property.push_attribute(("value", value.as_str()));
        emit(writer, Event::Empty(property))?;
    }
    emit(writer, Event::End(BytesEnd::new("properties")))
}

fn write_tileset<W: Write>(writer: &mut Writer<W>, tileset: &Tileset) -> Result<(), EncodeError> {
    let mut start = BytesStart::new("tileset");
    start.push_attribute(("firstgid", tileset.first_gid.to_string().as_str()));
    start.push_attribute(("name", tileset.name.as_str()));
    start.push_attribute(("tilewidth", tileset.tile_width.to_string().as_str()));
    start.push_attribute(("tileheight", tileset.tile_height.to_string().as_str()));
    if tileset.tile_count > 0 {
        start.push_attribute(("tilecount", tileset.tile_count.to_string().as_str()));
    }
    if tileset.columns > 0 {
        start.push_attribute(("columns", tileset.columns.to_string().as_str()));
    }

    if tileset.image.is_none() && tileset.properties.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    write_properties(writer, &tileset.properties)?;
    if let Some(image) = &tileset.image {
        let mut elem = BytesStart::new("image");
        elem.push_attribute(("source", image.source.as_str()));
        elem.push_attribute(("width", image.width.to_string().as_str()));
        elem.push_attribute(("height", image.height.to_string().as_str()));
        emit(writer, Event::Empty(elem))?;
    }
    emit(writer, Event::End(BytesEnd::new("tileset")))
}

fn push_layer_attrs(start: &mut BytesStart<'_>, name: &str, visible: bool, opacity: f32) {
    start.push_attribute(("name", name));
    if !visible {
        start.push_attribute(("visible", "0"));
    }
    if opacity != 1.0 {
        start.push_attribute(("opacity", opacity.to_string().as_str()));
    }
}

fn write_tile_layer<W: Write>(writer: &mut Writer<W>, layer: &TileLayer) -> Result<(), EncodeError> {
    let mut start = BytesStart::new("layer");
    push_layer_attrs(&mut start, &layer.name, layer.visible, layer.opacity);
    start.push_attribute(("width", layer.width.to_string().as_str()));
    start.push_attribute(("height", layer.height.to_string().as_str()));
    emit(writer, Event::Start(start))?;

    write_properties(writer, &layer.properties)?;

    let mut data = BytesStart::new("data");
    data.push_attribute(("encoding", "csv"));
    emit(writer, Event::Start(data))?;

    let rows: Vec<String> = layer
        .rows()
        .map(|row| {
            row.iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    let csv = format!("\n{}\n", rows.join(",\n"));
    emit(writer, Event::Text(BytesText::new(&csv)))?;

    emit(writer, Event::End(BytesEnd::new("data")))?;
    emit(writer, Event::End(BytesEnd::new("layer")))
}

fn write_object<W: Write>(writer: &mut Writer<W>, object: &MapObject) -> Result<(), EncodeError> {
    let mut start = BytesStart::new("object");
    start.push_attribute(("id", object.id.to_string().as_str()));
    if !object.name.is_empty() {
        start.push_attribute(("name", object.name.as_str()));
    }
    if !object.object_type.is_empty() {
        start.push_attribute(("type", object.object_type.as_str()));
    }
    if let Some(gid) = object.gid {
        start.push_attribute(("gid", gid.to_string().as_str()));
    }
    start.push_attribute(("x", object.x.to_string().as_str()));
    start.push_attribute(("y", object.y.to_string().as_str()));
    if object.width != 0.0 {
        start.push_attribute(("width", object.width.to_string().as_str()));
    }
    if object.height != 0.0 {
        start.push_attribute(("height", object.height.to_string().as_str()));
    }

    if object.properties.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    write_properties(writer, &object.properties)?;
    emit(writer, Event::End(BytesEnd::new("object")))
}

fn write_object_group<W: Write>(writer: &mut Writer<W>, group: &ObjectGroup) -> Result<(), EncodeError> {
    let mut start = BytesStart::new("objectgroup");
    push_layer_attrs(&mut start, &group.name, group.visible, group.opacity);

    if group.objects.is_empty() && group.properties.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    write_properties(writer, &group.properties)?;
    for object in &group.objects {
        write_object(writer, object)?;
    }
    emit(writer, Event::End(BytesEnd::new("objectgroup")))
}

/// Encodes a map as a TMX document with CSV tile data
pub fn write_tmx(map: &Map) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, b' ', 1);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut start = BytesStart::new("map");
    start.push_attribute(("version", "1.0"));
    start.push_attribute(("orientation", map.orientation.to_string().as_str()));
    start.push_attribute(("width", map.width.to_string().as_str()));
    start.push_attribute(("height", map.height.to_string().as_str()));
    start.push_attribute(("tilewidth", map.tile_width.to_string().as_str()));
    start.push_attribute(("tileheight", map.tile_height.to_string().as_str()));
    emit(&mut writer, Event::Start(start))?;

    write_properties(&mut writer, &map.properties)?;
    for tileset in &map.tilesets {
        write_tileset(&mut writer, tileset)?;
    }
    for layer in &map.layers {
        match layer {
            Layer::Tile(layer) => write_tile_layer(&mut writer, layer)?,
            Layer::Object(group) => write_object_group(&mut writer, group)?,
        }
    }

    emit(&mut writer, Event::End(BytesEnd::new("map")))?;

    let mut output = buffer.into_inner();
    output.push(b'\n');
    Ok(output)
}
